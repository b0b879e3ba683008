//! Shared foundational types used across the VRacer analyzer.
//!
//! This crate provides interned identifiers for signal, module, and process
//! names, plus the common result type separating internal invariant failures
//! from user-facing diagnostics.

#![warn(missing_docs)]

pub mod ident;
pub mod result;

pub use ident::{Ident, Interner};
pub use result::{InternalError, VracerResult};
