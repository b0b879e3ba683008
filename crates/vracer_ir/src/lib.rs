//! The VRacer intermediate representation.
//!
//! A [`Design`] is the analysis-ready lifting of one source file: an ordered
//! sequence of [`Module`]s, each carrying its declared [`Net`]s and an
//! ordered list of [`Process`]es. Every process records its [`Trigger`] set,
//! the [`Anchor`] points at which execution can block, and the flat multiset
//! of [`SignalRef`]s (reads and writes, tagged blocking/non-blocking and
//! attributed to an anchor) that the race detector consumes.
//!
//! The IR is built once by the parser and never mutated by the detector.
//!
//! # Architecture
//!
//! - **[`Arena`]** provides dense, ID-indexed storage in source order.
//! - **Opaque IDs** ([`ModuleId`], [`ProcessId`], ...) are `Copy` + `Hash`.
//! - Names are interned [`Ident`](vracer_common::Ident)s; signal identity is
//!   by name, so two references collide exactly when their `Ident`s match.

#![warn(missing_docs)]

pub mod arena;
pub mod design;
pub mod ids;
pub mod module;
pub mod net;
pub mod process;
pub mod reference;

pub use arena::{Arena, ArenaId};
pub use design::Design;
pub use ids::{AnchorId, ModuleId, NetId, ProcessId};
pub use module::{Module, Parameter};
pub use net::{Net, NetKind};
pub use process::{Anchor, Process, ProcessKind, Trigger};
pub use reference::{AssignKind, RefMode, SignalRef};
