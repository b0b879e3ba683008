//! Race hazard detection over the VRacer IR.
//!
//! [`detect`] enumerates process pairs within each module and computes three
//! hazard relations, following the Ouyang criterion that blocking-vs-
//! non-blocking scheduling is what separates a race from a safe design:
//!
//! - **Write-Write** — two processes both write a signal with blocking
//!   assignments.
//! - **Read-Write** — one process reads a signal another writes with a
//!   blocking assignment. A non-blocking writer is ordered after all
//!   same-timestep reads and does not race.
//! - **Trigger** — two event-driven processes share a structurally equal
//!   trigger and write a common signal (any assignment kind).
//!
//! The detector is pure over the IR: same design in, byte-identical record
//! list out.

#![warn(missing_docs)]

pub mod aggregate;
pub mod detect;
pub mod facts;
pub mod options;
pub mod record;

pub use detect::detect;
pub use options::DetectOptions;
pub use record::{RaceKind, RaceRecord};
