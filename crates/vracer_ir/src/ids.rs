//! Opaque ID newtypes for IR entities.
//!
//! Each ID is a thin `u32` wrapper that is `Copy`, `Hash`, and
//! `Serialize`/`Deserialize`. IDs are created by
//! [`Arena::alloc`](crate::arena::Arena::alloc) in source order, which is
//! what makes synthesized process labels stable across reparses.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a module in the design.
    ModuleId
);

define_id!(
    /// Opaque, copyable ID for a declared net within a module.
    NetId
);

define_id!(
    /// Opaque, copyable ID for a process within a module.
    ProcessId
);

define_id!(
    /// Opaque, copyable ID for an anchor point within a process.
    ///
    /// Anchor 0 is always the process entry; embedded event controls get
    /// monotonically increasing ids in lexical order.
    AnchorId
);

impl AnchorId {
    /// The process entry anchor.
    pub const ENTRY: AnchorId = AnchorId(0);
}
