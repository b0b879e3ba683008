//! Top-level design container.

use crate::arena::Arena;
use crate::ids::ModuleId;
use crate::module::Module;
use serde::{Deserialize, Serialize};

/// A complete lifted design — one per analyzed source file.
///
/// Created by the parser, immutable thereafter. The detector reads it many
/// times; running the detector on the same `Design` twice yields identical
/// records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    /// All modules of the file, in source order.
    pub modules: Arena<ModuleId, Module>,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self {
            modules: Arena::new(),
        }
    }

    /// Returns the number of modules in the design.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Returns the total number of processes across all modules.
    pub fn process_count(&self) -> usize {
        self.modules.values().map(|m| m.processes.len()).sum()
    }

    /// Returns the total number of nets across all modules.
    pub fn net_count(&self) -> usize {
        self.modules.values().map(|m| m.nets.len()).sum()
    }
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}
