//! Detector configuration.

use serde::{Deserialize, Serialize};

/// Enables/disables the three hazard analyses. Everything is on by default;
/// disabling a class removes exactly the records of that kind and leaves the
/// rest unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectOptions {
    /// Include Write-Write analysis.
    pub enable_ww: bool,
    /// Include Read-Write analysis.
    pub enable_rw: bool,
    /// Include Trigger analysis.
    pub enable_tr: bool,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            enable_ww: true,
            enable_rw: true,
            enable_tr: true,
        }
    }
}
