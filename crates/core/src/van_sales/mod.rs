//! Van sales: stock loaded onto a commercial's vehicle, sold door to door,
//! then reconciled against what comes back and the cash handed in.

mod reconcile;

#[cfg(test)]
mod props;

pub use reconcile::{
    LoadedLine, ReconciledLine, Reconciliation, ReturnEntry, VanSaleError, cancel, reconcile,
    validate_load,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Van sale status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VanSaleStatus {
    /// Goods are on the van.
    Loaded,
    /// Returns and cash have been counted (final).
    Reconciled,
    /// Load undone, all goods back in stock (final).
    Cancelled,
}

impl VanSaleStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Reconciled => "reconciled",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "loaded" => Some(Self::Loaded),
            "reconciled" => Some(Self::Reconciled),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for VanSaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
