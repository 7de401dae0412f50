//! Common types used throughout Array-XRay
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// A backend-shaped record as returned by a connector.
///
/// Flat object of strings for the CLI backend, arbitrarily nested for the
/// REST backends. Consumed immediately by a projector.
pub type RawResource = JsonValue;

// ============================================================================
// Backend Family
// ============================================================================

/// Family of storage backend handled by a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// IBM SVC / FlashSystem over SSH
    Svc,
    /// Dell EMC VMAX / Symmetrix over Unisphere REST
    Vmax,
    /// Dell EMC VPLEX over its REST interface
    Vplex,
}

impl Backend {
    /// Default management port for the backend
    pub fn default_port(self) -> u16 {
        match self {
            Backend::Svc => 22,
            Backend::Vmax => 8443,
            Backend::Vplex => 443,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Svc => write!(f, "SVC"),
            Backend::Vmax => write!(f, "VMAX"),
            Backend::Vplex => write!(f, "VPLEX"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_display() {
        assert_eq!(Backend::Svc.to_string(), "SVC");
        assert_eq!(Backend::Vmax.to_string(), "VMAX");
        assert_eq!(Backend::Vplex.to_string(), "VPLEX");
    }

    #[test]
    fn test_backend_default_port() {
        assert_eq!(Backend::Svc.default_port(), 22);
        assert_eq!(Backend::Vmax.default_port(), 8443);
        assert_eq!(Backend::Vplex.default_port(), 443);
    }
}
