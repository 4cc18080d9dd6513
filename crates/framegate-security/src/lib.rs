//! framegate Security
//!
//! Security primitives consumed by the navigation policy.
//!
//! Features:
//! - Security origins and the same-origin access check
//! - `document.domain` relaxation
//! - Sandbox flags and `sandbox` attribute parsing

pub mod origin;
pub mod sandbox;

pub use origin::SecurityOrigin;
pub use sandbox::{SandboxFlags, SandboxPolicy};

/// Security error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SecurityError {
    #[error("Invalid URL '{input}': {source}")]
    InvalidUrl {
        input: String,
        source: url::ParseError,
    },

    #[error("Cannot set document.domain to '{domain}' for origin '{origin}'")]
    InvalidDomain { domain: String, origin: String },
}
