//! framegate Navigation
//!
//! Decides whether a browsing context, acting for its script, may navigate
//! another browsing context.
//!
//! Features:
//! - Origin-ancestry and opener based authorization
//! - Sandbox navigation restrictions
//! - Framebusting gated on user gesture or origin
//! - `window.open` target resolution
//! - Scroll propagation boundaries

mod ancestry;
mod authorizer;
mod config;
mod decision;
mod window_open;

pub use ancestry::{can_access_ancestor, find_unsafe_parent_scroll_boundary};
pub use authorizer::NavigationAuthorizer;
pub use config::NavigationPolicyConfig;
pub use decision::{DenialReason, NavigationDecision, NavigationDiagnostics};
pub use window_open::{WindowOpenRequest, WindowOpenTarget};
