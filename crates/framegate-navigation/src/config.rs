//! Navigation Policy Configuration

use serde::{Deserialize, Serialize};

/// Navigation policy configuration options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationPolicyConfig {
    /// A subframe may only navigate its top-level window if it received a
    /// user gesture or is related to the top by origin or opener. When off,
    /// such navigations go through with a warning.
    pub framebusting_requires_gesture_or_origin: bool,
}

impl NavigationPolicyConfig {
    /// Allow every framebust, warning about the ones the strict policy would block
    pub fn legacy_framebusting() -> Self {
        Self {
            framebusting_requires_gesture_or_origin: false,
        }
    }
}

impl Default for NavigationPolicyConfig {
    fn default() -> Self {
        Self {
            framebusting_requires_gesture_or_origin: true,
        }
    }
}
