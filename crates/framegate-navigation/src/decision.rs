//! Navigation Decisions
//!
//! What the authorizer hands back to the embedder: the verdict, a console
//! message, the page-block signal and counters the embedder may record.

use serde::Serialize;

/// Why a navigation was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum DenialReason {
    #[error(
        "The frame attempting navigation of the top-level window is sandboxed, \
         but the 'allow-top-navigation' flag is not set."
    )]
    SandboxedWithoutTopNavigation,

    #[error(
        "The frame attempting navigation is sandboxed, and is therefore \
         disallowed from navigating its ancestors."
    )]
    SandboxedAncestorNavigation,

    #[error(
        "The frame attempting navigation is neither same-origin with the target, \
         nor is it the target's parent or opener."
    )]
    NotSameOriginParentOrOpener,

    #[error(
        "The frame attempting navigation is targeting its top-level window, \
         but is neither same-origin with its target nor has it received a user gesture. \
         See https://www.chromestatus.com/features/5851021045661696."
    )]
    FramebustWithoutGestureOrOrigin,
}

/// Telemetry about a single decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NavigationDiagnostics {
    /// A subframe targeted its top-level window and was eligible to do so
    pub top_nav_from_subframe: bool,
    pub had_gesture: bool,
    /// Outcome of the origin/opener/sandbox check alone
    pub base_allowed: bool,
    /// Allowed although the origin/opener/sandbox check refused it
    pub was_legacy_allowed: bool,
    pub top_nav_in_sandbox: bool,
    pub top_nav_in_sandbox_without_gesture: bool,
    /// Sandboxed with `allow-top-navigation`
    pub top_nav_in_sandbox_with_permission: bool,
    pub top_nav_in_sandbox_with_permission_without_gesture: bool,
}

impl NavigationDiagnostics {
    pub const FRAMEBUST_GESTURE_BIT: u8 = 0x1;
    pub const FRAMEBUST_ALLOWED_BIT: u8 = 0x2;

    /// Framebust histogram sample; only top navigations from subframes count
    pub fn framebust_bucket(&self) -> Option<u8> {
        if !self.top_nav_from_subframe {
            return None;
        }
        let mut bucket = 0;
        if self.had_gesture {
            bucket |= Self::FRAMEBUST_GESTURE_BIT;
        }
        if self.base_allowed {
            bucket |= Self::FRAMEBUST_ALLOWED_BIT;
        }
        Some(bucket)
    }
}

/// Result of a navigation check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationDecision {
    pub allowed: bool,
    /// Console message; always present on denial
    pub reason: Option<String>,
    pub denial: Option<DenialReason>,
    /// The embedder should block further script-initiated navigations of the
    /// initiating document
    pub schedule_page_block: bool,
    pub diagnostics: NavigationDiagnostics,
}

impl NavigationDecision {
    pub(crate) fn allow(diagnostics: NavigationDiagnostics) -> Self {
        Self {
            allowed: true,
            reason: None,
            denial: None,
            schedule_page_block: false,
            diagnostics,
        }
    }

    pub(crate) fn allow_with_warning(message: String, diagnostics: NavigationDiagnostics) -> Self {
        Self {
            reason: Some(message),
            ..Self::allow(diagnostics)
        }
    }

    pub(crate) fn deny(reason: DenialReason, diagnostics: NavigationDiagnostics) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.to_string()),
            denial: Some(reason),
            schedule_page_block: false,
            diagnostics,
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }
}
