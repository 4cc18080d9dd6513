//! `window.open` Target Resolution
//!
//! Decides which existing browsing context a `window.open(url, name)` call
//! navigates, or whether a new auxiliary context has to be created.

use framegate_frames::{FrameId, FrameTreeView};
use framegate_security::SandboxFlags;

use crate::{NavigationAuthorizer, NavigationDecision};

/// A `window.open` call
#[derive(Debug, Clone, Copy)]
pub struct WindowOpenRequest<'a> {
    /// Target name (second argument)
    pub name: &'a str,
    /// The popup blocker would let a new window through
    pub popup_allowed: bool,
}

/// Where a `window.open` call lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowOpenTarget {
    /// Navigate this existing context
    Existing(FrameId),
    /// `_top` / `_parent` named a context the caller may not navigate
    Blocked(NavigationDecision),
    /// Stopped by the popup blocker
    PopupBlocked,
    /// The caller is sandboxed without `allow-popups`
    SandboxedPopup,
    /// Create a new auxiliary context, optionally named
    NewAuxiliary { name: Option<String> },
}

const RESERVED_NAMES: &[&str] = &["_blank", "_self", "_current", "_parent", "_top"];

impl NavigationAuthorizer {
    /// Resolve the target of `window.open` called by `active` on the window
    /// of `window_frame`
    pub fn resolve_window_open_target<T: FrameTreeView>(
        &self,
        tree: &T,
        active: FrameId,
        window_frame: FrameId,
        request: WindowOpenRequest<'_>,
    ) -> WindowOpenTarget {
        let name = request.name;

        // An empty name always resolves to the window itself, so it must not
        // slip past the popup blocker.
        if !request.popup_allowed
            && (name.is_empty() || tree.find_by_name(window_frame, name).is_none())
        {
            tracing::debug!("Blocked popup '{}' from {}", name, active);
            return WindowOpenTarget::PopupBlocked;
        }

        let keyword_target = if name.eq_ignore_ascii_case("_top") {
            Some(tree.top(window_frame))
        } else if name.eq_ignore_ascii_case("_parent") {
            Some(tree.parent(window_frame).unwrap_or(window_frame))
        } else {
            None
        };

        if let Some(target) = keyword_target {
            let decision = self.can_navigate(tree, active, target);
            return if decision.is_allowed() {
                WindowOpenTarget::Existing(target)
            } else {
                WindowOpenTarget::Blocked(decision)
            };
        }

        if !name.is_empty() && !name.eq_ignore_ascii_case("_blank") {
            if let Some(frame) = self.find_frame_for_navigation(tree, window_frame, name, active) {
                return WindowOpenTarget::Existing(frame);
            }
        }

        if tree.sandbox_flags(active).has(SandboxFlags::POPUPS) {
            tracing::debug!(
                "Blocked opening '{}' in a new window because {} is sandboxed \
                 without the 'allow-popups' permission",
                name,
                active
            );
            return WindowOpenTarget::SandboxedPopup;
        }

        let reserved = RESERVED_NAMES.iter().any(|r| name.eq_ignore_ascii_case(r));
        WindowOpenTarget::NewAuxiliary {
            name: (!name.is_empty() && !reserved).then(|| name.to_string()),
        }
    }
}
