//! Navigation Authorizer
//!
//! A document may navigate its own descendants, any frame one of whose
//! ancestors it can access, and top-level frames related to it through the
//! opener chain. Sandboxing narrows this down, and a subframe navigating its
//! top-level window additionally needs a user gesture unless it is already
//! related to the top by origin or opener.
//!
//! See <http://www.adambarth.com/papers/2008/barth-jackson-mitchell.pdf> for
//! the background of the ancestor rule.

use framegate_frames::{FrameId, FrameTreeView};
use framegate_security::SandboxFlags;

use crate::ancestry::can_access_ancestor;
use crate::{DenialReason, NavigationDecision, NavigationDiagnostics, NavigationPolicyConfig};

/// Stateless navigation policy
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationAuthorizer {
    config: NavigationPolicyConfig,
}

impl NavigationAuthorizer {
    pub fn new(config: NavigationPolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NavigationPolicyConfig {
        &self.config
    }

    /// Whether `source` may navigate `target`
    pub fn can_navigate<T: FrameTreeView>(
        &self,
        tree: &T,
        source: FrameId,
        target: FrameId,
    ) -> NavigationDecision {
        debug_assert!(tree.is_alive(source), "navigation source {source} is not alive");
        debug_assert!(tree.is_alive(target), "navigation target {target} is not alive");

        let base = self.can_navigate_without_framebusting(tree, source, target);
        let flags = tree.sandbox_flags(source);
        let sandboxed = flags.is_sandboxed();
        let has_gesture = !tree.is_remote(source) && tree.has_received_user_gesture(source);
        let targets_top = target != source && target == tree.top(source);

        let mut diagnostics = NavigationDiagnostics {
            had_gesture: has_gesture,
            base_allowed: base.is_ok(),
            ..NavigationDiagnostics::default()
        };

        if targets_top && sandboxed {
            diagnostics.top_nav_in_sandbox = true;
            diagnostics.top_nav_in_sandbox_without_gesture = !has_gesture;
        }

        if targets_top && !flags.has(SandboxFlags::TOP_NAVIGATION) {
            diagnostics.top_nav_from_subframe = true;
            if sandboxed {
                diagnostics.top_nav_in_sandbox_with_permission = true;
                diagnostics.top_nav_in_sandbox_with_permission_without_gesture = !has_gesture;
            }

            if has_gesture || base.is_ok() {
                diagnostics.was_legacy_allowed = base.is_err();
                return NavigationDecision::allow(diagnostics);
            }

            if !self.config.framebusting_requires_gesture_or_origin {
                diagnostics.was_legacy_allowed = true;
                let message = framebust_warning(tree, source, target);
                tracing::warn!("{}", message);
                return NavigationDecision::allow_with_warning(message, diagnostics);
            }

            let reason = DenialReason::FramebustWithoutGestureOrOrigin;
            tracing::debug!("Unsafe navigation of {} from {}: {}", target, source, reason);
            let mut decision = NavigationDecision::deny(reason, diagnostics);
            decision.schedule_page_block = !tree.is_remote(source);
            return decision;
        }

        match base {
            Ok(()) => NavigationDecision::allow(diagnostics),
            Err(reason) => {
                tracing::debug!("Unsafe navigation of {} from {}: {}", target, source, reason);
                NavigationDecision::deny(reason, diagnostics)
            }
        }
    }

    /// The origin, opener and sandbox rules, without the framebusting gate
    pub fn can_navigate_without_framebusting<T: FrameTreeView>(
        &self,
        tree: &T,
        source: FrameId,
        target: FrameId,
    ) -> Result<(), DenialReason> {
        let flags = tree.sandbox_flags(source);

        if flags.has(SandboxFlags::NAVIGATION) {
            // Sandboxed frames can navigate their own children.
            if tree.is_descendant_of(target, source) {
                return Ok(());
            }

            let source_top = tree.top(source);
            let target_top = tree.top(target);

            // Popups too, unless the sandbox propagates into them.
            if target == target_top
                && target_top != source_top
                && !flags.has(SandboxFlags::PROPAGATES_TO_AUXILIARY_BROWSING_CONTEXTS)
            {
                return Ok(());
            }

            // Top navigation is opt-in.
            if !flags.has(SandboxFlags::TOP_NAVIGATION) && target == source_top {
                return Ok(());
            }

            return Err(
                if flags.has(SandboxFlags::TOP_NAVIGATION) && target == source_top {
                    DenialReason::SandboxedWithoutTopNavigation
                } else {
                    DenialReason::SandboxedAncestorNavigation
                },
            );
        }

        let Some(origin) = tree.origin(source) else {
            return Err(DenialReason::NotSameOriginParentOrOpener);
        };

        if can_access_ancestor(tree, origin, Some(target)) {
            return Ok(());
        }

        // Top-level frames show their URL, so a looser relation is enough:
        // the target opened the source, or the source can access an ancestor
        // of the target's opener.
        if tree.is_top_level(target) {
            if tree.opener(source) == Some(target) {
                return Ok(());
            }
            if can_access_ancestor(tree, origin, tree.opener(target)) {
                return Ok(());
            }
        }

        Err(DenialReason::NotSameOriginParentOrOpener)
    }

    /// Look up `name` from `from` and return it only if `active_frame` may
    /// navigate it
    pub fn find_frame_for_navigation<T: FrameTreeView>(
        &self,
        tree: &T,
        from: FrameId,
        name: &str,
        active_frame: FrameId,
    ) -> Option<FrameId> {
        let frame = tree.find_by_name(from, name)?;
        self.can_navigate(tree, active_frame, frame)
            .is_allowed()
            .then_some(frame)
    }
}

fn framebust_warning<T: FrameTreeView>(tree: &T, source: FrameId, target: FrameId) -> String {
    let target_description = match tree.url(target) {
        Some(url) if !tree.is_remote(target) => format!("with URL '{}'", url),
        _ => format!(
            "with origin '{}'",
            tree.origin(target).map(ToString::to_string).unwrap_or_default()
        ),
    };
    let source_url = tree.url(source).map(|url| url.as_str()).unwrap_or_default();

    format!(
        "Frame with URL '{}' attempted to navigate its top-level window {}. \
         Navigating the top-level window from a cross-origin iframe will soon \
         require that the iframe has received a user gesture. \
         See https://www.chromestatus.com/features/5851021045661696.",
        source_url, target_description
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use framegate_frames::{FrameInit, FrameTree};

    fn init(url: &str) -> FrameInit {
        FrameInit::parse(url).unwrap()
    }

    fn strict() -> NavigationAuthorizer {
        NavigationAuthorizer::default()
    }

    #[test]
    fn test_same_origin_sibling() {
        let mut tree = FrameTree::new();
        let top = tree.create_top_level(init("https://a.test/")).unwrap();
        let left = tree.create_child(top, init("https://b.test/")).unwrap();
        let right = tree.create_child(top, init("https://b.test/")).unwrap();

        assert!(strict().can_navigate(&tree, left, right).allowed);
    }

    #[test]
    fn test_parent_navigates_cross_origin_child() {
        let mut tree = FrameTree::new();
        let top = tree.create_top_level(init("https://a.test/")).unwrap();
        let child = tree.create_child(top, init("https://b.test/")).unwrap();

        let decision = strict().can_navigate(&tree, top, child);
        assert!(decision.allowed);
        assert!(decision.reason.is_none());
        assert_eq!(decision.diagnostics.framebust_bucket(), None);
    }

    #[test]
    fn test_cross_origin_sibling_denied() {
        let mut tree = FrameTree::new();
        let top = tree.create_top_level(init("https://a.test/")).unwrap();
        let left = tree.create_child(top, init("https://b.test/")).unwrap();
        let right = tree.create_child(top, init("https://c.test/")).unwrap();

        let decision = strict().can_navigate(&tree, left, right);
        assert!(!decision.allowed);
        assert_eq!(decision.denial, Some(DenialReason::NotSameOriginParentOrOpener));
        assert!(!decision.schedule_page_block);
    }

    #[test]
    fn test_cross_origin_frame_navigates_same_origin_ancestor_subtree() {
        let mut tree = FrameTree::new();
        let top = tree.create_top_level(init("https://a.test/")).unwrap();
        let outer = tree.create_child(top, init("https://b.test/")).unwrap();
        let inner = tree.create_child(outer, init("https://c.test/")).unwrap();
        let other = tree.create_child(top, init("https://b.test/")).unwrap();

        // `other` can access `outer`, an ancestor of `inner`
        assert!(strict().can_navigate(&tree, other, inner).allowed);
    }

    #[test]
    fn test_self_navigation_in_sandbox() {
        let mut tree = FrameTree::new();
        let top = tree.create_top_level(init("https://a.test/")).unwrap();
        let frame = tree
            .create_child(top, init("https://b.test/").sandboxed(SandboxFlags::all()))
            .unwrap();

        assert!(strict().can_navigate(&tree, frame, frame).allowed);
    }

    #[test]
    fn test_sandboxed_opted_in_top_navigation() {
        let mut tree = FrameTree::new();
        let top = tree.create_top_level(init("https://a.test/")).unwrap();
        let flags = SandboxFlags::parse("allow-scripts allow-top-navigation").flags;
        let frame = tree
            .create_child(top, init("https://b.test/").sandboxed(flags))
            .unwrap();

        let decision = strict().can_navigate(&tree, frame, top);
        assert!(decision.allowed);
        assert!(decision.diagnostics.top_nav_from_subframe);
        assert!(decision.diagnostics.top_nav_in_sandbox);
        assert!(decision.diagnostics.top_nav_in_sandbox_with_permission);
        assert!(decision.diagnostics.top_nav_in_sandbox_with_permission_without_gesture);
        assert!(!decision.diagnostics.was_legacy_allowed);
    }

    #[test]
    fn test_sandboxed_sibling_denied() {
        let mut tree = FrameTree::new();
        let top = tree.create_top_level(init("https://a.test/")).unwrap();
        let frame = tree
            .create_child(top, init("https://a.test/").sandboxed(SandboxFlags::all()))
            .unwrap();
        let sibling = tree.create_child(top, init("https://a.test/")).unwrap();

        assert_eq!(
            strict().can_navigate_without_framebusting(&tree, frame, sibling),
            Err(DenialReason::SandboxedAncestorNavigation)
        );
    }

    #[test]
    fn test_opener_navigates_back() {
        let mut tree = FrameTree::new();
        let opener = tree.create_top_level(init("https://a.test/")).unwrap();
        let popup = tree
            .open_auxiliary(opener, init("https://b.test/"), false)
            .unwrap();

        // The popup may navigate the window that opened it
        assert!(strict().can_navigate(&tree, popup, opener).allowed);
    }

    #[test]
    fn test_unrelated_top_level_denied() {
        let mut tree = FrameTree::new();
        let first = tree.create_top_level(init("https://a.test/")).unwrap();
        let second = tree.create_top_level(init("https://b.test/")).unwrap();

        let decision = strict().can_navigate(&tree, first, second);
        assert!(!decision.allowed);
        assert_eq!(decision.denial, Some(DenialReason::NotSameOriginParentOrOpener));
    }

    #[test]
    fn test_remote_source_has_no_gesture() {
        let mut tree = FrameTree::new();
        let top = tree.create_top_level(init("https://a.test/")).unwrap();
        let frame = tree
            .create_child(top, init("https://b.test/").remote())
            .unwrap();
        tree.notify_user_gesture(frame).unwrap();

        let decision = strict().can_navigate(&tree, frame, top);
        assert!(!decision.allowed);
        assert!(!decision.diagnostics.had_gesture);
        assert!(!decision.schedule_page_block);
    }

    #[test]
    fn test_find_frame_for_navigation() {
        let mut tree = FrameTree::new();
        let top = tree.create_top_level(init("https://a.test/")).unwrap();
        let same = tree
            .create_child(top, init("https://a.test/").named("same"))
            .unwrap();
        let _cross = tree
            .create_child(top, init("https://b.test/").named("cross"))
            .unwrap();
        let source = tree.create_child(top, init("https://b.test/")).unwrap();
        let other = tree.create_top_level(init("https://c.test/").named("other")).unwrap();

        let authorizer = strict();
        // `source` can access the `cross` frame but not the a.test ones
        assert!(authorizer.find_frame_for_navigation(&tree, top, "cross", source).is_some());
        assert_eq!(authorizer.find_frame_for_navigation(&tree, top, "same", top), Some(same));
        assert_eq!(authorizer.find_frame_for_navigation(&tree, top, "same", source), None);
        assert_eq!(authorizer.find_frame_for_navigation(&tree, top, "other", source), None);
        assert_eq!(authorizer.find_frame_for_navigation(&tree, top, "missing", top), None);
        assert!(tree.contains(other));
    }
}
