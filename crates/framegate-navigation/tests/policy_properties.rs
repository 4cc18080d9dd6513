//! Property tests for framegate-navigation
//!
//! Random frame trees checked against the invariants of the navigation
//! policy.

use framegate_frames::{FrameId, FrameInit, FrameTree, FrameTreeView};
use framegate_navigation::{DenialReason, NavigationAuthorizer};
use framegate_security::SandboxFlags;
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::sample::Index;
use proptest::test_runner::{FileFailurePersistence, TestCaseResult};

const POLICY_PROPTEST_REGRESSION_FILE: &str = "tests/proptest-regressions/policy_properties.txt";
const DEFAULT_POLICY_PROPTEST_CASES: u32 = 256;

const ORIGINS: [&str; 3] = ["https://a.test/", "https://b.test/", "https://c.test/"];

/// Parent (none for a new top-level frame), origin and whether the frame is
/// sandboxed
type FrameShape = (Option<Index>, usize, bool);

fn policy_proptest_cases() -> u32 {
    std::env::var("FRAMEGATE_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_POLICY_PROPTEST_CASES)
}

fn frame_shapes_strategy() -> BoxedStrategy<Vec<FrameShape>> {
    vec((any::<Option<Index>>(), 0..ORIGINS.len(), any::<bool>()), 1..8).boxed()
}

fn sandbox() -> SandboxFlags {
    SandboxFlags::NAVIGATION | SandboxFlags::TOP_NAVIGATION
}

fn build_tree(shapes: &[FrameShape]) -> (FrameTree, Vec<FrameId>) {
    let mut tree = FrameTree::new();
    let mut ids: Vec<FrameId> = Vec::with_capacity(shapes.len());

    for (parent, origin, sandboxed) in shapes {
        let mut init = FrameInit::parse(ORIGINS[*origin]).unwrap();
        if *sandboxed {
            init = init.sandboxed(sandbox());
        }
        let id = match parent {
            Some(index) if !ids.is_empty() => {
                let parent = ids[index.index(ids.len())];
                tree.create_child(parent, init).unwrap()
            }
            _ => tree.create_top_level(init).unwrap(),
        };
        ids.push(id);
    }

    (tree, ids)
}

fn assert_decisions_are_stable(shapes: &[FrameShape]) -> TestCaseResult {
    let (tree, ids) = build_tree(shapes);
    let authorizer = NavigationAuthorizer::default();

    for &source in &ids {
        for &target in &ids {
            let first = authorizer.can_navigate(&tree, source, target);
            let second = authorizer.can_navigate(&tree, source, target);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.allowed, first.denial.is_none());
            if !first.allowed {
                prop_assert!(first.reason.is_some());
            }
        }
    }
    Ok(())
}

fn assert_accessible_targets_allowed(shapes: &[FrameShape]) -> TestCaseResult {
    let (tree, ids) = build_tree(shapes);
    let authorizer = NavigationAuthorizer::default();

    for &source in &ids {
        if tree.sandbox_flags(source) != SandboxFlags::NONE {
            continue;
        }
        let Some(origin) = tree.origin(source) else {
            continue;
        };
        for &target in &ids {
            let accessible = tree
                .ancestors(target)
                .any(|ancestor| tree.origin(ancestor).is_some_and(|o| origin.can_access(o)));
            if tree.is_descendant_of(target, source) || accessible {
                prop_assert!(
                    authorizer.can_navigate(&tree, source, target).allowed,
                    "{} should be able to navigate {}",
                    source,
                    target
                );
            }
        }
    }
    Ok(())
}

fn assert_sandboxed_ancestors_denied(shapes: &[FrameShape]) -> TestCaseResult {
    let (tree, ids) = build_tree(shapes);
    let authorizer = NavigationAuthorizer::default();

    for &source in &ids {
        if !tree.sandbox_flags(source).contains(sandbox()) {
            continue;
        }
        for target in tree.ancestors(source).skip(1) {
            let decision = authorizer.can_navigate(&tree, source, target);
            prop_assert!(!decision.allowed);
            let expected = if target == tree.top(source) {
                DenialReason::SandboxedWithoutTopNavigation
            } else {
                DenialReason::SandboxedAncestorNavigation
            };
            prop_assert_eq!(decision.denial, Some(expected));
        }
    }
    Ok(())
}

fn assert_openers_navigate_popups(shapes: &[FrameShape], opener: Index) -> TestCaseResult {
    let (mut tree, ids) = build_tree(shapes);
    let opener = ids[opener.index(ids.len())];
    let popup = tree
        .open_auxiliary(opener, FrameInit::parse("https://popup.test/").unwrap(), false)
        .unwrap();

    let decision = NavigationAuthorizer::default().can_navigate(&tree, opener, popup);
    prop_assert!(decision.allowed, "{} should be able to navigate its popup", opener);
    prop_assert!(!decision.diagnostics.top_nav_from_subframe);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: policy_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(POLICY_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn decisions_are_stable_and_well_formed(shapes in frame_shapes_strategy()) {
        assert_decisions_are_stable(&shapes)?;
    }

    #[test]
    fn unsandboxed_frames_navigate_accessible_targets(shapes in frame_shapes_strategy()) {
        assert_accessible_targets_allowed(&shapes)?;
    }

    #[test]
    fn sandboxed_frames_never_navigate_ancestors(shapes in frame_shapes_strategy()) {
        assert_sandboxed_ancestors_denied(&shapes)?;
    }

    #[test]
    fn openers_navigate_their_popups(shapes in frame_shapes_strategy(), opener in any::<Index>()) {
        assert_openers_navigate_popups(&shapes, opener)?;
    }
}
