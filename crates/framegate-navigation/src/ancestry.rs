//! Origin checks along ancestor chains

use framegate_frames::{FrameId, FrameTreeView};
use framegate_security::SecurityOrigin;

/// Whether `origin` can access `target` or any of its ancestors
///
/// `target` is absent when an opener has gone away. Local origins may
/// always reach local ancestors, even when each file is its own origin.
pub fn can_access_ancestor<T: FrameTreeView>(
    tree: &T,
    origin: &SecurityOrigin,
    target: Option<FrameId>,
) -> bool {
    let Some(target) = target else {
        return false;
    };

    let is_local_origin = origin.is_local();
    tree.ancestors(target).any(|ancestor| {
        tree.origin(ancestor).is_some_and(|ancestor_origin| {
            origin.can_access(ancestor_origin) || (is_local_origin && ancestor_origin.is_local())
        })
    })
}

/// First frame, walking up from `frame`, whose parent cannot access `frame`
///
/// Scrolls and similar visual effects must not propagate past it. `None`
/// when every ancestor up to the root can access `frame`.
pub fn find_unsafe_parent_scroll_boundary<T: FrameTreeView>(
    tree: &T,
    frame: FrameId,
) -> Option<FrameId> {
    let origin = tree.origin(frame)?;
    let mut current = frame;

    while let Some(ancestor) = tree.parent(current) {
        let accessible = tree
            .origin(ancestor)
            .is_some_and(|ancestor_origin| ancestor_origin.can_access(origin));
        if !accessible {
            return Some(current);
        }
        current = ancestor;
    }

    None
}
