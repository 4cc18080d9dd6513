//! Named Frame Lookup
//!
//! Resolves navigation target names (`target="..."`, `window.open` names).

use crate::{FrameId, FrameTree, FrameTreeView};

impl FrameTree {
    /// Resolve `name` relative to `from`
    ///
    /// Keywords are matched case-insensitively. Other names are searched in
    /// `from`'s subtree first, then `from`'s whole tree, then every other
    /// top-level tree in creation order.
    pub(crate) fn find_named(&self, from: FrameId, name: &str) -> Option<FrameId> {
        if !self.contains(from) {
            return None;
        }

        if name.is_empty() || is_keyword(name, "_self") || is_keyword(name, "_current") {
            return Some(from);
        }
        if is_keyword(name, "_top") {
            return Some(self.top(from));
        }
        if is_keyword(name, "_parent") {
            return Some(self.parent(from).unwrap_or(from));
        }
        if is_keyword(name, "_blank") {
            return None;
        }

        let top = self.top(from);
        let found = self
            .descendants(from)
            .find(|f| self.has_name(*f, name))
            .or_else(|| self.descendants(top).find(|f| self.has_name(*f, name)))
            .or_else(|| {
                self.top_level_frames()
                    .iter()
                    .filter(|root| **root != top)
                    .find_map(|root| self.descendants(*root).find(|f| self.has_name(*f, name)))
            });

        if found.is_none() {
            tracing::debug!("No frame named '{}' reachable from {}", name, from);
        }
        found
    }

    fn has_name(&self, frame: FrameId, name: &str) -> bool {
        self.get(frame).and_then(|f| f.name()) == Some(name)
    }
}

fn is_keyword(name: &str, keyword: &str) -> bool {
    name.eq_ignore_ascii_case(keyword)
}
