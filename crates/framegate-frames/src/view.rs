//! Read-only Frame Tree View
//!
//! The capability the navigation policy is evaluated against. Every query
//! on a destroyed handle answers as if the frame were absent.

use framegate_security::{SandboxFlags, SecurityOrigin};
use url::Url;

use crate::FrameId;

/// Read-only access to a tree of browsing contexts
pub trait FrameTreeView {
    fn is_alive(&self, frame: FrameId) -> bool;

    fn parent(&self, frame: FrameId) -> Option<FrameId>;

    /// Children in document order
    fn children(&self, frame: FrameId) -> &[FrameId];

    /// The frame's opener, if it is still alive
    fn opener(&self, frame: FrameId) -> Option<FrameId>;

    fn origin(&self, frame: FrameId) -> Option<&SecurityOrigin>;

    fn sandbox_flags(&self, frame: FrameId) -> SandboxFlags;

    fn is_remote(&self, frame: FrameId) -> bool;

    fn has_received_user_gesture(&self, frame: FrameId) -> bool;

    fn url(&self, frame: FrameId) -> Option<&Url>;

    /// Tree-scoped name lookup, starting at `from`
    fn find_by_name(&self, from: FrameId, name: &str) -> Option<FrameId>;

    /// The ancestor with no parent
    fn top(&self, frame: FrameId) -> FrameId {
        let mut current = frame;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    fn is_top_level(&self, frame: FrameId) -> bool {
        self.parent(frame).is_none()
    }

    /// `frame` followed by each of its ancestors up to the root
    fn ancestors(&self, frame: FrameId) -> Ancestors<'_, Self>
    where
        Self: Sized,
    {
        Ancestors {
            tree: self,
            next: self.is_alive(frame).then_some(frame),
        }
    }

    /// `frame` and its subtree in tree order
    fn descendants(&self, frame: FrameId) -> Descendants<'_, Self>
    where
        Self: Sized,
    {
        let stack = if self.is_alive(frame) { vec![frame] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// Inclusive: a frame is a descendant of itself
    fn is_descendant_of(&self, frame: FrameId, ancestor: FrameId) -> bool
    where
        Self: Sized,
    {
        self.ancestors(frame).any(|f| f == ancestor)
    }
}

/// Iterator over a frame and its ancestors
pub struct Ancestors<'a, T: FrameTreeView> {
    tree: &'a T,
    next: Option<FrameId>,
}

impl<T: FrameTreeView> Iterator for Ancestors<'_, T> {
    type Item = FrameId;

    fn next(&mut self) -> Option<FrameId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a, T: FrameTreeView> {
    tree: &'a T,
    stack: Vec<FrameId>,
}

impl<T: FrameTreeView> Iterator for Descendants<'_, T> {
    type Item = FrameId;

    fn next(&mut self) -> Option<FrameId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(current).iter().rev().copied());
        Some(current)
    }
}
