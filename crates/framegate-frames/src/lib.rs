//! framegate Frames
//!
//! Browsing-context tree with generation-checked handles.
//!
//! Parent/child edges are owned by the tree. Opener edges are weak: they are
//! stored as plain [`FrameId`]s and resolve to nothing once the opener has
//! been destroyed.

mod frame;
mod generation;
mod names;
mod tree;
mod view;

use std::fmt;

pub use frame::{Frame, FrameInit};
pub use generation::Generation;
pub use tree::FrameTree;
pub use view::{Ancestors, Descendants, FrameTreeView};

/// Frame identifier (arena index + generation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId {
    pub(crate) index: u32,
    pub(crate) generation: Generation,
}

impl FrameId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> Generation {
        self.generation
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}v{}", self.index, self.generation.value())
    }
}

/// Frame tree error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameTreeError {
    #[error("Unknown or destroyed frame: {0}")]
    UnknownFrame(FrameId),

    #[error("Frame arena exhausted")]
    ArenaExhausted,

    #[error(transparent)]
    Security(#[from] framegate_security::SecurityError),
}
