//! Frame Generations
//!
//! Each arena slot carries a generation counter that is bumped whenever the
//! frame occupying it is destroyed. A [`FrameId`](crate::FrameId) remembers the
//! generation it was issued at, so handles to destroyed frames never resolve
//! again, even after the slot is reused.

/// Generation counter - incremented on every slot release
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Generation(u32);

impl Generation {
    /// Generation of a never-used slot
    pub const INITIAL: Self = Generation(0);

    #[inline]
    pub const fn new(value: u32) -> Self {
        Generation(value)
    }

    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Get the next generation
    #[inline]
    pub const fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }

    /// A slot whose counter wrapped around must not be handed out again
    #[inline]
    pub const fn is_exhausted(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self::INITIAL
    }
}
