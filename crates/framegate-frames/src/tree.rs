//! Frame Tree (arena-based allocation)

use framegate_security::{SandboxFlags, SecurityOrigin};
use url::Url;

use crate::frame::sandboxed_origin;
use crate::{Frame, FrameId, FrameInit, FrameTreeError, FrameTreeView, Generation};

#[derive(Debug, Default)]
struct Slot {
    generation: Generation,
    frame: Option<Frame>,
}

/// Arena-based forest of browsing contexts
#[derive(Debug, Default)]
pub struct FrameTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Top-level frames in creation order
    roots: Vec<FrameId>,
    live: usize,
}

impl FrameTree {
    /// Create a new empty frame tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a frame by ID
    pub fn get(&self, id: FrameId) -> Option<&Frame> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.frame.as_ref()
    }

    fn get_mut(&mut self, id: FrameId) -> Result<&mut Frame, FrameTreeError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.frame.as_mut())
            .ok_or(FrameTreeError::UnknownFrame(id))
    }

    pub fn contains(&self, id: FrameId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live frames
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Top-level frames in creation order
    pub fn top_level_frames(&self) -> &[FrameId] {
        &self.roots
    }

    fn insert(&mut self, frame: Frame) -> Result<FrameId, FrameTreeError> {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let index =
                    u32::try_from(self.slots.len()).map_err(|_| FrameTreeError::ArenaExhausted)?;
                self.slots.push(Slot::default());
                index
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.frame = Some(frame);
        self.live += 1;
        Ok(FrameId {
            index,
            generation: slot.generation,
        })
    }

    /// Create a new top-level browsing context (window or tab)
    pub fn create_top_level(&mut self, init: FrameInit) -> Result<FrameId, FrameTreeError> {
        let flags = init.sandbox;
        let id = self.insert(Frame::new(init, None, flags))?;
        self.roots.push(id);
        tracing::trace!("Created top-level {}", id);
        Ok(id)
    }

    /// Create a nested browsing context under `parent`
    ///
    /// The child's effective sandbox flags are its own flags plus everything
    /// its parent is already restricted by.
    pub fn create_child(
        &mut self,
        parent: FrameId,
        init: FrameInit,
    ) -> Result<FrameId, FrameTreeError> {
        let inherited = self
            .get(parent)
            .ok_or(FrameTreeError::UnknownFrame(parent))?
            .sandbox_flags;
        let flags = inherited | init.sandbox;

        let id = self.insert(Frame::new(init, Some(parent), flags))?;
        self.get_mut(parent)?.children.push(id);
        tracing::trace!(
            "Created {} under {} (sandbox: {:?})",
            id,
            parent,
            flags.to_attribute()
        );
        Ok(id)
    }

    /// Open a new top-level context on behalf of `opener`
    ///
    /// With `noopener` the new context keeps no reference back. Sandboxes
    /// that propagate to auxiliary contexts are copied onto the new one.
    pub fn open_auxiliary(
        &mut self,
        opener: FrameId,
        init: FrameInit,
        noopener: bool,
    ) -> Result<FrameId, FrameTreeError> {
        let opener_flags = self
            .get(opener)
            .ok_or(FrameTreeError::UnknownFrame(opener))?
            .sandbox_flags;

        let mut flags = init.sandbox;
        if opener_flags.has(SandboxFlags::PROPAGATES_TO_AUXILIARY_BROWSING_CONTEXTS) {
            flags |= opener_flags;
        }

        let id = self.insert(Frame::new(init, None, flags))?;
        self.roots.push(id);
        if !noopener {
            self.get_mut(id)?.opener = Some(opener);
        }
        tracing::trace!("Opened auxiliary {} from {}", id, opener);
        Ok(id)
    }

    /// Destroy a frame and its whole subtree
    pub fn destroy(&mut self, id: FrameId) -> Result<(), FrameTreeError> {
        let parent = self.get(id).ok_or(FrameTreeError::UnknownFrame(id))?.parent;
        let doomed: Vec<FrameId> = self.descendants(id).collect();

        match parent {
            Some(parent) => self.get_mut(parent)?.children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }

        for frame in doomed {
            let slot = &mut self.slots[frame.index as usize];
            slot.frame = None;
            slot.generation = slot.generation.next();
            if !slot.generation.is_exhausted() {
                self.free.push(frame.index);
            }
            self.live -= 1;
        }

        tracing::trace!("Destroyed {}", id);
        Ok(())
    }

    /// A new document was committed in `id`
    ///
    /// The origin is recomputed from `url` (opaque while the sandbox keeps the
    /// origin restriction) and the user-gesture latch resets.
    pub fn commit_navigation(&mut self, id: FrameId, url: Url) -> Result<(), FrameTreeError> {
        let frame = self.get_mut(id)?;
        frame.origin = sandboxed_origin(SecurityOrigin::from_url(&url), frame.sandbox_flags);
        frame.url = Some(url);
        frame.has_received_user_gesture = false;
        Ok(())
    }

    pub fn set_origin(&mut self, id: FrameId, origin: SecurityOrigin) -> Result<(), FrameTreeError> {
        self.get_mut(id)?.origin = origin;
        Ok(())
    }

    /// Script assigned `document.domain`
    pub fn set_document_domain(&mut self, id: FrameId, domain: &str) -> Result<(), FrameTreeError> {
        self.get_mut(id)?.origin.set_domain(domain)?;
        Ok(())
    }

    /// Latch the user-gesture bit for the current document
    pub fn notify_user_gesture(&mut self, id: FrameId) -> Result<(), FrameTreeError> {
        self.get_mut(id)?.has_received_user_gesture = true;
        Ok(())
    }

    pub fn set_name(&mut self, id: FrameId, name: Option<String>) -> Result<(), FrameTreeError> {
        self.get_mut(id)?.name = name;
        Ok(())
    }

    /// Replace (or disown, with `None`) a frame's opener
    pub fn set_opener(&mut self, id: FrameId, opener: Option<FrameId>) -> Result<(), FrameTreeError> {
        if let Some(opener) = opener {
            if !self.contains(opener) {
                return Err(FrameTreeError::UnknownFrame(opener));
            }
        }
        self.get_mut(id)?.opener = opener;
        Ok(())
    }

    pub fn set_remote(&mut self, id: FrameId, is_remote: bool) -> Result<(), FrameTreeError> {
        self.get_mut(id)?.is_remote = is_remote;
        Ok(())
    }
}

impl FrameTreeView for FrameTree {
    fn is_alive(&self, frame: FrameId) -> bool {
        self.contains(frame)
    }

    fn parent(&self, frame: FrameId) -> Option<FrameId> {
        self.get(frame)?.parent
    }

    fn children(&self, frame: FrameId) -> &[FrameId] {
        match self.get(frame) {
            Some(f) => &f.children,
            None => &[],
        }
    }

    fn opener(&self, frame: FrameId) -> Option<FrameId> {
        self.get(frame)?.opener.filter(|opener| self.contains(*opener))
    }

    fn origin(&self, frame: FrameId) -> Option<&SecurityOrigin> {
        self.get(frame).map(|f| &f.origin)
    }

    fn sandbox_flags(&self, frame: FrameId) -> SandboxFlags {
        self.get(frame).map_or(SandboxFlags::NONE, |f| f.sandbox_flags)
    }

    fn is_remote(&self, frame: FrameId) -> bool {
        self.get(frame).is_some_and(|f| f.is_remote)
    }

    fn has_received_user_gesture(&self, frame: FrameId) -> bool {
        self.get(frame).is_some_and(|f| f.has_received_user_gesture)
    }

    fn url(&self, frame: FrameId) -> Option<&Url> {
        self.get(frame)?.url.as_ref()
    }

    fn find_by_name(&self, from: FrameId, name: &str) -> Option<FrameId> {
        self.find_named(from, name)
    }
}
