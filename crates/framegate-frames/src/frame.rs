//! Browsing Contexts

use framegate_security::{SandboxFlags, SecurityError, SecurityOrigin};
use url::Url;

use crate::FrameId;

/// Everything the embedder supplies when a frame is created
#[derive(Debug, Clone)]
pub struct FrameInit {
    pub name: Option<String>,
    pub url: Option<Url>,
    pub origin: SecurityOrigin,
    /// Restrictions from the frame's own `sandbox` attribute
    pub sandbox: SandboxFlags,
    pub is_remote: bool,
}

impl FrameInit {
    /// Frame with an initial document of the given origin and no URL
    pub fn new(origin: SecurityOrigin) -> Self {
        Self {
            name: None,
            url: None,
            origin,
            sandbox: SandboxFlags::NONE,
            is_remote: false,
        }
    }

    /// Frame whose document was loaded from `url`
    pub fn from_url(url: Url) -> Self {
        let mut init = Self::new(SecurityOrigin::from_url(&url));
        init.url = Some(url);
        init
    }

    /// Parse `url` and build a frame for it
    pub fn parse(url: &str) -> Result<Self, SecurityError> {
        let parsed = Url::parse(url.trim()).map_err(|source| SecurityError::InvalidUrl {
            input: url.to_string(),
            source,
        })?;
        Ok(Self::from_url(parsed))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn sandboxed(mut self, flags: SandboxFlags) -> Self {
        self.sandbox = flags;
        self
    }

    pub fn remote(mut self) -> Self {
        self.is_remote = true;
        self
    }
}

/// Documents sandboxed without `allow-same-origin` get a unique opaque origin
pub(crate) fn sandboxed_origin(origin: SecurityOrigin, flags: SandboxFlags) -> SecurityOrigin {
    if flags.has(SandboxFlags::ORIGIN) {
        SecurityOrigin::opaque()
    } else {
        origin
    }
}

/// A browsing context stored in the frame tree
#[derive(Debug, Clone)]
pub struct Frame {
    pub(crate) name: Option<String>,
    pub(crate) url: Option<Url>,
    pub(crate) origin: SecurityOrigin,
    /// Effective flags, including those inherited from the parent
    pub(crate) sandbox_flags: SandboxFlags,
    pub(crate) is_remote: bool,
    pub(crate) has_received_user_gesture: bool,
    pub(crate) parent: Option<FrameId>,
    pub(crate) children: Vec<FrameId>,
    /// Weak; may point at a destroyed frame
    pub(crate) opener: Option<FrameId>,
}

impl Frame {
    pub(crate) fn new(init: FrameInit, parent: Option<FrameId>, sandbox_flags: SandboxFlags) -> Self {
        Self {
            name: init.name,
            url: init.url,
            origin: sandboxed_origin(init.origin, sandbox_flags),
            sandbox_flags,
            is_remote: init.is_remote,
            has_received_user_gesture: false,
            parent,
            children: Vec::new(),
            opener: None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn origin(&self) -> &SecurityOrigin {
        &self.origin
    }

    pub fn sandbox_flags(&self) -> SandboxFlags {
        self.sandbox_flags
    }

    pub fn is_remote(&self) -> bool {
        self.is_remote
    }

    pub fn has_received_user_gesture(&self) -> bool {
        self.has_received_user_gesture
    }

    pub fn parent(&self) -> Option<FrameId> {
        self.parent
    }

    pub fn children(&self) -> &[FrameId] {
        &self.children
    }

    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }
}
