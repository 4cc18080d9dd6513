//! Security Origin
//!
//! Web origin model and the access check used between browsing contexts.

use std::fmt;

use url::{Host, Origin, Url};

use crate::SecurityError;

/// Security origin of a browsing context's current document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityOrigin {
    origin: Origin,
    local: bool,
    /// Value assigned through `document.domain`, if any
    domain: Option<String>,
    universal_access: bool,
}

impl SecurityOrigin {
    /// Origin of a document loaded from `url`
    ///
    /// Network schemes produce a scheme/host/port tuple. Everything else,
    /// `file:` included, gets a fresh opaque origin.
    pub fn from_url(url: &Url) -> Self {
        Self {
            origin: url.origin(),
            local: url.scheme() == "file",
            domain: None,
            universal_access: false,
        }
    }

    /// Parse a URL and take its origin
    pub fn parse(input: &str) -> Result<Self, SecurityError> {
        let url = Url::parse(input.trim()).map_err(|source| SecurityError::InvalidUrl {
            input: input.to_string(),
            source,
        })?;
        Ok(Self::from_url(&url))
    }

    /// Create a unique opaque origin
    pub fn opaque() -> Self {
        Self {
            origin: Origin::new_opaque(),
            local: false,
            domain: None,
            universal_access: false,
        }
    }

    /// Local (file-like) origins get relaxed ancestor access
    pub fn is_local(&self) -> bool {
        self.local
    }

    pub fn is_opaque(&self) -> bool {
        !self.origin.is_tuple()
    }

    pub fn scheme(&self) -> Option<&str> {
        match &self.origin {
            Origin::Tuple(scheme, _, _) => Some(scheme),
            Origin::Opaque(_) => None,
        }
    }

    pub fn host(&self) -> Option<&Host<String>> {
        match &self.origin {
            Origin::Tuple(_, host, _) => Some(host),
            Origin::Opaque(_) => None,
        }
    }

    /// Effective port (scheme default if the URL had none)
    pub fn port(&self) -> Option<u16> {
        match &self.origin {
            Origin::Tuple(_, _, port) => Some(*port),
            Origin::Opaque(_) => None,
        }
    }

    /// Domain set through `document.domain`
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn has_universal_access(&self) -> bool {
        self.universal_access
    }

    /// Let this origin access every other origin
    pub fn grant_universal_access(&mut self) {
        self.universal_access = true;
    }

    /// Scheme, host and port all match (or both are the same opaque origin)
    pub fn is_same_origin(&self, other: &SecurityOrigin) -> bool {
        self.origin == other.origin
    }

    /// Relax this origin by assigning `document.domain`
    ///
    /// The new value must be the current host or one of its parent domains
    /// with at least two labels. IP addresses and opaque origins cannot be
    /// relaxed.
    pub fn set_domain(&mut self, new_domain: &str) -> Result<(), SecurityError> {
        let candidate = new_domain.trim_end_matches('.').to_ascii_lowercase();
        let accepted = match &self.origin {
            Origin::Tuple(_, Host::Domain(host), _) => {
                candidate == *host
                    || (candidate.contains('.')
                        && host
                            .strip_suffix(candidate.as_str())
                            .is_some_and(|prefix| prefix.ends_with('.')))
            }
            _ => false,
        };

        if !accepted {
            return Err(SecurityError::InvalidDomain {
                domain: new_domain.to_string(),
                origin: self.to_string(),
            });
        }

        self.domain = Some(candidate);
        Ok(())
    }

    /// Whether a document with this origin may script one with `other`
    pub fn can_access(&self, other: &SecurityOrigin) -> bool {
        if self.universal_access {
            return true;
        }

        if self.is_opaque() || other.is_opaque() {
            return self.origin == other.origin;
        }

        match (&self.domain, &other.domain) {
            (None, None) => self.origin == other.origin,
            (Some(domain), Some(other_domain)) => {
                self.scheme() == other.scheme() && domain == other_domain
            }
            _ => false,
        }
    }
}

impl fmt::Display for SecurityOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.origin.ascii_serialization())
    }
}
