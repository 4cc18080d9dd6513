//! Sandbox
//!
//! iframe sandbox restrictions.

use bitflags::bitflags;

bitflags! {
    /// Restrictions applied to a sandboxed browsing context.
    ///
    /// A set bit is a restriction; the empty set means the context is not
    /// sandboxed at all.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct SandboxFlags: u32 {
        const NAVIGATION = 1;
        const PLUGINS = 1 << 1;
        const ORIGIN = 1 << 2;
        const FORMS = 1 << 3;
        const SCRIPTS = 1 << 4;
        const TOP_NAVIGATION = 1 << 5;
        const POPUPS = 1 << 6;
        const AUTOMATIC_FEATURES = 1 << 7;
        const POINTER_LOCK = 1 << 8;
        const DOCUMENT_DOMAIN = 1 << 9;
        const ORIENTATION_LOCK = 1 << 10;
        const PROPAGATES_TO_AUXILIARY_BROWSING_CONTEXTS = 1 << 11;
        const MODALS = 1 << 12;
        const PRESENTATION_CONTROLLER = 1 << 13;
    }
}

/// `allow-*` tokens and the restrictions each one lifts
const ALLOW_TOKENS: &[(&str, SandboxFlags)] = &[
    ("allow-same-origin", SandboxFlags::ORIGIN),
    ("allow-forms", SandboxFlags::FORMS),
    (
        "allow-scripts",
        SandboxFlags::SCRIPTS.union(SandboxFlags::AUTOMATIC_FEATURES),
    ),
    ("allow-top-navigation", SandboxFlags::TOP_NAVIGATION),
    ("allow-popups", SandboxFlags::POPUPS),
    ("allow-pointer-lock", SandboxFlags::POINTER_LOCK),
    ("allow-orientation-lock", SandboxFlags::ORIENTATION_LOCK),
    (
        "allow-popups-to-escape-sandbox",
        SandboxFlags::PROPAGATES_TO_AUXILIARY_BROWSING_CONTEXTS,
    ),
    ("allow-modals", SandboxFlags::MODALS),
    ("allow-presentation", SandboxFlags::PRESENTATION_CONTROLLER),
];

impl SandboxFlags {
    /// Not sandboxed
    pub const NONE: Self = Self::empty();

    /// Check if a restriction is in effect
    pub fn has(self, flag: SandboxFlags) -> bool {
        self.contains(flag)
    }

    pub fn is_sandboxed(self) -> bool {
        self != Self::NONE
    }

    /// Parse a `sandbox` attribute value
    pub fn parse(attribute: &str) -> SandboxPolicy {
        let mut flags = Self::all();
        let mut invalid_tokens = Vec::new();

        for token in attribute.split_ascii_whitespace() {
            match ALLOW_TOKENS
                .iter()
                .find(|(name, _)| token.eq_ignore_ascii_case(name))
            {
                Some((_, lifted)) => flags.remove(*lifted),
                None => invalid_tokens.push(token.to_string()),
            }
        }

        SandboxPolicy {
            flags,
            invalid_tokens,
        }
    }

    /// Serialize to the `allow-*` tokens whose restrictions are lifted
    pub fn to_attribute(self) -> String {
        ALLOW_TOKENS
            .iter()
            .filter(|(_, lifted)| !self.intersects(*lifted))
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of parsing a `sandbox` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxPolicy {
    pub flags: SandboxFlags,
    pub invalid_tokens: Vec<String>,
}

impl SandboxPolicy {
    /// Console message describing unrecognized tokens
    pub fn error_message(&self) -> Option<String> {
        match self.invalid_tokens.as_slice() {
            [] => None,
            [token] => Some(format!("'{}' is an invalid sandbox flag.", token)),
            tokens => {
                let quoted = tokens
                    .iter()
                    .map(|t| format!("'{}'", t))
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(format!("{} are invalid sandbox flags.", quoted))
            }
        }
    }
}
