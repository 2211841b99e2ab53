use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::CaptionError;

// @module: Video identifier resolution

// @const: Reference shapes, tried in order; the first match wins
static REFERENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Standard watch page: youtube.com/watch?...v=ID, first v wins
        r"youtube\.com/watch\?(?:[^#]*?&)?v=([A-Za-z0-9_-]+)",
        // Short link: youtu.be/ID
        r"youtu\.be/([A-Za-z0-9_-]+)",
        // Embedded player: youtube.com/embed/ID
        r"youtube\.com/embed/([A-Za-z0-9_-]+)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

// @const: Domain fragments that disqualify a bare token
const PLATFORM_DOMAINS: [&str; 2] = ["youtube.com", "youtu.be"];

/// Opaque platform-assigned token naming one video
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoIdentifier(String);

impl VideoIdentifier {
    /// Resolve a free-form reference (watch URL, short link, embed URL,
    /// or bare identifier) into a video identifier.
    ///
    /// The URL shapes are tried in a fixed order and the first one that
    /// matches decides the result. Only when none matches is the input
    /// taken as a bare identifier, and then only if it has no path
    /// separator and does not mention the platform domain.
    pub fn from_reference(reference: &str) -> Result<Self, CaptionError> {
        let input = reference.trim();

        for pattern in REFERENCE_PATTERNS.iter() {
            if let Some(captures) = pattern.captures(input) {
                if let Some(id) = captures.get(1) {
                    return Ok(Self(id.as_str().to_string()));
                }
            }
        }

        let looks_bare = !input.is_empty()
            && !input.contains('/')
            && !PLATFORM_DOMAINS.iter().any(|domain| input.contains(domain));

        if looks_bare {
            Ok(Self(input.to_string()))
        } else {
            Err(CaptionError::InvalidReference {
                reference: reference.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for VideoIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for VideoIdentifier {
    type Err = CaptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_reference(s)
    }
}
