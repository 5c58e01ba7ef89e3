//! Semantic version value with prerelease and build metadata.
//!
//! Versions are immutable: every operation returns a new value. Identifiers
//! inside the prerelease and build metadata are restricted to
//! `[0-9A-Za-z-]+` (see <https://semver.org/#spec-item-9>).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced while building or resolving a version
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Cannot parse tag '{tag}' as a semantic version: {reason}")]
    TagParse { tag: String, reason: String },

    #[error(
        "HEAD is detached with no commits since the last tag; this is likely a lightweight git tag, \
         please use an annotated tag for helm-release to function properly"
    )]
    AmbiguousTag,

    #[error("Invalid {kind} identifier '{identifier}': only [0-9A-Za-z-] is allowed")]
    InvalidIdentifier {
        kind: &'static str,
        identifier: String,
    },

    #[error("An explicit bump (major, minor or patch) is required when using the {origin} source")]
    BumpRequired { origin: &'static str },

    #[error("Unknown bump kind '{0}': major, minor, and patch are the only valid options")]
    UnknownBump(String),

    #[error("Cannot increment the {component} component of {version}: it is already at its maximum")]
    Overflow {
        component: &'static str,
        version: String,
    },
}

/// Version bump applied in explicit mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
}

impl FromStr for BumpKind {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "major" => Ok(BumpKind::Major),
            "minor" => Ok(BumpKind::Minor),
            "patch" => Ok(BumpKind::Patch),
            _ => Err(VersionError::UnknownBump(s.to_string())),
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpKind::Major => write!(f, "major"),
            BumpKind::Minor => write!(f, "minor"),
            BumpKind::Patch => write!(f, "patch"),
        }
    }
}

/// Semantic version representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    prerelease: Vec<String>,
    build: Vec<String>,
}

impl SemanticVersion {
    /// Create a release version with no prerelease or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            prerelease: Vec::new(),
            build: Vec::new(),
        }
    }

    /// Parse a full semantic version such as `1.2.3-rc.1+build.5`.
    ///
    /// All three numeric components are required.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let parsed = semver::Version::parse(input).map_err(|e| VersionError::TagParse {
            tag: input.to_string(),
            reason: e.to_string(),
        })?;

        Ok(SemanticVersion {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            prerelease: split_identifiers(parsed.pre.as_str(), "prerelease")?,
            build: split_identifiers(parsed.build.as_str(), "build metadata")?,
        })
    }

    pub fn prerelease(&self) -> &[String] {
        &self.prerelease
    }

    pub fn build_metadata(&self) -> &[String] {
        &self.build
    }

    /// Next major release; minor and patch reset to zero
    pub fn increment_major(&self) -> Result<Self, VersionError> {
        Ok(SemanticVersion::new(self.checked_next(self.major, "major")?, 0, 0))
    }

    pub fn increment_minor(&self) -> Result<Self, VersionError> {
        Ok(SemanticVersion::new(
            self.major,
            self.checked_next(self.minor, "minor")?,
            0,
        ))
    }

    pub fn increment_patch(&self) -> Result<Self, VersionError> {
        Ok(SemanticVersion::new(
            self.major,
            self.minor,
            self.checked_next(self.patch, "patch")?,
        ))
    }

    /// Apply a single increment of the given kind
    pub fn bump(&self, kind: BumpKind) -> Result<Self, VersionError> {
        match kind {
            BumpKind::Major => self.increment_major(),
            BumpKind::Minor => self.increment_minor(),
            BumpKind::Patch => self.increment_patch(),
        }
    }

    fn checked_next(&self, value: u64, component: &'static str) -> Result<u64, VersionError> {
        value.checked_add(1).ok_or_else(|| VersionError::Overflow {
            component,
            version: self.to_string(),
        })
    }

    /// Replace the prerelease with the dot-separated identifiers in `pre`.
    ///
    /// Empty segments are dropped, so `"0..feature"` yields `0.feature`.
    pub fn with_prerelease(&self, pre: &str) -> Result<Self, VersionError> {
        Ok(SemanticVersion {
            prerelease: split_identifiers(pre, "prerelease")?,
            ..self.clone()
        })
    }

    /// Replace the build metadata with the dot-separated identifiers in `build`
    pub fn with_build_metadata(&self, build: &str) -> Result<Self, VersionError> {
        Ok(SemanticVersion {
            build: split_identifiers(build, "build metadata")?,
            ..self.clone()
        })
    }

    /// The same version without build metadata
    pub fn without_build_metadata(&self) -> Self {
        SemanticVersion {
            build: Vec::new(),
            ..self.clone()
        }
    }

    /// Compare by semver precedence; build metadata is ignored.
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| compare_prerelease(&self.prerelease, &other.prerelease))
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.prerelease.is_empty() {
            write!(f, "-{}", self.prerelease.join("."))?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build.join("."))?;
        }
        Ok(())
    }
}

impl FromStr for SemanticVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SemanticVersion::parse(s)
    }
}

/// Whether `s` is a single valid prerelease or build identifier
pub fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn split_identifiers(input: &str, kind: &'static str) -> Result<Vec<String>, VersionError> {
    input
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if is_identifier(segment) {
                Ok(segment.to_string())
            } else {
                Err(VersionError::InvalidIdentifier {
                    kind,
                    identifier: segment.to_string(),
                })
            }
        })
        .collect()
}

fn compare_prerelease(left: &[String], right: &[String]) -> Ordering {
    // A release has higher precedence than any of its prereleases
    match (left.is_empty(), right.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    for (a, b) in left.iter().zip(right.iter()) {
        let ordering = compare_identifier(a, b);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    left.len().cmp(&right.len())
}

fn compare_identifier(a: &str, b: &str) -> Ordering {
    let a_numeric = a.bytes().all(|c| c.is_ascii_digit());
    let b_numeric = b.bytes().all(|c| c.is_ascii_digit());

    match (a_numeric, b_numeric) {
        (true, true) => {
            let a = a.trim_start_matches('0');
            let b = b.trim_start_matches('0');
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}
