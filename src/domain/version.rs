use crate::error::{Result, TagBumpError};
use once_cell::sync::Lazy;
use regex::Regex;
use semver::{BuildMetadata, Prerelease};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Full semantic-version tag grammar with an optional lowercase prefix
static SEMVER_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^([a-z]*)(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)",
        r"(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?",
        r"(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
    ))
    .unwrap()
});

/// Which suffix convention tags are read with.
///
/// Chosen once per invocation; the two conventions are never mixed in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Convention {
    /// `1.2.3-4`: a dash-encoded build counter, lenient numeric parsing
    #[default]
    #[serde(rename = "legacy")]
    Legacy,
    /// `1.2.3-rc.1+meta`: strict semantic-version grammar
    #[serde(rename = "semver")]
    SemVer,
}

impl FromStr for Convention {
    type Err = TagBumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(Convention::Legacy),
            "semver" => Ok(Convention::SemVer),
            other => Err(TagBumpError::config(format!(
                "Unknown tag convention '{}' (expected 'legacy' or 'semver')",
                other
            ))),
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convention::Legacy => write!(f, "legacy"),
            Convention::SemVer => write!(f, "semver"),
        }
    }
}

/// Text following `major.minor.patch`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Suffix {
    #[default]
    None,
    /// Legacy counter, rendered as `-N`
    BuildNumber(u64),
    /// Semantic-version pre-release and build metadata; at least one is non-empty
    SemVer {
        pre: Prerelease,
        build: BuildMetadata,
    },
}

/// A version read from (or rendered into) a tag name.
///
/// Immutable by convention: bumping produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Version {
    pub prefix: String,
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub suffix: Suffix,
}

impl Version {
    /// Create a prefix-less version with no suffix
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            prefix: String::new(),
            major,
            minor,
            patch,
            suffix: Suffix::None,
        }
    }

    /// The implicit starting point of latest-tag discovery
    pub fn zero() -> Self {
        Version::new(0, 0, 0)
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_build_number(mut self, build_number: u64) -> Self {
        self.suffix = Suffix::BuildNumber(build_number);
        self
    }

    pub fn with_suffix(mut self, suffix: Suffix) -> Self {
        self.suffix = suffix;
        self
    }

    /// Legacy build number; 0 when none has been set
    pub fn build_number(&self) -> u64 {
        match self.suffix {
            Suffix::BuildNumber(n) => n,
            _ => 0,
        }
    }

    /// Non-empty pre-release identifier, if any
    pub fn pre_release(&self) -> Option<&Prerelease> {
        match &self.suffix {
            Suffix::SemVer { pre, .. } if !pre.is_empty() => Some(pre),
            _ => None,
        }
    }

    /// Non-empty build metadata, if any
    pub fn build_metadata(&self) -> Option<&BuildMetadata> {
        match &self.suffix {
            Suffix::SemVer { build, .. } if !build.is_empty() => Some(build),
            _ => None,
        }
    }

    /// Parse a tag name under the given convention.
    ///
    /// # Errors
    /// Returns [`TagBumpError::MalformedTag`] naming the tag when it does not
    /// have three dot-separated components (legacy) or does not match the
    /// semantic-version grammar (semver).
    ///
    /// # Example
    /// ```
    /// # use tag_bump::domain::{Convention, Version};
    /// let v = Version::parse("v1.2.3-4", Convention::Legacy).unwrap();
    /// assert_eq!((v.major, v.minor, v.patch, v.build_number()), (1, 2, 3, 4));
    /// assert_eq!(v.to_string(), "v1.2.3-4");
    /// ```
    pub fn parse(tag: &str, convention: Convention) -> Result<Self> {
        match convention {
            Convention::Legacy => Self::parse_legacy(tag),
            Convention::SemVer => Self::parse_semver(tag),
        }
    }

    fn parse_legacy(tag: &str) -> Result<Self> {
        let (prefix, body) = split_prefix(tag);

        let parts: Vec<&str> = body.split('.').collect();
        if parts.len() != 3 {
            return Err(TagBumpError::malformed(
                tag,
                format!("expected MAJOR.MINOR.PATCH, found {} component(s)", parts.len()),
            ));
        }

        // Unreadable numbers count as 0 rather than rejecting the tag.
        // Only the text up to a second dash is the build number.
        let mut patch_parts = parts[2].split('-');
        let patch = lenient(patch_parts.next().unwrap_or_default());
        let suffix = match patch_parts.next() {
            Some(build) => Suffix::BuildNumber(lenient(build)),
            None => Suffix::None,
        };

        Ok(Version {
            prefix: prefix.to_string(),
            major: lenient(parts[0]),
            minor: lenient(parts[1]),
            patch,
            suffix,
        })
    }

    fn parse_semver(tag: &str) -> Result<Self> {
        let captures = SEMVER_TAG
            .captures(tag)
            .ok_or_else(|| TagBumpError::malformed(tag, "not a semantic version"))?;

        let number = |index: usize| -> Result<u64> {
            captures[index]
                .parse::<u64>()
                .map_err(|_| TagBumpError::malformed(tag, "numeric component out of range"))
        };

        let pre = match captures.get(5) {
            Some(m) => Prerelease::new(m.as_str())
                .map_err(|e| TagBumpError::malformed(tag, e.to_string()))?,
            None => Prerelease::EMPTY,
        };
        let build = match captures.get(6) {
            Some(m) => BuildMetadata::new(m.as_str())
                .map_err(|e| TagBumpError::malformed(tag, e.to_string()))?,
            None => BuildMetadata::EMPTY,
        };
        let suffix = if pre.is_empty() && build.is_empty() {
            Suffix::None
        } else {
            Suffix::SemVer { pre, build }
        };

        Ok(Version {
            prefix: captures[1].to_string(),
            major: number(2)?,
            minor: number(3)?,
            patch: number(4)?,
            suffix,
        })
    }

    /// Precedence of `self` relative to `other`.
    ///
    /// Compares major, minor and patch, then pre-release (a release outranks
    /// its pre-releases), then the legacy build number. Prefix and build
    /// metadata never take part.
    pub fn precedence(&self, other: &Version) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| compare_pre_release(self.pre_release(), other.pre_release()))
            .then(self.build_number().cmp(&other.build_number()))
    }
}

/// True unless `candidate` orders strictly below `reference`; ties count as newer.
pub fn is_newer(candidate: &Version, reference: &Version) -> bool {
    candidate.precedence(reference) != Ordering::Less
}

fn compare_pre_release(a: Option<&Prerelease>, b: Option<&Prerelease>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

fn lenient(component: &str) -> u64 {
    component.parse::<u64>().unwrap_or(0)
}

/// Split a leading run of letters (plus one `-`/`_` right before a digit) off the tag
fn split_prefix(tag: &str) -> (&str, &str) {
    let mut end = tag.bytes().take_while(u8::is_ascii_alphabetic).count();
    let rest = tag[end..].as_bytes();
    if rest.len() > 1 && matches!(rest[0], b'-' | b'_') && rest[1].is_ascii_digit() {
        end += 1;
    }
    tag.split_at(end)
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}.{}.{}",
            self.prefix, self.major, self.minor, self.patch
        )?;
        match &self.suffix {
            Suffix::None => Ok(()),
            Suffix::BuildNumber(n) => write!(f, "-{}", n),
            Suffix::SemVer { pre, build } => {
                if !pre.is_empty() {
                    write!(f, "-{}", pre)?;
                }
                if !build.is_empty() {
                    write!(f, "+{}", build)?;
                }
                Ok(())
            }
        }
    }
}
