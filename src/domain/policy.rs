//! Next-version derivation
//!
//! A single policy enum covers the three ways the next tag can be derived:
//! bumping a legacy build number, bumping the patch, or bumping the patch
//! inside the release line named by the checked-out branch.

use crate::domain::tag::{find_latest, Discovery, TagRef};
use crate::domain::{Convention, ReleaseLine, Version};
use crate::error::{Result, TagBumpError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Policy as selected in configuration, before the branch is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    #[default]
    BuildNumber,
    Patch,
    ReleaseLine,
}

impl PolicyKind {
    /// Turn the configured kind into a concrete policy.
    ///
    /// # Errors
    /// For [`PolicyKind::ReleaseLine`], fails with a precondition error when
    /// `branch` is `None` (detached HEAD) or not a release branch.
    pub fn resolve(self, branch: Option<&str>) -> Result<BumpPolicy> {
        match self {
            PolicyKind::BuildNumber => Ok(BumpPolicy::BuildNumber),
            PolicyKind::Patch => Ok(BumpPolicy::Patch),
            PolicyKind::ReleaseLine => ReleaseLine::from_head(branch).map(BumpPolicy::ReleaseLine),
        }
    }

    /// Conventions this policy can work with
    pub fn supports(self, convention: Convention) -> bool {
        !matches!(
            (self, convention),
            (PolicyKind::BuildNumber, Convention::SemVer)
        )
    }
}

impl FromStr for PolicyKind {
    type Err = TagBumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "build-number" | "build" => Ok(PolicyKind::BuildNumber),
            "patch" => Ok(PolicyKind::Patch),
            "release-line" | "release" => Ok(PolicyKind::ReleaseLine),
            other => Err(TagBumpError::config(format!(
                "Unknown bump policy '{}' (expected build-number, patch or release-line)",
                other
            ))),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::BuildNumber => write!(f, "build-number"),
            PolicyKind::Patch => write!(f, "patch"),
            PolicyKind::ReleaseLine => write!(f, "release-line"),
        }
    }
}

/// How the next version is derived from the latest one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpPolicy {
    /// `1.2.3-4` → `1.2.3-5`; `1.2.3` or `1.2.3-0` → `1.2.4-1`
    BuildNumber,
    /// `1.2.3` → `1.2.4`
    Patch,
    /// Patch bump restricted to one `major.minor` line; starts at `M.m.0`
    ReleaseLine(ReleaseLine),
}

impl BumpPolicy {
    /// Whether a tag's version takes part in latest-tag discovery
    pub fn accepts(&self, version: &Version) -> bool {
        match self {
            BumpPolicy::ReleaseLine(line) => line.contains(version),
            _ => true,
        }
    }

    /// Derive the version following `latest`.
    ///
    /// The result keeps the latest tag's prefix; `default_prefix` is used when
    /// there is no latest tag.
    ///
    /// # Errors
    /// Returns [`TagBumpError::Overflow`] when the component to increment is
    /// already `u64::MAX`.
    pub fn next(&self, latest: Option<&Version>, default_prefix: &str) -> Result<Version> {
        let prefix = latest.map_or(default_prefix, |v| v.prefix.as_str());
        let base = latest.cloned().unwrap_or_else(Version::zero);

        let next = match self {
            BumpPolicy::BuildNumber if base.build_number() == 0 => {
                Version::new(base.major, base.minor, increment(&base, base.patch)?)
                    .with_build_number(1)
            }
            BumpPolicy::BuildNumber => Version::new(base.major, base.minor, base.patch)
                .with_build_number(increment(&base, base.build_number())?),
            BumpPolicy::Patch => {
                Version::new(base.major, base.minor, increment(&base, base.patch)?)
            }
            BumpPolicy::ReleaseLine(line) => match latest {
                Some(v) => Version::new(line.major, line.minor, increment(v, v.patch)?),
                None => line.first_version(),
            },
        };

        Ok(next.with_prefix(prefix))
    }
}

fn increment(version: &Version, component: u64) -> Result<u64> {
    component.checked_add(1).ok_or_else(|| {
        TagBumpError::overflow(format!("'{}' cannot be bumped any further", version))
    })
}

impl fmt::Display for BumpPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpPolicy::BuildNumber => write!(f, "build-number"),
            BumpPolicy::Patch => write!(f, "patch"),
            BumpPolicy::ReleaseLine(line) => write!(f, "release-line {}", line),
        }
    }
}

/// The derived version together with what it was derived from
#[derive(Debug, Clone)]
pub struct NextVersion {
    pub discovery: Discovery,
    pub version: Version,
}

impl NextVersion {
    pub fn tag_name(&self) -> String {
        self.version.to_string()
    }
}

/// Discover the latest applicable tag and derive the next version from it
pub fn plan_next(
    tags: &[TagRef],
    policy: &BumpPolicy,
    convention: Convention,
    default_prefix: &str,
) -> Result<NextVersion> {
    let discovery = find_latest(tags, convention, |v| policy.accepts(v));
    let version = policy.next(
        discovery.latest.as_ref().map(|tag| &tag.version),
        default_prefix,
    )?;

    Ok(NextVersion { discovery, version })
}
