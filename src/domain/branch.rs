use crate::domain::Version;
use crate::error::{Result, TagBumpError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static RELEASE_BRANCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^release/(\d+)\.(\d+)$").unwrap());

/// A `major.minor` release line, tracked by a `release/<major>.<minor>` branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseLine {
    pub major: u64,
    pub minor: u64,
}

impl ReleaseLine {
    pub fn new(major: u64, minor: u64) -> Self {
        ReleaseLine { major, minor }
    }

    /// Read the release line from the checked-out branch.
    ///
    /// `None` means HEAD is detached.
    ///
    /// # Errors
    /// Returns [`TagBumpError::Precondition`] when HEAD is not a branch or the
    /// branch is not named `release/<major>.<minor>`.
    pub fn from_head(branch: Option<&str>) -> Result<Self> {
        let branch = branch.ok_or_else(|| {
            TagBumpError::precondition("HEAD is not a branch; check out a release/<major>.<minor> branch")
        })?;
        Self::from_branch(branch)
    }

    /// Parse a branch name such as `release/2.5`
    pub fn from_branch(branch: &str) -> Result<Self> {
        let mismatch = || {
            TagBumpError::precondition(format!(
                "Branch '{}' does not match release/<major>.<minor>",
                branch
            ))
        };

        let captures = RELEASE_BRANCH.captures(branch).ok_or_else(mismatch)?;
        let major = captures[1].parse::<u64>().map_err(|_| mismatch())?;
        let minor = captures[2].parse::<u64>().map_err(|_| mismatch())?;

        Ok(ReleaseLine { major, minor })
    }

    /// Whether `version` belongs to this line
    pub fn contains(&self, version: &Version) -> bool {
        version.major == self.major && version.minor == self.minor
    }

    /// `major.minor.0` on this line
    pub fn first_version(&self) -> Version {
        Version::new(self.major, self.minor, 0)
    }
}

impl fmt::Display for ReleaseLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
