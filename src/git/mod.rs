//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the handful of Git
//! operations tag-bump needs, so the bump workflow can run against a real
//! repository or an in-memory mock.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: a mock implementation for testing
//!
//! ```rust
//! # use tag_bump::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> tag_bump::Result<()> {
//! let head = repo.head()?;
//! let commits = repo.commits_since(head.oid, None)?;
//! println!("{} commits reachable from HEAD", commits.len());
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::TagRef;
use crate::error::{Result, TagBumpError};
use chrono::{DateTime, FixedOffset, Utc};
use git2::Oid;

/// Commit information used to build the tag message
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The commit hash
    pub hash: String,
    /// The commit message
    pub message: String,
}

/// Where HEAD points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadInfo {
    /// Commit HEAD resolves to
    pub oid: Oid,
    /// Short branch name, `None` when HEAD is detached
    pub branch: Option<String>,
}

/// Identity written into annotated tags
#[derive(Debug, Clone, PartialEq)]
pub struct Tagger {
    pub name: String,
    pub email: String,
    pub when: DateTime<FixedOffset>,
}

impl Tagger {
    /// Tagger stamped with the current time in a fixed UTC offset
    pub fn now(
        name: impl Into<String>,
        email: impl Into<String>,
        utc_offset_hours: i32,
    ) -> Result<Self> {
        let offset = utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                TagBumpError::config(format!("Invalid UTC offset: {} hours", utc_offset_hours))
            })?;

        Ok(Tagger {
            name: name.into(),
            email: email.into(),
            when: Utc::now().with_timezone(&offset),
        })
    }

    /// Convert into a libgit2 signature
    pub fn signature(&self) -> Result<git2::Signature<'static>> {
        let offset_minutes = self.when.offset().local_minus_utc() / 60;
        let time = git2::Time::new(self.when.timestamp(), offset_minutes);
        Ok(git2::Signature::new(&self.name, &self.email, &time)?)
    }
}

/// Credentials for pushing over HTTP(S)
#[derive(Clone, PartialEq, Eq)]
pub struct PushCredentials {
    pub username: String,
    pub token: Option<String>,
}

impl std::fmt::Debug for PushCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushCredentials")
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Ref-spec that force-pushes one tag under the same name
pub fn tag_refspec(tag_name: &str) -> String {
    format!("+refs/tags/{0}:refs/tags/{0}", tag_name)
}

/// Common git operation trait for abstraction
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to [crate::error::TagBumpError]
/// variants.
pub trait Repository {
    /// Commit and branch HEAD points at
    fn head(&self) -> Result<HeadInfo>;

    /// All tags with the commit each one points at.
    ///
    /// Annotated tags are peeled to their commit; tags that do not point at
    /// a commit are left out.
    fn list_tags(&self) -> Result<Vec<TagRef>>;

    /// Commits reachable from `from` but not from `stop`, newest first.
    ///
    /// With `stop` set to `None` the whole history of `from` is returned.
    fn commits_since(&self, from: Oid, stop: Option<Oid>) -> Result<Vec<CommitInfo>>;

    /// Whether a tag with this name already exists
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Create an annotated tag on `target`, returning the tag object id
    fn create_annotated_tag(
        &self,
        name: &str,
        target: Oid,
        tagger: &Tagger,
        message: &str,
    ) -> Result<Oid>;

    /// Push a single ref-spec to a remote
    fn push(&self, remote: &str, refspec: &str, credentials: &PushCredentials) -> Result<()>;
}
