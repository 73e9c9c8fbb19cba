use crate::domain::TagRef;
use crate::error::{Result, TagBumpError};
use crate::git::{CommitInfo, HeadInfo, PushCredentials, Repository, Tagger};
use git2::{ObjectType, Oid};
use std::cell::RefCell;

/// Operation a [MockRepository] can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Log,
    CreateTag,
    Push,
}

/// An annotated tag recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedTag {
    pub name: String,
    pub target: Oid,
    pub tagger: String,
    pub message: String,
}

/// Mock repository for testing without actual git operations.
///
/// History is linear: each added commit becomes the child of the previous
/// one and the new HEAD.
pub struct MockRepository {
    commits: Vec<(Oid, CommitInfo)>,
    branch: Option<String>,
    tags: RefCell<Vec<TagRef>>,
    created: RefCell<Vec<CreatedTag>>,
    pushed: RefCell<Vec<(String, String)>>,
    failures: Vec<MockFailure>,
}

impl MockRepository {
    /// Create a new empty mock repository on branch `main`
    pub fn new() -> Self {
        MockRepository {
            commits: Vec::new(),
            branch: Some("main".to_string()),
            tags: RefCell::new(Vec::new()),
            created: RefCell::new(Vec::new()),
            pushed: RefCell::new(Vec::new()),
            failures: Vec::new(),
        }
    }

    /// Append a commit on top of HEAD and return its id
    pub fn add_commit(&mut self, message: &str) -> Oid {
        let n = self.commits.len() as u8 + 1;
        let oid = Oid::from_bytes(&[n; 20]).unwrap_or_else(|_| Oid::zero());
        self.commits.push((
            oid,
            CommitInfo {
                hash: oid.to_string(),
                message: message.to_string(),
            },
        ));
        oid
    }

    /// Add a tag pointing to a commit
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.tags.get_mut().push(TagRef::new(name, oid));
    }

    /// Set the checked-out branch; `None` detaches HEAD
    pub fn set_branch(&mut self, branch: Option<&str>) {
        self.branch = branch.map(str::to_string);
    }

    /// Make an operation fail
    pub fn fail_on(&mut self, failure: MockFailure) {
        self.failures.push(failure);
    }

    /// Tags created through [Repository::create_annotated_tag]
    pub fn created_tags(&self) -> Vec<CreatedTag> {
        self.created.borrow().clone()
    }

    /// `(remote, refspec)` pairs pushed so far
    pub fn pushed(&self) -> Vec<(String, String)> {
        self.pushed.borrow().clone()
    }

    fn fails(&self, failure: MockFailure) -> bool {
        self.failures.contains(&failure)
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn head(&self) -> Result<HeadInfo> {
        let (oid, _) = self
            .commits
            .last()
            .ok_or_else(|| TagBumpError::Git(git2::Error::from_str("reference 'HEAD' not found")))?;

        Ok(HeadInfo {
            oid: *oid,
            branch: self.branch.clone(),
        })
    }

    fn list_tags(&self) -> Result<Vec<TagRef>> {
        Ok(self.tags.borrow().clone())
    }

    fn commits_since(&self, from: Oid, stop: Option<Oid>) -> Result<Vec<CommitInfo>> {
        if self.fails(MockFailure::Log) {
            return Err(TagBumpError::Git(git2::Error::from_str("log unavailable")));
        }

        let start = self
            .commits
            .iter()
            .position(|(oid, _)| *oid == from)
            .ok_or_else(|| TagBumpError::Git(git2::Error::from_str("commit not found")))?;

        Ok(self.commits[..=start]
            .iter()
            .rev()
            .take_while(|(oid, _)| Some(*oid) != stop)
            .map(|(_, info)| info.clone())
            .collect())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.tags.borrow().iter().any(|tag| tag.name == name))
    }

    fn create_annotated_tag(
        &self,
        name: &str,
        target: Oid,
        tagger: &Tagger,
        message: &str,
    ) -> Result<Oid> {
        if self.fails(MockFailure::CreateTag) || self.tag_exists(name)? {
            return Err(TagBumpError::tag(format!("Cannot create tag '{}'", name)));
        }

        self.tags.borrow_mut().push(TagRef::new(name, target));
        self.created.borrow_mut().push(CreatedTag {
            name: name.to_string(),
            target,
            tagger: format!("{} <{}>", tagger.name, tagger.email),
            message: message.to_string(),
        });

        Ok(Oid::hash_object(ObjectType::Tag, name.as_bytes())?)
    }

    fn push(&self, remote: &str, refspec: &str, _credentials: &PushCredentials) -> Result<()> {
        if self.fails(MockFailure::Push) {
            return Err(TagBumpError::remote(format!(
                "Push of '{}' to '{}' failed",
                refspec, remote
            )));
        }

        self.pushed
            .borrow_mut()
            .push((remote.to_string(), refspec.to_string()));
        Ok(())
    }
}
