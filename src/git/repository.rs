use crate::domain::TagRef;
use crate::error::{Result, TagBumpError};
use crate::git::{CommitInfo, HeadInfo, PushCredentials, Tagger};
use git2::{Oid, Repository as Git2Repo};
use std::path::Path;
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| {
            TagBumpError::precondition(format!(
                "Not in a git repository ({}): {}",
                path.display(),
                e.message()
            ))
        })?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

impl super::Repository for Git2Repository {
    fn head(&self) -> Result<HeadInfo> {
        let head = self.repo.head()?;
        let oid = head.peel_to_commit()?.id();
        let branch = if head.is_branch() {
            head.shorthand().map(str::to_string)
        } else {
            None
        };

        Ok(HeadInfo { oid, branch })
    }

    fn list_tags(&self) -> Result<Vec<TagRef>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            match reference.peel_to_commit() {
                Ok(commit) => tags.push(TagRef::new(name, commit.id())),
                Err(e) => debug!(tag = name, "tag does not point at a commit: {}", e),
            }
        }

        Ok(tags)
    }

    fn commits_since(&self, from: Oid, stop: Option<Oid>) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;
        revwalk.push(from)?;
        if let Some(stop) = stop {
            revwalk.hide(stop)?;
        }

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;

            let message = commit.message().unwrap_or("(empty message)").to_string();

            commits.push(CommitInfo {
                hash: oid.to_string(),
                message,
            });
        }

        Ok(commits)
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(TagBumpError::tag(format!(
                "Cannot look up tag '{}': {}",
                name, e
            ))),
        }
    }

    fn create_annotated_tag(
        &self,
        name: &str,
        target: Oid,
        tagger: &Tagger,
        message: &str,
    ) -> Result<Oid> {
        let object = self
            .repo
            .find_object(target, None)
            .map_err(|e| TagBumpError::tag(format!("Cannot find object {}: {}", target, e)))?;
        let signature = tagger.signature()?;

        self.repo
            .tag(name, &object, &signature, message, false)
            .map_err(|e| TagBumpError::tag(format!("Cannot create tag '{}': {}", name, e)))
    }

    fn push(&self, remote: &str, refspec: &str, credentials: &PushCredentials) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| TagBumpError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            match &credentials.token {
                Some(token) if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT) => {
                    git2::Cred::userpass_plaintext(&credentials.username, token)
                }
                _ if allowed_types.contains(git2::CredentialType::SSH_KEY) => {
                    git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                }
                _ => git2::Cred::default(),
            }
        });

        // A rejected ref is reported here rather than as a push error
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "remote rejected {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        remote.push(&[refspec], Some(&mut push_options)).map_err(|e| {
            if e.class() == git2::ErrorClass::Net {
                TagBumpError::remote(format!("Network error during push: {}", e))
            } else {
                TagBumpError::remote(format!("Push of '{}' failed: {}", refspec, e))
            }
        })
    }
}
