//! Main workflow orchestration logic
//!
//! Keeps the bump workflow independent of clap and of the process: it returns
//! a [WorkflowResult] or an error, and only `main` decides how to exit.

use tracing::{debug, info, warn};

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::summary::{fallback_message, summarize};
use crate::domain::{plan_next, BumpPolicy, ParsedTag};
use crate::error::{Result, TagBumpError};
use crate::git::{tag_refspec, HeadInfo, PushCredentials, Repository, Tagger};

/// Per-invocation switches that are not part of the configuration file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BumpWorkflowArgs {
    /// Compute the tag and message, but create and push nothing
    pub dry_run: bool,

    /// Create the tag locally without pushing it
    pub no_push: bool,
}

/// Result of a bump workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The latest tag the new version was derived from
    pub previous_tag: Option<String>,

    /// The new tag name
    pub tag: String,

    /// The policy that derived it
    pub policy: BumpPolicy,

    /// The annotated tag message
    pub message: String,

    /// Hashes of the commits listed in the message, newest first
    pub commits: Vec<String>,

    /// Whether the tag was created locally
    pub created: bool,

    /// Whether the tag was pushed to the remote
    pub pushed: bool,

    /// Non-fatal issues met along the way
    pub warnings: Vec<BoundaryWarning>,
}

/// Main bump workflow
///
/// 1. Resolve HEAD and the bump policy (release-line policies need a release branch)
/// 2. Discover the latest tag and derive the next version
/// 3. Summarize the commits since the latest tag
/// 4. Create the annotated tag on HEAD
/// 5. Push it unless pushing is disabled
///
/// Nothing is created when any step before 4 fails, and nothing is pushed
/// when tag creation fails.
pub fn run_bump_workflow<R: Repository>(
    repo: &R,
    config: &Config,
    args: &BumpWorkflowArgs,
    credentials: &PushCredentials,
) -> Result<WorkflowResult> {
    let versioning = &config.versioning;

    let head = repo.head()?;
    let policy = versioning.policy.resolve(head.branch.as_deref())?;
    info!(%policy, convention = %versioning.convention, head = %head.oid, "deriving next version");

    let tags = repo.list_tags()?;
    let next = plan_next(&tags, &policy, versioning.convention, &versioning.prefix)?;

    let version = if versioning.without_prefix {
        next.version.with_prefix("")
    } else {
        next.version
    };
    let tag = version.to_string();
    let previous = next.discovery.latest;
    let mut warnings = next.discovery.warnings;

    match &previous {
        Some(prev) => info!(previous = %prev.name, next = %tag, "latest tag found"),
        None => info!(next = %tag, "no previous tag"),
    }

    if repo.tag_exists(&tag)? {
        return Err(TagBumpError::tag(format!("Tag '{}' already exists", tag)));
    }

    let tagger = Tagger::now(
        config.tagger.name.as_str(),
        config.tagger.email.as_str(),
        config.tagger.utc_offset_hours,
    )?;
    let (message, commits) = build_message(repo, &head, previous.as_ref(), &mut warnings)?;

    let mut result = WorkflowResult {
        previous_tag: previous.map(|prev| prev.name),
        tag,
        policy,
        message,
        commits,
        created: false,
        pushed: false,
        warnings,
    };

    if args.dry_run {
        info!(tag = %result.tag, "dry run, nothing created");
        return Ok(result);
    }

    repo.create_annotated_tag(&result.tag, head.oid, &tagger, &result.message)?;
    result.created = true;
    info!(tag = %result.tag, target = %head.oid, "created annotated tag");

    if config.push.enabled && !args.no_push {
        let refspec = tag_refspec(&result.tag);
        repo.push(&config.repository.remote, &refspec, credentials)?;
        result.pushed = true;
        info!(remote = %config.repository.remote, %refspec, "pushed tag");
    }

    Ok(result)
}

/// Summarize the commits between HEAD and the previous tag.
///
/// Returns the message and the hashes of the summarized commits. A failure
/// of the version-control layer only degrades the message.
fn build_message<R: Repository>(
    repo: &R,
    head: &HeadInfo,
    previous: Option<&ParsedTag>,
    warnings: &mut Vec<BoundaryWarning>,
) -> Result<(String, Vec<String>)> {
    match repo.commits_since(head.oid, previous.map(|prev| prev.target)) {
        Ok(commits) => {
            if let (true, Some(prev)) = (commits.is_empty(), previous) {
                warnings.push(BoundaryWarning::NoNewCommits {
                    latest_tag: prev.name.clone(),
                    current_commit_hash: head.oid.to_string(),
                });
            }
            for commit in &commits {
                debug!(commit = %commit.hash, "summarizing commit");
            }
            let messages: Vec<&str> = commits.iter().map(|c| c.message.as_str()).collect();
            let hashes = commits.iter().map(|c| c.hash.clone()).collect();
            Ok((summarize(&messages), hashes))
        }
        Err(e) if e.is_collaborator_failure() => {
            warn!("cannot read commit log: {}", e);
            let reason = e.to_string();
            warnings.push(BoundaryWarning::SummaryUnavailable {
                reason: reason.clone(),
            });
            Ok((fallback_message(&reason), Vec::new()))
        }
        Err(e) => Err(e),
    }
}
