use tag_bump::boundary::BoundaryWarning;
use tag_bump::cli::orchestration::{run_bump_workflow, BumpWorkflowArgs};
use tag_bump::config::Config;
use tag_bump::domain::{BumpPolicy, Convention, PolicyKind, ReleaseLine, NOTHING_NEW};
use tag_bump::git::mock::{MockFailure, MockRepository};
use tag_bump::git::PushCredentials;
use tag_bump::TagBumpError;

fn credentials() -> PushCredentials {
    PushCredentials {
        username: "USER_NAME".to_string(),
        token: Some("token".to_string()),
    }
}

fn release_line_config() -> Config {
    let mut config = Config::default();
    config.versioning.policy = PolicyKind::ReleaseLine;
    config.versioning.convention = Convention::SemVer;
    config.versioning.prefix = String::new();
    config
}

#[test]
fn test_build_number_bump_creates_and_pushes() {
    let mut repo = MockRepository::new();
    let tagged = repo.add_commit("initial\n");
    repo.add_tag("v1.2.3-4", tagged);
    let fix = repo.add_commit("fix login\n");
    let head = repo.add_commit("add export\n");

    let result = run_bump_workflow(
        &repo,
        &Config::default(),
        &BumpWorkflowArgs::default(),
        &credentials(),
    )
    .unwrap();

    assert_eq!(result.previous_tag.as_deref(), Some("v1.2.3-4"));
    assert_eq!(result.tag, "v1.2.3-5");
    assert_eq!(result.policy, BumpPolicy::BuildNumber);
    assert_eq!(result.message, "* add export\n* fix login\n");
    assert_eq!(result.commits, vec![head.to_string(), fix.to_string()]);
    assert!(result.created);
    assert!(result.pushed);

    let created = repo.created_tags();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].name, "v1.2.3-5");
    assert_eq!(created[0].target, head);
    assert_eq!(created[0].tagger, "whiteblock <developer@whiteblock.co>");

    assert_eq!(
        repo.pushed(),
        vec![(
            "origin".to_string(),
            "+refs/tags/v1.2.3-5:refs/tags/v1.2.3-5".to_string()
        )]
    );
}

#[test]
fn test_unset_build_number_bumps_patch() {
    let mut repo = MockRepository::new();
    let tagged = repo.add_commit("initial\n");
    repo.add_tag("v1.2.3-0", tagged);
    repo.add_commit("change\n");

    let result = run_bump_workflow(
        &repo,
        &Config::default(),
        &BumpWorkflowArgs::default(),
        &credentials(),
    )
    .unwrap();

    assert_eq!(result.tag, "v1.2.4-1");
}

#[test]
fn test_without_prefix_toggle() {
    let mut repo = MockRepository::new();
    let tagged = repo.add_commit("initial\n");
    repo.add_tag("v1.2.3-4", tagged);

    let mut config = Config::default();
    config.apply_env(|key| (key == "WITHOUT_V").then(|| "true".to_string()));

    let result =
        run_bump_workflow(&repo, &config, &BumpWorkflowArgs::default(), &credentials()).unwrap();
    assert_eq!(result.tag, "1.2.3-5");
}

#[test]
fn test_unprefixed_history_stays_unprefixed() {
    let mut repo = MockRepository::new();
    let tagged = repo.add_commit("initial\n");
    repo.add_tag("1.2.3-4", tagged);

    let mut config = Config::default();
    config.apply_env(|key| (key == "WITHOUT_V").then(|| "false".to_string()));

    let result =
        run_bump_workflow(&repo, &config, &BumpWorkflowArgs::default(), &credentials()).unwrap();
    assert_eq!(result.tag, "1.2.3-5");
}

#[test]
fn test_extra_dash_suffix_keeps_build_number() {
    let mut repo = MockRepository::new();
    let tagged = repo.add_commit("initial\n");
    repo.add_tag("v1.2.3-4-5", tagged);
    repo.add_commit("change\n");

    let result = run_bump_workflow(
        &repo,
        &Config::default(),
        &BumpWorkflowArgs::default(),
        &credentials(),
    )
    .unwrap();

    assert_eq!(result.tag, "v1.2.3-5");
}

#[test]
fn test_exhausted_build_number_fails_before_tagging() {
    let mut repo = MockRepository::new();
    let tagged = repo.add_commit("initial\n");
    repo.add_tag("v1.2.3-18446744073709551615", tagged);
    repo.add_commit("change\n");

    let err = run_bump_workflow(
        &repo,
        &Config::default(),
        &BumpWorkflowArgs::default(),
        &credentials(),
    )
    .unwrap_err();

    assert!(matches!(err, TagBumpError::Overflow(_)));
    assert!(repo.created_tags().is_empty());
    assert!(repo.pushed().is_empty());
}

#[test]
fn test_first_tag_in_empty_history() {
    let mut repo = MockRepository::new();
    repo.add_commit("first\n");
    repo.add_commit("second\n");

    let result = run_bump_workflow(
        &repo,
        &Config::default(),
        &BumpWorkflowArgs::default(),
        &credentials(),
    )
    .unwrap();

    assert_eq!(result.previous_tag, None);
    assert_eq!(result.tag, "v0.0.1-1");
    assert_eq!(result.message, "* second\n* first\n");
}

#[test]
fn test_release_line_bump() {
    let mut repo = MockRepository::new();
    let a = repo.add_commit("a\n");
    let b = repo.add_commit("b\n");
    let c = repo.add_commit("c\n");
    repo.add_commit("d\n");
    repo.add_tag("2.5.0", a);
    repo.add_tag("2.5.1", b);
    repo.add_tag("2.6.0", c);
    repo.set_branch(Some("release/2.5"));

    let result = run_bump_workflow(
        &repo,
        &release_line_config(),
        &BumpWorkflowArgs::default(),
        &credentials(),
    )
    .unwrap();

    assert_eq!(result.tag, "2.5.2");
    assert_eq!(result.policy, BumpPolicy::ReleaseLine(ReleaseLine::new(2, 5)));
    assert_eq!(result.previous_tag.as_deref(), Some("2.5.1"));
    assert_eq!(result.message, "* d\n* c\n");
}

#[test]
fn test_release_line_without_matching_tags() {
    let mut repo = MockRepository::new();
    let a = repo.add_commit("a\n");
    repo.add_tag("2.6.0", a);
    repo.set_branch(Some("release/2.5"));

    let result = run_bump_workflow(
        &repo,
        &release_line_config(),
        &BumpWorkflowArgs::default(),
        &credentials(),
    )
    .unwrap();

    assert_eq!(result.tag, "2.5.0");
    assert_eq!(result.previous_tag, None);
}

#[test]
fn test_release_line_rejects_detached_head_before_tagging() {
    let mut repo = MockRepository::new();
    repo.add_commit("a\n");
    repo.set_branch(None);

    let err = run_bump_workflow(
        &repo,
        &release_line_config(),
        &BumpWorkflowArgs::default(),
        &credentials(),
    )
    .unwrap_err();

    assert!(matches!(err, TagBumpError::Precondition(_)));
    assert!(repo.created_tags().is_empty());
    assert!(repo.pushed().is_empty());
}

#[test]
fn test_release_line_rejects_other_branches() {
    let mut repo = MockRepository::new();
    repo.add_commit("a\n");
    repo.set_branch(Some("main"));

    let err = run_bump_workflow(
        &repo,
        &release_line_config(),
        &BumpWorkflowArgs::default(),
        &credentials(),
    )
    .unwrap_err();

    assert!(matches!(err, TagBumpError::Precondition(_)));
    assert!(repo.created_tags().is_empty());
}

#[test]
fn test_nothing_new_message() {
    let mut repo = MockRepository::new();
    let head = repo.add_commit("initial\n");
    repo.add_tag("v1.0.0-3", head);

    let result = run_bump_workflow(
        &repo,
        &Config::default(),
        &BumpWorkflowArgs::default(),
        &credentials(),
    )
    .unwrap();

    assert_eq!(result.message, NOTHING_NEW);
    assert!(result.commits.is_empty());
    assert!(result
        .warnings
        .iter()
        .any(|w| matches!(w, BoundaryWarning::NoNewCommits { latest_tag, .. } if latest_tag == "v1.0.0-3")));
}

#[test]
fn test_log_failure_degrades_to_fallback_message() {
    let mut repo = MockRepository::new();
    let tagged = repo.add_commit("initial\n");
    repo.add_tag("v1.0.0-1", tagged);
    repo.add_commit("change\n");
    repo.fail_on(MockFailure::Log);

    let result = run_bump_workflow(
        &repo,
        &Config::default(),
        &BumpWorkflowArgs::default(),
        &credentials(),
    )
    .unwrap();

    assert!(result.message.starts_with("Failed to summarize commit messages"));
    assert!(result.commits.is_empty());
    assert!(result.created);
    assert!(result
        .warnings
        .iter()
        .any(|w| matches!(w, BoundaryWarning::SummaryUnavailable { .. })));
}

#[test]
fn test_unparsable_tags_are_reported_not_fatal() {
    let mut repo = MockRepository::new();
    let tagged = repo.add_commit("initial\n");
    repo.add_tag("nightly", tagged);
    repo.add_tag("v2.0.0-7", tagged);
    repo.add_commit("change\n");

    let result = run_bump_workflow(
        &repo,
        &Config::default(),
        &BumpWorkflowArgs::default(),
        &credentials(),
    )
    .unwrap();

    assert_eq!(result.tag, "v2.0.0-8");
    assert_eq!(
        result.warnings,
        vec![BoundaryWarning::UnparsableTag {
            tag: "nightly".to_string(),
            reason: "expected MAJOR.MINOR.PATCH, found 1 component(s)".to_string(),
        }]
    );
}

#[test]
fn test_dry_run_creates_nothing() {
    let mut repo = MockRepository::new();
    let tagged = repo.add_commit("initial\n");
    repo.add_tag("v1.2.3-4", tagged);

    let args = BumpWorkflowArgs {
        dry_run: true,
        no_push: false,
    };
    let result = run_bump_workflow(&repo, &Config::default(), &args, &credentials()).unwrap();

    assert_eq!(result.tag, "v1.2.3-5");
    assert!(!result.created);
    assert!(!result.pushed);
    assert!(repo.created_tags().is_empty());
    assert!(repo.pushed().is_empty());
}

#[test]
fn test_no_push_creates_locally() {
    let mut repo = MockRepository::new();
    repo.add_commit("initial\n");

    let args = BumpWorkflowArgs {
        dry_run: false,
        no_push: true,
    };
    let result = run_bump_workflow(&repo, &Config::default(), &args, &credentials()).unwrap();

    assert!(result.created);
    assert!(!result.pushed);
    assert_eq!(repo.created_tags().len(), 1);
    assert!(repo.pushed().is_empty());
}

#[test]
fn test_tag_creation_failure_is_fatal_and_skips_push() {
    let mut repo = MockRepository::new();
    repo.add_commit("initial\n");
    repo.fail_on(MockFailure::CreateTag);

    let err = run_bump_workflow(
        &repo,
        &Config::default(),
        &BumpWorkflowArgs::default(),
        &credentials(),
    )
    .unwrap_err();

    assert!(matches!(err, TagBumpError::Tag(_)));
    assert!(repo.pushed().is_empty());
}

#[test]
fn test_push_failure_is_fatal() {
    let mut repo = MockRepository::new();
    repo.add_commit("initial\n");
    repo.fail_on(MockFailure::Push);

    let err = run_bump_workflow(
        &repo,
        &Config::default(),
        &BumpWorkflowArgs::default(),
        &credentials(),
    )
    .unwrap_err();

    assert!(matches!(err, TagBumpError::Remote(_)));
}
