use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tag_bump::cli::{run_bump_workflow, BumpWorkflowArgs, WorkflowResult};
use tag_bump::config;
use tag_bump::domain::{Convention, PolicyKind};
use tag_bump::git::Git2Repository;
use tag_bump::ui;

#[derive(clap::Parser)]
#[command(
    name = "tag-bump",
    about = "Create and push the next version tag derived from git tag history"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Path to the git repository (default: current directory)")]
    repo: Option<String>,

    #[arg(long, help = "Remote to push the new tag to")]
    remote: Option<String>,

    #[arg(short, long, help = "Bump policy: build-number, patch or release-line")]
    policy: Option<PolicyKind>,

    #[arg(long, help = "Tag convention: legacy or semver")]
    convention: Option<Convention>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Create the tag locally without pushing it")]
    no_push: bool,

    #[arg(short, long, help = "Show debug logs")]
    verbose: bool,

    #[arg(long, help = "Print version information")]
    version: bool,
}

fn main() {
    let args = Args::parse();

    if args.version {
        println!("tag-bump {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    init_logging(args.verbose);

    // The only place that terminates the process; CI reads the exit status
    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "tag_bump=debug"
    } else {
        "tag_bump=error"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let mut config =
        config::load_config(args.config.as_deref()).context("Error loading config")?;
    config.apply_env(|key| std::env::var(key).ok());

    if let Some(path) = args.repo {
        config.repository.path = path;
    }
    if let Some(remote) = args.remote {
        config.repository.remote = remote;
    }
    if let Some(policy) = args.policy {
        config.versioning.policy = policy;
    }
    if let Some(convention) = args.convention {
        config.versioning.convention = convention;
    }
    config.validate()?;

    let repo = Git2Repository::open(&config.repository.path)?;
    let credentials = config.push.credentials(|key| std::env::var(key).ok());
    let workflow_args = BumpWorkflowArgs {
        dry_run: args.dry_run,
        no_push: args.no_push,
    };

    ui::display_status(&format!(
        "Bumping version with the {} policy",
        config.versioning.policy
    ));
    let result = run_bump_workflow(&repo, &config, &workflow_args, &credentials)
        .context("Version bump failed")?;

    report(&result, &config.repository.remote);
    Ok(())
}

fn report(result: &WorkflowResult, remote: &str) {
    for warning in &result.warnings {
        ui::display_boundary_warning(warning);
    }

    ui::display_proposed_tag(result.previous_tag.as_deref(), &result.tag);
    ui::display_tag_message(&result.message);
    if !result.commits.is_empty() {
        ui::display_status(&format!("{} commit(s) since the previous tag", result.commits.len()));
    }

    if !result.created {
        ui::display_status(&format!("Dry run: tag {} was not created", result.tag));
    } else if result.pushed {
        ui::display_success(&format!("Success to bump version: {}", result.tag));
    } else {
        ui::display_success(&format!("Created tag: {}", result.tag));
        ui::display_manual_push_instruction(&result.tag, remote);
    }
}
