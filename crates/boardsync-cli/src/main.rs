#![forbid(unsafe_code)]

mod github;

use std::env;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use boardsync_core::config::{CONFIG_FILE, PartialConfig, SyncConfig};
use github::GitHubClient;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "boardsync: sync markdown epics and stories to a GitHub Projects board",
    long_about = "Reads epic and story markdown records, resolves labels and hierarchy,\n\
                  orders stories by the priority manifest, and creates the issues on\n\
                  GitHub in dependency order: labels, then epics, then stories.\n\
                  One linear pass; the first error aborts with nothing rolled back.",
    after_help = "EXAMPLES:\n    # Sync using boardsync.toml in the current directory\n    bsync\n\n    # Override the target repository\n    bsync --owner acme --repo shop\n\n    # Point at a different source layout\n    bsync --epics-dir docs/epics --stories-dir docs/stories"
)]
struct Cli {
    /// Config file path.
    #[arg(long, value_name = "PATH", default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Repository owner (overrides the config file).
    #[arg(long)]
    owner: Option<String>,

    /// Repository name (overrides the config file).
    #[arg(long)]
    repo: Option<String>,

    /// GitHub API token. Falls back to the GITHUB_TOKEN env var.
    #[arg(long)]
    token: Option<String>,

    /// Directory of epic markdown files.
    #[arg(long, value_name = "DIR")]
    epics_dir: Option<PathBuf>,

    /// Directory of story markdown files.
    #[arg(long, value_name = "DIR")]
    stories_dir: Option<PathBuf>,

    /// Priority manifest path, one story id per line.
    #[arg(long, value_name = "PATH")]
    priority_file: Option<PathBuf>,

    /// Name of the reserved label attached to epic issues.
    #[arg(long)]
    epic_label: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Flag overrides in config shape, for overlaying on the file.
    fn overrides(&self) -> PartialConfig {
        PartialConfig {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            epics_dir: self.epics_dir.clone(),
            stories_dir: self.stories_dir.clone(),
            priority_file: self.priority_file.clone(),
            epic_label: self.epic_label.clone(),
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("BOARDSYNC_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "boardsync=debug,info"
        } else {
            "boardsync=info,warn"
        })
    });

    let format = env::var("BOARDSYNC_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file = PartialConfig::load(&cli.config)?;
    let token = cli.token.clone().or_else(|| env::var("GITHUB_TOKEN").ok());
    let config = SyncConfig::resolve(cli.overrides().over(file), token)?;

    info!(owner = %config.owner, repo = %config.repo, "starting sync");

    let mut client = GitHubClient::new(config.token.clone());
    let report = boardsync_core::sync(&mut client, &config)?;

    println!("{}", report.summary());
    info!(requests = client.request_count(), "sync complete");
    Ok(())
}
