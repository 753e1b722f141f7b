#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! checkwait: waits for named GitHub checks on a ref and reports one verdict.

use std::process::ExitCode;
use std::time::Duration;

use checkwait_core::model::PollOutcome;
use checkwait_core::poll::{poll, PollOptions};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod github;

use crate::github::GithubChecks;

#[derive(Parser, Debug)]
#[command(name = "checkwait")]
struct Args {
    /// Comma-separated check names to wait for.
    #[arg(long)]
    checks: String,

    /// Repository owner.
    #[arg(long)]
    owner: String,

    /// Repository name.
    #[arg(long)]
    repo: String,

    /// Commit SHA, branch, or tag the checks run against.
    #[arg(long)]
    git_ref: String,

    /// Total wall-clock budget in seconds.
    #[arg(long, default_value_t = 600)]
    timeout_seconds: u64,

    /// Delay between poll rounds in seconds.
    #[arg(long, default_value_t = 10)]
    interval_seconds: u64,

    /// Bearer token; falls back to $GITHUB_TOKEN, unauthenticated if neither
    /// is set.
    #[arg(long)]
    token: Option<String>,

    /// API base URL, e.g. https://ghe.example.com/api/v3 for Enterprise.
    #[arg(long, default_value = "https://api.github.com")]
    api_url: String,

    /// Log level (env-filter syntax).
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(args.log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let token = args
        .token
        .or_else(|| std::env::var("GITHUB_TOKEN").ok());
    let client = GithubChecks::new(args.api_url, token)?;

    let opts = PollOptions {
        check_names: args.checks,
        timeout: Duration::from_secs(args.timeout_seconds),
        interval: Duration::from_secs(args.interval_seconds),
        owner: args.owner,
        repo: args.repo,
        git_ref: args.git_ref,
    };

    let outcome = poll(&client, |message| tracing::info!("{message}"), &opts).await?;

    println!("{outcome}");
    Ok(match outcome {
        PollOutcome::Success => ExitCode::SUCCESS,
        PollOutcome::Failure => ExitCode::from(1),
        PollOutcome::TimedOut => ExitCode::from(2),
    })
}
