use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result};
use dailycall::Config;
use dailycall::job::{build_daily_job, build_email_source, build_summarizer, summarize_within};
use dailycall::runtime::observability::LogObserver;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Run { dry_run } => run_daily(&config, dry_run || config.job.dry_run).await,
        Commands::Summarize => summarize_only(&config).await,
    }
}

async fn run_daily(config: &Config, dry_run: bool) -> Result<()> {
    let job = build_daily_job(config, dry_run)?;
    let report = job.run(dry_run).await?;
    info!(
        unread_count = report.unread_count,
        summary_id = %report.summary_id,
        call_sid = report.call_sid.as_deref().unwrap_or("-"),
        "daily.done"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to render report")?
    );
    Ok(())
}

async fn summarize_only(config: &Config) -> Result<()> {
    let summarizer = build_summarizer(config, Arc::new(LogObserver::new()));
    let source = build_email_source(config)?;
    let timeout = Duration::from_secs(config.summarizer.timeout_secs);

    let summary = summarize_within(&summarizer, source, timeout).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to render summary")?
    );
    Ok(())
}
