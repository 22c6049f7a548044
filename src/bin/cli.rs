//! feedrelay CLI
//!
//! One invocation is one run; scheduling lives outside (cron or a CI
//! trigger). Overlapping invocations against the same seen file are
//! not supported.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use feedrelay::{
    error::Result,
    models::{Config, DeliveryOutcome, Post},
    pipeline,
    services::{Deliver, FeedFetcher, WebhookDelivery},
    storage::SeenFile,
    utils::http,
};

/// feedrelay - Social feed watcher and webhook relay
#[derive(Parser, Debug)]
#[command(
    name = "feedrelay",
    version,
    about = "Watches social feeds and relays new posts to an automation webhook"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check every source and deliver new posts to the webhook
    Check,

    /// Fetch and print the latest post per source, without delivering
    Latest,

    /// Send a synthetic sample payload to the webhook
    TestWebhook,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(&cli.config)?;
    log::info!("loaded configuration from {}", cli.config.display());

    config.validate()?;
    let config = Arc::new(config);

    let client = http::create_async_client(&config.fetch)?;
    let fetcher = FeedFetcher::new(Arc::clone(&config), client.clone());
    let delivery = WebhookDelivery::new(client, &config.webhook);
    let seen_file = SeenFile::new(&config.seen.path, config.seen.mode);

    match cli.command {
        Command::Check => {
            let summary = pipeline::run_once(
                &fetcher,
                &delivery,
                &seen_file,
                &config.sources,
                config.fetch.max_concurrent,
            )
            .await?;

            for outcome in &summary.outcomes {
                log::info!("  {}: {}", outcome.identity, outcome.outcome.label());
            }
        }

        Command::Latest => {
            let results = pipeline::run_latest(
                &fetcher,
                &config.sources,
                config.fetch.max_concurrent,
            )
            .await;

            for (identity, result) in results {
                match result {
                    Ok(post) => {
                        log::info!("{}: {}", identity, post.url);
                        if !post.title.is_empty() {
                            log::info!("  title: {}", post.title);
                        }
                        if !post.text.is_empty() {
                            log::info!("  text: {}", post.text);
                        }
                    }
                    Err(err) => log::warn!("{}: {}", identity, err),
                }
            }
        }

        Command::TestWebhook => {
            let sample = Post::sample();
            log::info!("sending sample payload to {}", config.webhook.url);
            match delivery.deliver(&sample).await {
                DeliveryOutcome::Sent => log::info!("webhook test: sent"),
                DeliveryOutcome::FailedHttp(code) => {
                    log::error!("webhook test failed: HTTP {}", code)
                }
                other => log::error!("webhook test failed: {}", other.label()),
            }
        }

        Command::Validate => {
            log::info!(
                "✓ Config OK ({} sources, webhook set, seen file: {})",
                config.sources.len(),
                config.seen.path
            );
        }
    }

    Ok(())
}
