mod config;

use clap::{Parser, Subcommand};
use config::DaybriefConfig;
use daybrief_agent::ProviderSelector;
use daybrief_channels::{ChatPlatformClient, SlackClient};
use daybrief_orchestrator::{DigestComposer, PipelineRunner, Scheduler};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "daybrief", about = "Daybrief — daily channel digests for Slack")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "daybrief.toml")]
    config: PathBuf,

    /// Human-readable logs instead of JSON
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Digest today's messages once and exit
    Run,
    /// Digest on the configured cron schedule until interrupted
    Schedule,
    /// List the channels the bot is a member of
    Channels,
}

fn init_tracing(pretty: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if pretty {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.pretty);

    let config = DaybriefConfig::load(&cli.config).await?;

    // Leaf collaborators first, then the pipeline that consumes them.
    let platform: Arc<dyn ChatPlatformClient> =
        Arc::new(SlackClient::new(config.slack.clone()));

    match cli.command {
        Commands::Channels => {
            let channels = platform.list_member_channels().await?;
            if channels.is_empty() {
                println!("The bot is not a member of any channel.");
            } else {
                for channel in &channels {
                    println!("  {}  #{}", channel.id, channel.name);
                }
                println!("\nTotal: {} channel(s)", channels.len());
            }
        }
        Commands::Run => {
            let runner = build_runner(&config, platform)?;
            // Channel-level failures are logged by the runner and do not
            // change the exit status.
            let report = runner.run().await?;
            println!(
                "Delivered {}, quiet {}, skipped {}, failed {}",
                report.delivered(),
                report.quiet(),
                report.skipped(),
                report.failed()
            );
        }
        Commands::Schedule => {
            let runner = Arc::new(build_runner(&config, platform)?);
            let scheduler = Scheduler::new(&config.schedule)?;
            info!(cron = %config.schedule.cron, "Starting Daybrief scheduler");

            let mut handle = scheduler.start(runner);
            tokio::select! {
                result = &mut handle => {
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown requested, stopping scheduler");
                    handle.abort();
                }
            }
        }
    }

    Ok(())
}

fn build_runner(
    config: &DaybriefConfig,
    platform: Arc<dyn ChatPlatformClient>,
) -> anyhow::Result<PipelineRunner> {
    let providers = ProviderSelector::from_config(&config.ai)?;
    let composer = DigestComposer::new(providers);
    Ok(PipelineRunner::new(
        platform,
        composer,
        config.pipeline.clone(),
    ))
}
