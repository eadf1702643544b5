//! WISE daemon: replays a recorded chain dataset through the synchronizer.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use wise_daemon::{init_logging, DaemonConfig, DaemonEvent, LogFormat, StopHandle, Synchronizer};
use wise_nullables::{Dataset, FakeApi};

#[derive(Parser)]
#[command(name = "wise-daemon", about = "WISE delegated voting synchronizer")]
struct Cli {
    /// Path to a TOML configuration file. CLI flags and env vars override it.
    #[arg(long, env = "WISE_CONFIG")]
    config: Option<PathBuf>,

    /// JSON dataset describing the chain to replay.
    #[arg(long, env = "WISE_DATASET")]
    dataset: PathBuf,

    /// Delegator whose vote orders are answered.
    #[arg(long, env = "WISE_DELEGATOR")]
    delegator: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "WISE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit newline-delimited JSON logs.
    #[arg(long, env = "WISE_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the synchronizer over the dataset up to its head block.
    Replay {
        /// First block to scan (overrides the config file).
        #[arg(long)]
        start_height: Option<u64>,

        /// Push confirmations to the in-memory chain instead of running dry.
        #[arg(long)]
        send: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DaemonConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => DaemonConfig::default(),
    };
    if let Some(delegator) = cli.delegator {
        config.delegator = delegator;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        config.log_format()?
    };
    init_logging(format, &config.log_level)?;

    match cli.command {
        Command::Replay { start_height, send } => {
            if let Some(start) = start_height {
                config.start_height = start;
            }
            config.send_enabled |= send;

            let raw = std::fs::read_to_string(&cli.dataset)
                .with_context(|| format!("reading {}", cli.dataset.display()))?;
            let dataset = Dataset::from_json_str(&raw).context("parsing dataset")?;
            let api = Arc::new(FakeApi::from_dataset(dataset));
            config.stop_at_height = config.stop_at_height.or(Some(api.head()));

            tracing::info!(
                delegator = %config.delegator,
                head = api.head(),
                send = config.send_enabled,
                "replaying dataset"
            );

            let (sync, mut events) = Synchronizer::from_config(api.clone(), &config)?;
            let stop = Arc::new(StopHandle::new());
            let handle = sync.spawn(stop.subscribe());
            let signal = stop.clone();
            tokio::spawn(async move { signal.wait_for_signal().await });

            while let Some(event) = events.recv().await {
                if let DaemonEvent::OperationConfirmed {
                    voteorder,
                    voter,
                    accepted,
                    message,
                    ..
                } = &event
                {
                    let verdict = if *accepted { "accepted" } else { "rejected" };
                    println!("{voteorder} @{voter}: {verdict} {message}");
                }
                if event.is_terminal() {
                    break;
                }
            }

            let (_sync, result) = handle.await.context("synchronizer task panicked")?;
            result?;

            for tx in api.pushed() {
                println!("{}", serde_json::to_string(&tx)?);
            }
        }
    }

    Ok(())
}
