use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use homework_bot::api::{PracticumClient, build_http_client};
use homework_bot::auth::Credentials;
use homework_bot::config::{AppConfig, CONFIG_PATH};
use homework_bot::poller::Poller;
use homework_bot::reporter::TelegramNotifier;
use homework_bot::state::PollState;

#[derive(Parser)]
#[command(
    name = "homework_bot",
    about = "Telegram bot that reports homework review status changes"
)]
struct Args {
    /// Path to the TOML config file (defaults are used if it does not exist)
    #[arg(long, default_value = CONFIG_PATH)]
    config: PathBuf,

    /// Append logs to this file instead of `settings.log_file`
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run a single poll and exit
    #[arg(long)]
    once: bool,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = AppConfig::load_or_default(&args.config)?;
    let log_file = args.log_file.as_deref().unwrap_or(config.settings.log_file.as_path());
    init_logging(log_file)?;

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("Required environment variables are missing: {e}");
            return Err(e).context("cannot start without tokens");
        }
    };

    let settings = &config.settings;
    info!(
        "Starting homework bot: endpoint={} chat={} poll={}s",
        settings.endpoint, credentials.telegram_chat_id, settings.poll_interval_secs,
    );

    let http = build_http_client(settings.request_timeout())?;
    let source = PracticumClient::new(
        http.clone(),
        &settings.endpoint,
        &credentials.practicum_token,
    );
    let notifier = TelegramNotifier::new(
        http,
        &settings.telegram_api_base,
        &credentials.telegram_token,
        &credentials.telegram_chat_id,
    );
    let state = PollState::new(chrono::Utc::now().timestamp(), settings.poll_interval_secs);
    let mut poller = Poller::new(source, notifier, settings.poll_interval(), state);

    if args.once {
        let outcome = poller.poll_cycle().await;
        info!("Single poll finished: {outcome:?}");
        return Ok(());
    }

    poller.run().await;
    Ok(())
}
