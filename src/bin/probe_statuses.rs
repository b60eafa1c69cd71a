//! Probe: fetch the raw homework statuses answer once.
//!
//! Reads PRACTICUM_TOKEN (from the environment or `.env`), hits the review
//! endpoint and prints the answer, the server cursor and the message the bot
//! would send for it.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use homework_bot::api::{PracticumClient, StatusSource, build_http_client};
use homework_bot::auth::PRACTICUM_TOKEN_VAR;
use homework_bot::config::PRACTICUM_ENDPOINT;
use homework_bot::engine::{current_date, latest_message};

#[derive(Parser)]
#[command(name = "probe_statuses", about = "Print the raw homework statuses answer")]
struct Args {
    /// `from_date` cursor (unix seconds); 0 returns the whole history
    #[arg(long, default_value_t = 0)]
    from_date: i64,

    /// Review endpoint to query
    #[arg(long, default_value = PRACTICUM_ENDPOINT)]
    endpoint: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let token = std::env::var(PRACTICUM_TOKEN_VAR)
        .with_context(|| format!("{PRACTICUM_TOKEN_VAR} not set"))?;
    let http = build_http_client(Duration::from_secs(30))?;
    let client = PracticumClient::new(http, args.endpoint, token);

    println!("=== Probe: homework statuses ===");
    println!("Endpoint:  {}", client.endpoint());
    println!("from_date: {}\n", args.from_date);

    let answer = client.fetch(args.from_date).await?;
    println!("{}\n", serde_json::to_string_pretty(&answer)?);

    match current_date(&answer) {
        Some(date) => println!("current_date: {date}"),
        None => println!("current_date: <missing>"),
    }
    match latest_message(&answer) {
        Ok(Some(message)) => println!("Message:      {message}"),
        Ok(None) => println!("Message:      <no homeworks in window>"),
        Err(e) => println!("Invalid answer: {e}"),
    }

    Ok(())
}
