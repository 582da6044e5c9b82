//! Web application test harness CLI
//!
//! Drives an application's HTTP API the way the harness does in tests:
//! CSRF-aware calls, and bounded waits for a URL to reach a status.
//!
//! ```text
//! web-harness --config harness.toml call -X POST -u /api/items -d '{"name":"x"}'
//! web-harness --config harness.toml wait-status -u /health --status 200
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use web_harness::config::{load_config, HarnessConfig};
use web_harness::http::{
    ExchangeResponse, HttpError, Method, RequestHeaders, ResilientHttpClient, StatusCode, Transport,
};
use web_harness::observability::init_logging;
use web_harness::resilience::{wait_until, Outcome, WaitPolicy};

#[derive(Parser)]
#[command(name = "web-harness")]
#[command(about = "HTTP helpers for testing a web application", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Perform one call, recovering from a CSRF rejection
    Call {
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Absolute URL or path relative to app.base_url
        #[arg(short, long)]
        url: String,

        /// Request header, "Name: value" (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Request body
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Poll a URL with the configured wait policy until it answers with a status
    WaitStatus {
        /// Absolute URL or path relative to app.base_url
        #[arg(short, long)]
        url: String,

        #[arg(short, long, default_value_t = 200)]
        status: u16,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => HarnessConfig::default(),
    };
    init_logging(&config.observability);

    tracing::info!(
        base_url = %config.app.base_url,
        csrf_enabled = config.csrf.is_some(),
        max_retries = config.wait.max_retries,
        "Configuration loaded"
    );

    let client = ResilientHttpClient::from_config(&config)?;

    match cli.command {
        Commands::Call { method, url, headers, data } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())?;
            let headers = RequestHeaders::from_pairs(parse_headers(&headers)?)?;
            let response = client.call(method, &url, headers, data.map(String::into_bytes))?;
            print_response(&response);
        }
        Commands::WaitStatus { url, status } => {
            let expected = StatusCode::from_u16(status)?;
            let policy = WaitPolicy::from(&config.wait);
            let description = format!("{url} to answer {expected}");

            wait_until(answers_with(&client, &url, expected), &policy, &description)?;
            println!("{description}: ok");
        }
    }

    Ok(())
}

/// Condition for `wait-status`: `url` answers with `expected`.
fn answers_with<'a, T: Transport>(
    client: &'a ResilientHttpClient<T>,
    url: &'a str,
    expected: StatusCode,
) -> impl FnMut() -> Result<Outcome<()>, HttpError> + 'a {
    move || match client.get(url, RequestHeaders::new()) {
        Ok(response) if response.status == expected => Ok(Outcome::Satisfied(())),
        Ok(response) => {
            tracing::debug!(status = response.status.as_u16(), "Not ready yet");
            Ok(Outcome::NotYetSatisfied)
        }
        // The server may still be starting
        Err(HttpError::Transport(e)) => {
            tracing::debug!(error = %e, "Not reachable yet");
            Ok(Outcome::NotYetSatisfied)
        }
        Err(e) => Err(e),
    }
}

fn parse_headers(raw: &[String]) -> Result<Vec<(&str, &str)>, String> {
    raw.iter()
        .map(|h| {
            h.split_once(':')
                .map(|(name, value)| (name.trim(), value.trim()))
                .ok_or_else(|| format!("header '{h}' must look like 'Name: value'"))
        })
        .collect()
}

fn print_response(response: &ExchangeResponse) {
    println!("{}", response.status);
    for (name, value) in &response.headers {
        println!("{}: {}", name, String::from_utf8_lossy(value.as_bytes()));
    }
    println!();
    println!("{}", response.text());
}
