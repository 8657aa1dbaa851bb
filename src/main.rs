//! Yuktra - terminal chat client
//!
//! Collects user text, forwards it to the chat endpoint one exchange at a
//! time and prints the resulting transcript.

mod cli;
mod config;
mod responder;
mod runtime;
mod state_machine;
mod transcript;

use config::ClientConfig;
use responder::{HttpResponder, LoggingResponder};
use runtime::Session;
use state_machine::SessionContext;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they never interleave with the transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yuktra=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ClientConfig::from_env()?;
    tracing::info!(
        endpoint = %config.endpoint,
        timeout_secs = config.timeout.as_secs(),
        clear_policy = ?config.clear_policy,
        "Starting chat session"
    );

    let responder = LoggingResponder::new(Arc::new(HttpResponder::new(&config)?));
    let session = Session::new(responder, SessionContext::new(config.clear_policy));

    cli::run(session, BufReader::new(tokio::io::stdin())).await?;

    Ok(())
}
