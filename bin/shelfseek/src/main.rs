//! Command-line host for the shelfseek book assistant.
//!
//! Reads one message per line from stdin and prints replies to stdout. Logs
//! go to stderr; set `RUST_LOG` to change the level.

mod config;
mod sink;

use crate::config::AssistantConfig;
use crate::sink::StdoutSink;
use rootcause::Report;
use shelfseek_ai::{LlmExtractor, OpenAiCompatibleBackend};
use shelfseek_assistant::BookAssistant;
use shelfseek_book_index::ReqwestTransport;
use shelfseek_conversation::{Conversation, Message};
use std::fmt;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Reasons the host can fail to start or keep reading input.
#[derive(Debug)]
enum HostError {
    Config { reason: String },
    Backend { reason: String },
    Transport { reason: String },
    Input { reason: String },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { reason } => write!(f, "failed to load configuration: {reason}"),
            Self::Backend { reason } => write!(f, "failed to create LLM backend: {reason}"),
            Self::Transport { reason } => write!(f, "failed to create HTTP transport: {reason}"),
            Self::Input { reason } => write!(f, "failed to read input: {reason}"),
        }
    }
}

impl std::error::Error for HostError {}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            tracing::error!(error = %report, "shelfseek exited with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Report<HostError>> {
    let config = AssistantConfig::from_env().map_err(|e| HostError::Config {
        reason: e.to_string(),
    })?;
    tracing::info!(
        host = config.book_index.host(),
        model = %config.llm.model,
        history_window = config.history_window,
        "Loaded configuration"
    );
    if config.book_index.api_key().is_err() {
        tracing::warn!("BOOK_INDEX__API_KEY is not set; requests will be answered with a configuration error");
    }

    let backend = OpenAiCompatibleBackend::new(config.llm).map_err(|e| HostError::Backend {
        reason: e.to_string(),
    })?;
    let transport = ReqwestTransport::new().map_err(|e| HostError::Transport {
        reason: e.to_string(),
    })?;
    let assistant = BookAssistant::new(
        config.book_index,
        Arc::new(transport),
        Arc::new(LlmExtractor::new(backend)),
    )
    .with_history_window(config.history_window);

    let sink = StdoutSink::default();
    let mut history = Conversation::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.map_err(|e| HostError::Input {
                reason: e.to_string(),
            })?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        };

        let Some(line) = line else {
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        let reply = assistant.handle(message, &history, &sink).await;
        history.push(Message::user(message));
        history.push(Message::assistant(reply));
    }

    tracing::info!(messages = history.len(), "Session ended");
    Ok(())
}
