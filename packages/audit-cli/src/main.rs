//! Terminal client for the brand audit pipeline.
//!
//! Validates the domain locally, opens the workflow stream, and drives
//! the pipeline state machine from incoming frames.

mod render;
mod state;
mod stream;

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::{Confirm, Input};
use futures::StreamExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audit::{validate_domain, StreamFrame};

use state::{reduce, Phase, PipelineEvent, PipelineState};
use stream::FrameStream;

#[derive(Parser)]
#[command(name = "audit", about = "Run a streamed brand marketplace audit")]
struct Cli {
    /// Domain to audit (prompted interactively when omitted)
    domain: Option<String>,

    /// Base URL of the audit server
    #[arg(long, default_value = "http://localhost:8080")]
    server: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let mut state = PipelineState::default();

    loop {
        let input = match &cli.domain {
            Some(domain) => domain.clone(),
            None => Input::<String>::new()
                .with_prompt("Domain to audit")
                .interact_text()
                .context("failed to read domain")?,
        };

        // Invalid input is rejected here, before any request is made.
        let domain = match validate_domain(&input) {
            Ok(domain) => domain,
            Err(err) => {
                render::print_notice(&err.to_string());
                if cli.domain.is_some() {
                    std::process::exit(1);
                }
                continue;
            }
        };

        state = reduce(state, PipelineEvent::Submit { domain: domain.clone() });
        render::print_phase(state.phase);
        let printed = render::print_new_log(&state, 0);

        state = run_audit(&client, &cli.server, state, &domain, printed).await;

        match state.phase {
            Phase::Complete => render::print_report(&state),
            Phase::Error => {
                if let Some(notice) = &state.notice {
                    render::print_notice(notice);
                }
            }
            _ => {}
        }

        if cli.domain.is_some() {
            if state.phase == Phase::Error {
                std::process::exit(1);
            }
            break;
        }

        let again = Confirm::new()
            .with_prompt("Run another audit?")
            .default(false)
            .interact()
            .unwrap_or(false);
        if !again {
            break;
        }
        state = reduce(state, PipelineEvent::Reset);
        println!();
    }

    Ok(())
}

/// Open the workflow stream and fold its frames into the state machine,
/// rendering log entries and phase transitions as they land.
async fn run_audit(
    client: &reqwest::Client,
    server: &str,
    mut state: PipelineState,
    domain: &str,
    mut printed: usize,
) -> PipelineState {
    // Frames from this stream carry this generation; a concurrent reset
    // would bump it and orphan them.
    let generation = state.generation;

    let response = client
        .post(format!("{server}/api/chat/workflow"))
        .json(&serde_json::json!({ "domain": domain }))
        .send()
        .await;

    let response = match response {
        Ok(response) if response.status().is_success() => response,
        Ok(response) => {
            let frame = StreamFrame::Error {
                error: format!("workflow request failed: {}", response.status()),
            };
            state = reduce(state, PipelineEvent::Frame { generation, frame });
            render::print_new_log(&state, printed);
            return state;
        }
        Err(err) => {
            let frame = StreamFrame::Error {
                error: format!("workflow request failed: {err}"),
            };
            state = reduce(state, PipelineEvent::Frame { generation, frame });
            render::print_new_log(&state, printed);
            return state;
        }
    };

    let mut frames = FrameStream::new(response.bytes_stream());
    while let Some(frame) = frames.next().await {
        let previous_phase = state.phase;
        state = reduce(state, PipelineEvent::Frame { generation, frame });
        if state.phase != previous_phase {
            render::print_phase(state.phase);
        }
        printed = render::print_new_log(&state, printed);
        if state.phase.is_terminal() {
            break;
        }
    }

    // The server always sends a terminal frame; a stream that ends
    // without one is a transport failure.
    if !state.phase.is_terminal() {
        let frame = StreamFrame::Error {
            error: "stream ended before a terminal event".into(),
        };
        state = reduce(state, PipelineEvent::Frame { generation, frame });
        render::print_new_log(&state, printed);
    }

    state
}
