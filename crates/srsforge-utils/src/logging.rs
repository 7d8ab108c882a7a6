//! Tracing initialization for srsforge.
//!
//! The pipeline records human-readable progress in the state's log vector;
//! tracing carries the operational view (stage timing, collaborator calls,
//! interim repair progress) that does not belong in the user-facing log.

use std::io::IsTerminal;
use tracing::{Level, span};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Check if colored output should be used.
///
/// Returns true only if stdout is a terminal and `NO_COLOR` is not set.
fn use_color() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Initialize the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence when set; otherwise `verbose` selects between
/// a debug-level filter with span close events and a compact info-level
/// format.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("srsforge=debug,info")
            } else {
                EnvFilter::try_new("srsforge=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(use_color())
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(use_color())
                    .compact(),
            )
            .try_init()?;
    }

    Ok(())
}

/// Create a span for one stage invocation with structured fields.
pub fn stage_span(stage: &str) -> tracing::Span {
    span!(Level::INFO, "stage_execution", stage = %stage)
}
