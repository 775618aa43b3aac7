//! Logging setup shared by the workspace binaries.

use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// Crate target prefix used to raise verbosity for gateway logs only.
pub const TARGET_PREFIX: &str = "llm_gateway";

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        // Keep timestamps compact: no fractional seconds, Z-suffix
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Level directive for **this** library only, e.g. `llm_gateway=debug`.
pub fn level_directive(level: Level) -> Option<Directive> {
    let s = format!("{TARGET_PREFIX}={}", level.as_str().to_lowercase());
    Directive::from_str(&s).ok()
}

/// EnvFilter from `RUST_LOG` or `default`, plus a per-crate level for the gateway.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    match level_directive(level) {
        Some(d) => base.add_directive(d),
        None => base,
    }
}

/// Installs the global subscriber: compact single-line events, RFC3339 UTC
/// timestamps, `file:line`, ANSI colors only on a terminal.
///
/// # Errors
/// Fails if a global subscriber is already set.
pub fn init(default: &str, gateway_level: Level) -> Result<(), TryInitError> {
    let use_ansi = io::stdout().is_terminal();

    let fmt_layer = fmt::layer()
        .compact()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi);

    tracing_subscriber::registry()
        .with(env_filter_with_level(default, gateway_level))
        .with(fmt_layer)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_targets_gateway_crate() {
        let d = level_directive(Level::DEBUG).unwrap();
        assert_eq!(d.to_string(), "llm_gateway=debug");
    }
}
