//! Unified error handling for `llm-gateway`.
//!
//! This module exposes a single top-level error type [`GatewayError`] for the
//! whole library and groups startup problems in [`ConfigError`]. Small helpers
//! for reading/validating environment variables return the unified
//! [`Result<T>`] alias.
//!
//! All messages include the tag `[LLM Gateway]` to simplify attribution in logs.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Maximum number of characters kept from an upstream body in error messages.
const SNIPPET_MAX_CHARS: usize = 300;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `llm-gateway` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Underlying HTTP transport error (e.g., `reqwest::Error`).
    #[error("[LLM Gateway] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Upstream returned a non-successful HTTP status.
    #[error("[LLM Gateway] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Request body could not be encoded or reply could not be read.
    #[error("[LLM Gateway] decode error: {0}")]
    Decode(String),

    /// Operation exceeded the configured timeout.
    #[error("[LLM Gateway] operation timed out after {0:?}")]
    Timeout(Duration),

    /// Both the primary and the fallback request shapes were rejected.
    #[error("[ERROR] primary attempt failed: {primary} -- fallback attempt failed: {fallback}")]
    BothAttemptsFailed {
        /// Failure of the segment-list request.
        primary: Box<GatewayError>,
        /// Failure of the single-string request.
        fallback: Box<GatewayError>,
    },
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
///
/// Only errors that realistically happen at config load/validation time.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[LLM Gateway] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (like limits, timeouts).
    #[error("[LLM Gateway] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_MAX_TOKENS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Unsupported provider in `LLM_KIND`.
    #[error("[LLM Gateway] unsupported provider: {0} (expected `bedrock` or `openai`)")]
    UnsupportedProvider(String),

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[LLM Gateway] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `LLM_ENDPOINT`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[LLM Gateway] {field} is out of range: {detail}")]
    OutOfRange {
        /// Field name (e.g., `temperature`).
        field: &'static str,
        /// Description of the expected range.
        detail: &'static str,
    },

    /// Model name was empty.
    #[error("[LLM Gateway] model name must not be empty")]
    EmptyModel,
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// Returns [`GatewayError::Config`] with [`ConfigError::MissingVar`] if the
/// variable is absent or empty.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a valid `u32`.
pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    env_opt_parsed(name, "expected u32")
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    env_opt_parsed(name, "expected u64")
}

/// Parses an optional `f64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a valid `f64`.
pub fn env_opt_f64(name: &'static str) -> Result<Option<f64>> {
    env_opt_parsed(name, "expected a decimal number")
}

fn env_opt_parsed<T: std::str::FromStr>(
    name: &'static str,
    reason: &'static str,
) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| GatewayError::from(ConfigError::InvalidNumber { var: name, reason })),
        _ => Ok(None),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers (return unified `Result<T>`)                           */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the string does not start with
/// a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
///
/// # Errors
/// Returns [`ConfigError::OutOfRange`] if `value` is outside `[min, max]` or
/// not finite.
pub fn validate_range_f64(field: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}

/// Compacts an upstream body into a single-line snippet for errors and logs.
pub fn make_snippet(body: &str) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= SNIPPET_MAX_CHARS {
        return flat;
    }
    let mut out: String = flat.chars().take(SNIPPET_MAX_CHARS).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_flattens_and_clamps() {
        assert_eq!(make_snippet("  a \n  b\tc "), "a b c");

        let long = "x".repeat(SNIPPET_MAX_CHARS + 50);
        let s = make_snippet(&long);
        assert!(s.ends_with('…'));
        assert_eq!(s.chars().count(), SNIPPET_MAX_CHARS + 1);
    }

    #[test]
    fn endpoint_scheme_is_checked() {
        assert!(validate_http_endpoint("X", "https://host").is_ok());
        assert!(validate_http_endpoint("X", " http://host ").is_ok());
        assert!(matches!(
            validate_http_endpoint("X", "ftp://host"),
            Err(GatewayError::Config(ConfigError::InvalidFormat { var: "X", .. }))
        ));
    }

    #[test]
    fn range_rejects_nan_and_outliers() {
        assert!(validate_range_f64("t", 0.5, 0.0, 1.0).is_ok());
        assert!(validate_range_f64("t", 1.5, 0.0, 1.0).is_err());
        assert!(validate_range_f64("t", f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn both_attempts_message_embeds_causes() {
        let err = GatewayError::BothAttemptsFailed {
            primary: Box::new(GatewayError::Decode("bad segments".into())),
            fallback: Box::new(GatewayError::Decode("bad string".into())),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("[ERROR] primary attempt failed:"));
        assert!(msg.contains("bad segments"));
        assert!(msg.contains("-- fallback attempt failed:"));
        assert!(msg.contains("bad string"));
    }
}
