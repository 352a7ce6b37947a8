//! Library-scoped `tracing` output.
//!
//! Webhook calls are the slow, failure-prone part of the system, so their
//! events get a dedicated layer with millisecond timestamps and span-close
//! timings (the `ask` span carries `caller_id`). The binary composes it next to
//! its global layer; [`scoped_layer`] does the same for any other crate prefix.

use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Target prefix of every event emitted by this crate.
pub const TARGET_PREFIX: &str = "ai_webhook_service";

/// RFC3339 UTC with milliseconds, e.g. `2026-03-01T09:30:00.125Z`.
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Millis;

impl FormatTime for ChronoRfc3339Millis {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let s = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        w.write_str(&s)
    }
}

/// Layer rendering only this crate's events.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    scoped_layer(TARGET_PREFIX)
}

/// Compact single-line layer for events whose target starts with `prefix`.
/// Spans report their duration on close. ANSI colors only on a terminal.
pub fn scoped_layer<S>(prefix: &'static str) -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();
    let in_scope = filter::filter_fn(move |meta| meta.target().starts_with(prefix));

    fmt::layer()
        .with_timer(ChronoRfc3339Millis)
        .with_level(true)
        .with_target(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(false))
        .with_filter(in_scope)
}

/// `target=level` directive; `None` if `target` is not a valid directive target.
pub fn level_directive(target: &str, level: Level) -> Option<Directive> {
    let s = format!("{target}={}", level.as_str().to_lowercase());
    Directive::from_str(&s).ok()
}

/// EnvFilter from `RUST_LOG` (or `default`) with per-target levels added on top.
pub fn env_filter_with_levels(default: &str, levels: &[(&str, Level)]) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    levels
        .iter()
        .filter_map(|(target, level)| level_directive(target, *level))
        .fold(base, EnvFilter::add_directive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_for_target() {
        let d = level_directive(TARGET_PREFIX, Level::DEBUG).unwrap();
        assert_eq!(d.to_string(), "ai_webhook_service=debug");
        let d = level_directive("audit_evidence", Level::TRACE).unwrap();
        assert_eq!(d.to_string(), "audit_evidence=trace");
    }

    #[test]
    fn timestamp_has_millis() {
        let mut out = String::new();
        ChronoRfc3339Millis
            .format_time(&mut Writer::new(&mut out))
            .unwrap();
        // YYYY-MM-DDTHH:MM:SS.mmmZ
        assert_eq!(out.len(), 24);
        assert!(out.ends_with('Z'));
    }
}
