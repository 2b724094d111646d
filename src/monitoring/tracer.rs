/*!
 * Structured Tracing
 * Subscriber setup and operation spans for batch operations
 *
 * Features:
 * - Env-filtered human-readable or JSON output
 * - Per-operation spans with element counts and backend fields
 * - Slow operation warnings
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable enabling JSON output (`1` or `true`)
pub const TRACE_JSON_ENV: &str = "SPECTRA_TRACE_JSON";

/// Operations slower than this are reported at warn level
const SLOW_OPERATION_MS: u128 = 100;

static NEXT_OPERATION_ID: AtomicU64 = AtomicU64::new(1);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SPECTRA_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!(json = use_json, "Structured tracing initialized");
    }
    installed
}

/// Span around one batch operation
pub struct OperationSpan {
    span: tracing::Span,
    start: Instant,
    operation_id: u64,
}

impl OperationSpan {
    pub fn new(operation: &'static str, backend: &'static str, elements: usize) -> Self {
        let operation_id = NEXT_OPERATION_ID.fetch_add(1, Ordering::Relaxed);

        let span = span!(
            Level::TRACE,
            "batch_operation",
            operation_id,
            operation,
            backend,
            elements,
            duration_us = tracing::field::Empty,
            result = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            operation_id,
        }
    }

    /// Process-unique id of this operation
    pub fn operation_id(&self) -> u64 {
        self.operation_id
    }

    pub fn record_result(&self, success: bool) {
        self.span.record("result", if success { "success" } else { "error" });
    }

    pub fn record_error(&self, error: &dyn std::fmt::Display) {
        self.span.record("error", tracing::field::display(error));
        self.span.record("result", "error");
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for OperationSpan {
    fn drop(&mut self) {
        if self.span.is_disabled() {
            return;
        }
        let duration = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("duration_us", duration.as_micros() as u64);

        if duration.as_millis() > SLOW_OPERATION_MS {
            warn!(
                operation_id = self.operation_id,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow batch operation"
            );
        } else {
            debug!(
                operation_id = self.operation_id,
                duration_us = duration.as_micros() as u64,
                "batch operation completed"
            );
        }
    }
}

/// Helper to create an operation span
#[inline]
pub fn span_operation(operation: &'static str, backend: &'static str, elements: usize) -> OperationSpan {
    OperationSpan::new(operation, backend, elements)
}
