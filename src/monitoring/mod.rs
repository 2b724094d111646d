/*!
 * Monitoring
 * Tracing setup and operation spans
 */

mod tracer;

pub use tracer::{init_tracing, span_operation, OperationSpan, TRACE_JSON_ENV};
