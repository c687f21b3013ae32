/*!
 * Monitoring Module
 * Diagnostic output
 */

mod tracer;

pub use tracer::{init_tracing, LOG_ENV, LOG_JSON_ENV};
