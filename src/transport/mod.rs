//! Transport module
//!
//! Network surfaces for the bypass engine.

pub mod http;

pub use http::{AppState, CheckRequest, CheckResponse, HttpConfig, router, run_http};
