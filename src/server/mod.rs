//! HTTP server: shared state and request dispatch

pub mod http;

pub use http::{run, AppState};
