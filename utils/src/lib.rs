//! Shared utilities for lockvote.

pub mod logging;
pub mod time;

pub use logging::{init_tracing, LogFormat};
pub use time::{format_days, format_remaining};
