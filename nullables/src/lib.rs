//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies (the clock and the voter data-and-action provider)
//! are abstracted behind traits. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod provider;

pub use clock::NullClock;
pub use provider::{NullProvider, RecordedAction};
