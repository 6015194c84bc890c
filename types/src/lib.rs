//! Fundamental types for lockvote.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! timestamps and lock durations, token and voting-power amounts, voter identities,
//! and the locking parameters of the voting-power program.

pub mod amount;
pub mod error;
pub mod params;
pub mod time;
pub mod voter;

pub use amount::{TokenAmount, VotingPower};
pub use error::LockvoteError;
pub use params::{LockingParams, E18, ONE_TOKEN};
pub use time::{LockDuration, Timestamp, MILLIS_PER_DAY, MILLIS_PER_HOUR};
pub use voter::VoterId;

/// Position identifier, unique among one voter's positions.
pub type PositionIndex = u32;

/// A locking period expressed in whole days.
pub type Days = u16;
