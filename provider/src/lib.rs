//! External data-and-action interface.
//!
//! Every backend that can fetch a voter's positions or submit mutations
//! (a ledger RPC client, a snapshot file, an in-memory double for tests)
//! implements these traits. The rest of the workspace depends only on them.
//!
//! Mutations are fire-and-refetch: a successful call says the ledger accepted
//! the request, never what the position looks like afterwards.

pub mod actions;
pub mod data;
pub mod error;
pub mod snapshot;

pub use actions::{dispatch, PositionActions};
pub use data::VoterDataProvider;
pub use error::ProviderError;
pub use snapshot::{VotePosition, VoterSnapshot};
