use lockvote_positions::{ActionError, ActionTarget};
use lockvote_provider::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no snapshot loaded yet")]
    NotLoaded,

    #[error("an action on {0:?} is already in flight")]
    ActionInFlight(ActionTarget),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("config error: {0}")]
    Config(String),
}
