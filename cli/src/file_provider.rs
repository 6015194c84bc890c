//! Read-only provider backed by a voter snapshot JSON file.

use async_trait::async_trait;
use lockvote_positions::{RawLockingPosition, StandaloneBalances};
use lockvote_provider::{PositionActions, ProviderError, VoterDataProvider, VoterSnapshot};
use lockvote_types::{Days, PositionIndex, TokenAmount, VoterId};
use std::path::PathBuf;

/// Re-reads the file on every fetch, so edits show up on the next refresh.
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load(&self) -> Result<VoterSnapshot, ProviderError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ProviderError::Unavailable(format!("{}: {e}", self.path.display())))?;
        VoterSnapshot::from_json_str(&content)
    }

    async fn load_for(&self, voter: &VoterId) -> Result<VoterSnapshot, ProviderError> {
        let snapshot = self.load().await?;
        if &snapshot.voter_id != voter {
            return Err(ProviderError::VoterNotFound(voter.to_string()));
        }
        Ok(snapshot)
    }
}

#[async_trait]
impl VoterDataProvider for FileProvider {
    async fn fetch_positions(
        &self,
        voter: &VoterId,
    ) -> Result<Vec<RawLockingPosition>, ProviderError> {
        Ok(self.load_for(voter).await?.positions())
    }

    async fn fetch_standalone_balances(
        &self,
        voter: &VoterId,
    ) -> Result<StandaloneBalances, ProviderError> {
        Ok(self.load_for(voter).await?.balances())
    }
}

#[async_trait]
impl PositionActions for FileProvider {
    async fn start_unlock(&self, _: &VoterId, _: PositionIndex) -> Result<(), ProviderError> {
        Err(ProviderError::ReadOnly)
    }

    async fn partial_unlock(
        &self,
        _: &VoterId,
        _: PositionIndex,
        _: TokenAmount,
    ) -> Result<(), ProviderError> {
        Err(ProviderError::ReadOnly)
    }

    async fn relock(
        &self,
        _: &VoterId,
        _: PositionIndex,
        _: Days,
        _: TokenAmount,
    ) -> Result<(), ProviderError> {
        Err(ProviderError::ReadOnly)
    }

    async fn extend_lock(
        &self,
        _: &VoterId,
        _: PositionIndex,
        _: Days,
    ) -> Result<(), ProviderError> {
        Err(ProviderError::ReadOnly)
    }

    async fn withdraw(&self, _: &VoterId, _: PositionIndex) -> Result<(), ProviderError> {
        Err(ProviderError::ReadOnly)
    }

    async fn withdraw_all(&self, _: &VoterId) -> Result<(), ProviderError> {
        Err(ProviderError::ReadOnly)
    }
}
