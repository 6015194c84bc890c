//! Locking position snapshots, raw and validated.

use lockvote_types::{Days, LockDuration, PositionIndex, Timestamp, TokenAmount, VotingPower};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PositionError;

/// A position entry exactly as the data source delivered it.
///
/// Every field is optional: a field that is absent or fails to decode is `None`,
/// so one bad field never poisons the rest of a snapshot. The unlock start is
/// the exception, see [`UnlockStart`]. Unknown fields (such as the server's
/// own `is_locked` flags) are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLockingPosition {
    #[serde(default, deserialize_with = "lenient")]
    pub index: Option<PositionIndex>,
    #[serde(default, deserialize_with = "lenient")]
    pub amount: Option<TokenAmount>,
    #[serde(default, deserialize_with = "lenient")]
    pub voting_power: Option<VotingPower>,
    #[serde(default, alias = "locking_period_days", deserialize_with = "lenient")]
    pub locking_period: Option<Days>,
    /// Absent, `null` or `0` all mean "still locked".
    #[serde(default, deserialize_with = "unlock_start")]
    pub unlocking_started_at: Option<UnlockStart>,
}

/// The `unlocking_started_at` field as delivered.
///
/// A malformed start cannot fold into `None`, since `None` reads as locked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnlockStart {
    /// Epoch millis; `0` is the ledger's "still locked" value.
    At(u64),
    /// Present but not a non-negative integer.
    Malformed,
}

impl Serialize for UnlockStart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::At(millis) => serializer.serialize_u64(*millis),
            Self::Malformed => serializer.serialize_none(),
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn unlock_start<'de, D>(deserializer: D) -> Result<Option<UnlockStart>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(
        serde_json::from_value(value).map_or(UnlockStart::Malformed, UnlockStart::At),
    ))
}

impl RawLockingPosition {
    /// Decode one entry of a fetched position list.
    ///
    /// Anything that is not a JSON object yields an all-`None` entry, which
    /// later validation rejects.
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// A validated, immutable position snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockingPosition {
    /// Unique among the voter's positions, stable across fetches.
    pub index: PositionIndex,
    /// Locked token quantity.
    pub amount: TokenAmount,
    /// Voting power currently contributed.
    pub voting_power: VotingPower,
    /// Period fixed for the current lock cycle.
    pub locking_period_days: Days,
    /// When unlocking began; `None` while locked.
    pub unlocking_started_at: Option<Timestamp>,
}

impl LockingPosition {
    pub fn locking_period(&self) -> LockDuration {
        LockDuration::from_days(self.locking_period_days as u64)
    }

    /// The instant this position becomes withdrawable, once unlocking has started.
    pub fn unlocking_ends_at(&self) -> Option<Timestamp> {
        self.unlocking_started_at
            .map(|started| started.saturating_add(self.locking_period()))
    }
}

impl TryFrom<&RawLockingPosition> for LockingPosition {
    type Error = PositionError;

    fn try_from(raw: &RawLockingPosition) -> Result<Self, Self::Error> {
        Ok(Self {
            index: raw.index.ok_or(PositionError::MalformedField("index"))?,
            amount: raw.amount.ok_or(PositionError::MalformedField("amount"))?,
            voting_power: raw
                .voting_power
                .ok_or(PositionError::MalformedField("voting_power"))?,
            locking_period_days: raw
                .locking_period
                .ok_or(PositionError::MalformedField("locking_period"))?,
            unlocking_started_at: match raw.unlocking_started_at {
                None | Some(UnlockStart::At(0)) => None,
                Some(UnlockStart::At(millis)) => Some(Timestamp::new(millis)),
                Some(UnlockStart::Malformed) => {
                    return Err(PositionError::MalformedField("unlocking_started_at"))
                }
            },
        })
    }
}

impl From<&LockingPosition> for RawLockingPosition {
    fn from(position: &LockingPosition) -> Self {
        Self {
            index: Some(position.index),
            amount: Some(position.amount),
            voting_power: Some(position.voting_power),
            locking_period: Some(position.locking_period_days),
            unlocking_started_at: position
                .unlocking_started_at
                .map(|t| UnlockStart::At(t.as_millis())),
        }
    }
}
