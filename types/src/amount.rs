//! Token and voting-power amount types.
//!
//! Amounts are represented as raw integers (u128) in the smallest unit to avoid
//! floating-point errors. On the wire they travel as decimal strings, since a
//! u128 does not fit a JSON or TOML number; integers are accepted on input too.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;

/// Locked token quantity in raw units (6 decimals for the governance token).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(u128);

/// Voting power in raw units (24 decimals).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VotingPower(u128);

macro_rules! raw_amount {
    ($name:ident, $unit:literal) => {
        impl $name {
            pub const ZERO: Self = Self(0);

            pub const fn new(raw: u128) -> Self {
                Self(raw)
            }

            pub fn raw(&self) -> u128 {
                self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == 0
            }

            pub fn checked_sub(self, other: Self) -> Option<Self> {
                self.0.checked_sub(other.0).map(Self)
            }

            pub fn saturating_add(self, other: Self) -> Self {
                Self(self.0.saturating_add(other.0))
            }

            pub fn saturating_sub(self, other: Self) -> Self {
                Self(self.0.saturating_sub(other.0))
            }
        }

        /// Sums saturate instead of overflowing.
        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, Self::saturating_add)
            }
        }

        impl From<u128> for $name {
            fn from(raw: u128) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", self.0, $unit)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(RawU128Visitor).map(Self)
            }
        }
    };
}

raw_amount!(TokenAmount, "raw");
raw_amount!(VotingPower, "vp");

struct RawU128Visitor;

impl<'de> Visitor<'de> for RawU128Visitor {
    type Value = u128;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative integer or a decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
        Ok(v as u128)
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
        u128::try_from(v).map_err(|_| E::custom(format!("negative amount: {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
        v.trim()
            .parse::<u128>()
            .map_err(|_| E::custom(format!("invalid amount string: {v:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_string_and_number() {
        let a: TokenAmount = serde_json::from_str("\"1000000\"").unwrap();
        let b: TokenAmount = serde_json::from_str("1000000").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.raw(), 1_000_000);
    }

    #[test]
    fn serializes_as_decimal_string() {
        let vp = VotingPower::new(5_000_000_000_000_000_000_000_000);
        let json = serde_json::to_string(&vp).unwrap();
        assert_eq!(json, "\"5000000000000000000000000\"");
    }

    #[test]
    fn rejects_negative_and_garbage() {
        assert!(serde_json::from_str::<TokenAmount>("-5").is_err());
        assert!(serde_json::from_str::<TokenAmount>("\"12abc\"").is_err());
    }

    #[test]
    fn sum_saturates() {
        let total: TokenAmount = [TokenAmount::new(u128::MAX), TokenAmount::new(1)]
            .into_iter()
            .sum();
        assert_eq!(total.raw(), u128::MAX);
    }
}
