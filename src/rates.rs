//! Rates

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building rates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateError {
    /// Rates cannot be negative.
    #[error("rate amount cannot be negative: {0}")]
    Negative(Decimal),

    /// Unknown rate kind name.
    #[error("unknown rate kind: {0}")]
    UnknownKind(String),
}

/// How a rate amount is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateKind {
    /// A lump sum for the whole trip.
    PerTrip,

    /// Charged per ton carried.
    PerTon,
}

impl RateKind {
    /// Storage/wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerTrip => "per_trip",
            Self::PerTon => "per_ton",
        }
    }
}

impl FromStr for RateKind {
    type Err = RateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "per_trip" => Ok(Self::PerTrip),
            "per_ton" => Ok(Self::PerTon),
            other => Err(RateError::UnknownKind(other.to_string())),
        }
    }
}

/// The tariff attached to a cargo posting, in Argentine pesos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRate", into = "RawRate")]
pub struct Rate {
    amount: Decimal,
    kind: RateKind,
    approximate: bool,
}

impl Rate {
    /// Build a rate, rejecting negative amounts.
    ///
    /// # Errors
    ///
    /// Returns [`RateError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal, kind: RateKind, approximate: bool) -> Result<Self, RateError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(RateError::Negative(amount));
        }

        Ok(Self {
            amount,
            kind,
            approximate,
        })
    }

    /// Rate amount.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Rate kind.
    pub fn kind(&self) -> RateKind {
        self.kind
    }

    /// Whether the owner marked the amount as approximate.
    pub fn is_approximate(&self) -> bool {
        self.approximate
    }

    /// Rate per kilometre for per-trip rates; withheld otherwise.
    pub fn per_km(&self, distance_km: u64) -> Option<Decimal> {
        match self.kind {
            RateKind::PerTrip => rate_per_km(self.amount, distance_km),
            RateKind::PerTon => None,
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.approximate { "~" } else { "" };
        let suffix = match self.kind {
            RateKind::PerTrip => "trip",
            RateKind::PerTon => "ton",
        };

        write!(f, "{prefix}{}/{suffix}", format_ars(self.amount))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawRate {
    amount: Decimal,
    kind: RateKind,
    #[serde(default)]
    approximate: bool,
}

impl TryFrom<RawRate> for Rate {
    type Error = RateError;

    fn try_from(raw: RawRate) -> Result<Self, Self::Error> {
        Self::new(raw.amount, raw.kind, raw.approximate)
    }
}

impl From<Rate> for RawRate {
    fn from(rate: Rate) -> Self {
        Self {
            amount: rate.amount,
            kind: rate.kind,
            approximate: rate.approximate,
        }
    }
}

/// `total / distance_km`, rounded to cents; only when both are positive.
pub fn rate_per_km(total: Decimal, distance_km: u64) -> Option<Decimal> {
    if distance_km == 0 || total <= Decimal::ZERO {
        return None;
    }

    total
        .checked_div(Decimal::from(distance_km))
        .map(|per_km| per_km.round_dp(2))
}

/// Format an amount in Argentine pesos.
pub fn format_ars(amount: Decimal) -> String {
    Money::from_decimal(amount, iso::ARS).to_string()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn per_km_divides_total_by_distance() {
        assert_eq!(rate_per_km(Decimal::from(100000), 500), Some(Decimal::from(200)));
    }

    #[test]
    fn per_km_is_withheld_for_zero_distance_or_rate() {
        assert_eq!(rate_per_km(Decimal::from(100000), 0), None);
        assert_eq!(rate_per_km(Decimal::ZERO, 500), None);
    }

    #[test]
    fn per_km_rounds_to_cents() {
        assert_eq!(rate_per_km(Decimal::from(1000), 3), Some(Decimal::new(33333, 2)));
    }

    #[test]
    fn per_ton_rates_have_no_per_km_value() -> TestResult {
        let rate = Rate::new(Decimal::from(50000), RateKind::PerTon, false)?;

        assert_eq!(rate.per_km(500), None);

        Ok(())
    }

    #[test]
    fn negative_rates_are_rejected() {
        assert_eq!(
            Rate::new(Decimal::from(-1), RateKind::PerTrip, false),
            Err(RateError::Negative(Decimal::from(-1)))
        );
        assert!(Rate::new(Decimal::ZERO, RateKind::PerTrip, false).is_ok());
    }

    #[test]
    fn kind_names_round_trip() -> TestResult {
        assert_eq!("per_trip".parse::<RateKind>()?, RateKind::PerTrip);
        assert_eq!(RateKind::PerTon.as_str(), "per_ton");
        assert!("per_km".parse::<RateKind>().is_err());

        Ok(())
    }

    #[test]
    fn display_marks_approximate_rates() -> TestResult {
        let rate = Rate::new(Decimal::from(150000), RateKind::PerTrip, true)?;
        let shown = rate.to_string();

        assert!(shown.starts_with('~'), "expected approximate marker in {shown}");
        assert!(shown.ends_with("/trip"), "expected trip suffix in {shown}");

        Ok(())
    }
}
