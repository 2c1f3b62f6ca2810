//! Visibility
//!
//! Decides whether a posting whose availability window has passed is still
//! shown. The boundary lives in [`VisibilityPolicy::cutoff`] and nowhere else:
//! the SQL predicate binds the cutoff, the in-memory filter compares against it.

use std::{fmt, str::FromStr};

use jiff::{Span, civil::Date};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when parsing grace periods.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VisibilityError {
    /// The configured value is not a non-negative whole number of days.
    #[error("invalid grace period: {0:?}")]
    InvalidGracePeriod(String),
}

/// The kind of posting a grace period applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Cargo offers
    Cargo,

    /// Truck availability
    Truck,
}

impl EntityKind {
    /// Settings key holding the grace period for this kind.
    pub const fn setting_key(self) -> &'static str {
        match self {
            Self::Cargo => "cargas_extra_days",
            Self::Truck => "trucks_extra_days",
        }
    }

    /// Backing table name.
    pub const fn table(self) -> &'static str {
        match self {
            Self::Cargo => "cargas",
            Self::Truck => "trucks",
        }
    }
}

/// Extra days a posting stays visible after its end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GracePeriod(u32);

impl GracePeriod {
    /// Used when nothing is configured or configuration is unreachable.
    pub const DEFAULT_DAYS: u32 = 30;

    /// Grace period of `days` days.
    pub const fn days(days: u32) -> Self {
        Self(days)
    }

    /// Number of days.
    pub const fn as_days(self) -> u32 {
        self.0
    }
}

impl Default for GracePeriod {
    fn default() -> Self {
        Self(Self::DEFAULT_DAYS)
    }
}

impl fmt::Display for GracePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days", self.0)
    }
}

impl FromStr for GracePeriod {
    type Err = VisibilityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_parse| VisibilityError::InvalidGracePeriod(value.to_string()))
    }
}

/// Where the visibility decision is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityMode {
    /// Pushed into the query as a predicate.
    #[default]
    Server,

    /// Applied to fetched rows.
    Client,
}

/// Grace-period visibility policy for one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilityPolicy {
    grace: GracePeriod,
}

impl VisibilityPolicy {
    /// Policy with the given grace period.
    pub const fn new(grace: GracePeriod) -> Self {
        Self { grace }
    }

    /// Configured grace period.
    pub const fn grace(&self) -> GracePeriod {
        self.grace
    }

    /// Earliest end date still visible on `today`.
    ///
    /// A posting is visible while `today - end_date <= grace` days, i.e. while
    /// `end_date >= today - grace`. Saturates at [`Date::MIN`].
    pub fn cutoff(&self, today: Date) -> Date {
        Span::new()
            .try_days(i64::from(self.grace.as_days()))
            .and_then(|grace| today.checked_sub(grace))
            .unwrap_or(Date::MIN)
    }

    /// Whether a posting ending on `end_date` is visible on `today`.
    pub fn is_visible(&self, end_date: Option<Date>, today: Date) -> bool {
        end_date.is_none_or(|end| end >= self.cutoff(today))
    }

    /// Keep only the visible rows.
    pub fn retain<T, F>(&self, rows: &mut Vec<T>, today: Date, end_date: F)
    where
        F: Fn(&T) -> Option<Date>,
    {
        let cutoff = self.cutoff(today);

        rows.retain(|row| end_date(row).is_none_or(|end| end >= cutoff));
    }
}
