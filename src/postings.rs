//! Postings
//!
//! Types shared by cargo offers and truck availability postings.

use std::{fmt, str::FromStr};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Coordinates;

/// Errors raised by posting value types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostingError {
    /// Unknown lifecycle state name.
    #[error("unknown posting state: {0}")]
    UnknownState(String),

    /// Unknown endpoint kind name.
    #[error("unknown endpoint kind: {0}")]
    UnknownEndpoint(String),

    /// The requested lifecycle transition is not allowed.
    #[error("cannot move posting from {from} to {to}")]
    InvalidTransition {
        /// Current state
        from: PostingState,
        /// Requested state
        to: PostingState,
    },

    /// Operating radius above the allowed maximum.
    #[error("operating radius {0} km exceeds {max} km", max = OperatingRadius::MAX_KM)]
    RadiusOutOfRange(u16),

    /// An availability range ends before it starts.
    #[error("availability range ends ({to}) before it starts ({from})")]
    InvertedRange {
        /// Range start
        from: Date,
        /// Range end
        to: Date,
    },

    /// A location was given without an address.
    #[error("location address cannot be empty")]
    EmptyAddress,
}

/// Lifecycle state of a posting. Postings are never deleted; the state carries
/// the soft lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingState {
    /// Open and discoverable.
    Available,

    /// Taken by a carrier.
    Assigned,

    /// Delivered.
    Completed,

    /// Withdrawn by the owner.
    Cancelled,
}

impl PostingState {
    /// Storage/wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Assigned => "assigned",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether a cargo posting may move from `self` to `next`.
    pub const fn allows(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Available, Self::Assigned | Self::Cancelled)
                | (
                    Self::Assigned,
                    Self::Completed | Self::Cancelled | Self::Available
                )
        )
    }

    /// Validate a transition to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`PostingError::InvalidTransition`] when the move is not allowed.
    pub const fn transition(self, next: Self) -> Result<Self, PostingError> {
        if self.allows(next) {
            Ok(next)
        } else {
            Err(PostingError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl PostingState {
    /// Whether a truck posting may move from `self` to `next`. Trucks are
    /// never assigned; they are withdrawn or marked used.
    pub const fn allows_truck(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Available, Self::Cancelled | Self::Completed)
        )
    }

    /// Validate a truck transition to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`PostingError::InvalidTransition`] when the move is not allowed.
    pub const fn truck_transition(self, next: Self) -> Result<Self, PostingError> {
        if self.allows_truck(next) {
            Ok(next)
        } else {
            Err(PostingError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for PostingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostingState {
    type Err = PostingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "available" => Ok(Self::Available),
            "assigned" => Ok(Self::Assigned),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(PostingError::UnknownState(other.to_string())),
        }
    }
}

/// Which end of a posting a marker or draft refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// Pick-up location
    Origin,

    /// Drop-off location
    Destination,
}

impl EndpointKind {
    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Destination => "destination",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointKind {
    type Err = PostingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "origin" => Ok(Self::Origin),
            "destination" => Ok(Self::Destination),
            other => Err(PostingError::UnknownEndpoint(other.to_string())),
        }
    }
}

/// A posting endpoint: the free-text address plus whatever geocoding resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Address as typed by the user.
    pub address: String,

    /// Resolved province, if known.
    #[serde(default)]
    pub province: Option<String>,

    /// Resolved city, if known.
    #[serde(default)]
    pub city: Option<String>,

    /// Resolved coordinates, if known.
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl Location {
    /// A location known only by its address.
    ///
    /// # Errors
    ///
    /// Returns [`PostingError::EmptyAddress`] for a blank address.
    pub fn from_address(address: impl Into<String>) -> Result<Self, PostingError> {
        let address = address.into();

        if address.trim().is_empty() {
            return Err(PostingError::EmptyAddress);
        }

        Ok(Self {
            address,
            province: None,
            city: None,
            coordinates: None,
        })
    }

    /// Whether the location still needs geocoding.
    pub fn is_unresolved(&self) -> bool {
        self.coordinates.is_none()
    }
}

/// Operating radius of a truck, in kilometres (`0..=500`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct OperatingRadius(u16);

impl OperatingRadius {
    /// Largest accepted radius.
    pub const MAX_KM: u16 = 500;

    /// Validate a radius.
    ///
    /// # Errors
    ///
    /// Returns [`PostingError::RadiusOutOfRange`] above [`Self::MAX_KM`].
    pub const fn new(km: u16) -> Result<Self, PostingError> {
        if km > Self::MAX_KM {
            return Err(PostingError::RadiusOutOfRange(km));
        }

        Ok(Self(km))
    }

    /// Radius in kilometres.
    pub const fn km(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for OperatingRadius {
    type Error = PostingError;

    fn try_from(km: u16) -> Result<Self, Self::Error> {
        Self::new(km)
    }
}

impl From<OperatingRadius> for u16 {
    fn from(radius: OperatingRadius) -> Self {
        radius.0
    }
}

/// When a truck is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Availability {
    /// Always offered; never expires.
    Permanent,

    /// Offered on a single day.
    On {
        /// The day
        date: Date,
    },

    /// Offered across an inclusive date range.
    Between {
        /// First day
        from: Date,
        /// Last day
        to: Date,
    },
}

impl Availability {
    /// Build a range, rejecting inverted bounds.
    ///
    /// # Errors
    ///
    /// Returns [`PostingError::InvertedRange`] when `to` precedes `from`.
    pub fn between(from: Date, to: Date) -> Result<Self, PostingError> {
        if to < from {
            return Err(PostingError::InvertedRange { from, to });
        }

        Ok(Self::Between { from, to })
    }

    /// Rebuild from storage columns: no dates means permanent, one date means a
    /// single day.
    ///
    /// # Errors
    ///
    /// Returns an error for an inverted range.
    pub fn from_columns(from: Option<Date>, to: Option<Date>) -> Result<Self, PostingError> {
        match (from, to) {
            (None, None) => Ok(Self::Permanent),
            (Some(date), None) | (None, Some(date)) => Ok(Self::On { date }),
            (Some(from), Some(to)) if from == to => Ok(Self::On { date: from }),
            (Some(from), Some(to)) => Self::between(from, to),
        }
    }

    /// Storage columns `(from, to)`.
    pub const fn columns(self) -> (Option<Date>, Option<Date>) {
        match self {
            Self::Permanent => (None, None),
            Self::On { date } => (Some(date), Some(date)),
            Self::Between { from, to } => (Some(from), Some(to)),
        }
    }

    /// The reference end date used by the visibility policy.
    pub const fn end_date(self) -> Option<Date> {
        match self {
            Self::Permanent => None,
            Self::On { date } => Some(date),
            Self::Between { to, .. } => Some(to),
        }
    }
}
