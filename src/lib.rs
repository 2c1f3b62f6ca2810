//! Freight
//!
//! Geospatial core of a freight-matching marketplace: coordinates and haversine
//! distances, rate-per-kilometre derivation, map markers and info-window
//! selection, the posting visibility policy, the query monitor and latest-wins
//! request sequencing.

pub mod filters;
pub mod geo;
pub mod map;
pub mod monitor;
pub mod postings;
pub mod prelude;
pub mod rates;
pub mod sequence;
pub mod visibility;
