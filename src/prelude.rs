//! Freight prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    filters::PostingFilter,
    geo::{Coordinates, GeoError, haversine_km, rounded_distance_km},
    map::{
        DraftLocations, EditorError, InfoWindow, LocationDraft, MapCapability, MapView, Mappable,
        Marker, MarkerKey, MarkerStyle, Selection, markers_for,
    },
    monitor::{MonitorStats, QueryEvent, QueryMonitor, QueryStatus},
    postings::{Availability, EndpointKind, Location, OperatingRadius, PostingError, PostingState},
    rates::{Rate, RateError, RateKind, format_ars, rate_per_km},
    sequence::{LatestSlot, Rejected, Ticket},
    visibility::{EntityKind, GracePeriod, VisibilityMode, VisibilityPolicy},
};
