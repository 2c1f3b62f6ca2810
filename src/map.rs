//! Map
//!
//! Marker derivation, single-selection info windows and the editable location
//! draft. Rendering itself belongs to whatever map provider the client loads;
//! this module decides what is drawn where and what an interaction means.

use std::hash::Hash;

use crate::{
    geo::Coordinates,
    postings::{EndpointKind, Location},
    rates::Rate,
};

pub mod editor;
pub mod markers;
pub mod selection;

pub use editor::{DraftLocations, EditorError, LocationDraft, MapCapability};
pub use markers::{Anchor, Marker, MarkerColor, MarkerGlyph, MarkerStyle, markers_for};
pub use selection::{InfoWindow, MapView, MarkerKey, Selection};

/// A posting that can be drawn on the map.
pub trait Mappable {
    /// Posting identifier.
    type Id: Copy + Eq + Hash;

    /// Posting identifier.
    fn id(&self) -> Self::Id;

    /// Location of one endpoint, if the posting has it.
    fn endpoint(&self, kind: EndpointKind) -> Option<&Location>;

    /// Tariff shown in the info window, if any.
    fn rate(&self) -> Option<Rate> {
        None
    }

    /// Resolved coordinates of one endpoint.
    fn position(&self, kind: EndpointKind) -> Option<Coordinates> {
        self.endpoint(kind).and_then(|location| location.coordinates)
    }
}
