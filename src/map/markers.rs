//! Markers

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{geo::Coordinates, map::Mappable, postings::EndpointKind};

/// Glyph drawn for a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerGlyph {
    /// Tear-drop pin; its tip is the bottom-centre of the glyph.
    Pin,

    /// Flag on a pole; its tip is the foot of the pole.
    Flag,
}

/// Marker fill colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerColor {
    /// Origins
    Green,

    /// Destinations
    Red,
}

impl MarkerColor {
    /// CSS hex colour.
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Green => "#16a34a",
            Self::Red => "#dc2626",
        }
    }
}

/// Pixel offset, from the glyph's top-left corner, that lands on the
/// coordinate. Fixed in screen space, so it holds at every zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    /// Horizontal offset in pixels.
    pub x: u16,

    /// Vertical offset in pixels.
    pub y: u16,
}

/// Everything a renderer needs to draw one marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerStyle {
    /// Glyph
    pub glyph: MarkerGlyph,

    /// Fill colour
    pub color: MarkerColor,

    /// Glyph width in pixels.
    pub width: u16,

    /// Glyph height in pixels.
    pub height: u16,

    /// Tip of the glyph.
    pub anchor: Anchor,

    /// Stacking order; higher draws on top.
    pub z_index: u8,
}

impl MarkerStyle {
    /// Green pin for origins.
    pub const ORIGIN: Self = Self {
        glyph: MarkerGlyph::Pin,
        color: MarkerColor::Green,
        width: 32,
        height: 40,
        anchor: Anchor { x: 16, y: 40 },
        z_index: 2,
    };

    /// Red flag for destinations.
    pub const DESTINATION: Self = Self {
        glyph: MarkerGlyph::Flag,
        color: MarkerColor::Red,
        width: 32,
        height: 32,
        anchor: Anchor { x: 4, y: 32 },
        z_index: 1,
    };

    /// Style for an endpoint kind.
    pub const fn for_endpoint(kind: EndpointKind) -> Self {
        match kind {
            EndpointKind::Origin => Self::ORIGIN,
            EndpointKind::Destination => Self::DESTINATION,
        }
    }
}

/// A marker placed for one endpoint of one posting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker<Id> {
    /// Posting the marker belongs to.
    pub posting: Id,

    /// Which endpoint it marks.
    pub endpoint: EndpointKind,

    /// Where it is placed.
    pub position: Coordinates,

    /// How it is drawn.
    pub style: MarkerStyle,
}

/// One marker per resolved endpoint, origin first; endpoints without
/// coordinates are skipped independently.
pub fn markers_for<P: Mappable>(posting: &P) -> SmallVec<[Marker<P::Id>; 2]> {
    [EndpointKind::Origin, EndpointKind::Destination]
        .into_iter()
        .filter_map(|endpoint| {
            posting.position(endpoint).map(|position| Marker {
                posting: posting.id(),
                endpoint,
                position,
                style: MarkerStyle::for_endpoint(endpoint),
            })
        })
        .collect()
}
