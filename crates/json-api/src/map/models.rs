//! Map Models

use freight::map::{InfoWindow, MapView, Mappable, Marker, MarkerGlyph};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::payloads::{LocationPayload, PerKmResponse, RateResponse};

/// A marker to draw, in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct MarkerResponse {
    pub posting_uuid: Uuid,

    /// `origin` or `destination`
    pub endpoint: String,
    pub lat: f64,
    pub lng: f64,

    /// `pin` or `flag`
    pub glyph: String,

    /// CSS hex colour
    pub color: String,
    pub width: u16,
    pub height: u16,

    /// Offset from the glyph's top-left corner that sits on the position
    pub anchor_x: u16,
    pub anchor_y: u16,
    pub z_index: u8,
}

impl<Id: Into<Uuid> + Copy> From<&Marker<Id>> for MarkerResponse {
    fn from(marker: &Marker<Id>) -> Self {
        let glyph = match marker.style.glyph {
            MarkerGlyph::Pin => "pin",
            MarkerGlyph::Flag => "flag",
        };

        Self {
            posting_uuid: marker.posting.into(),
            endpoint: marker.endpoint.as_str().to_string(),
            lat: marker.position.lat(),
            lng: marker.position.lng(),
            glyph: glyph.to_string(),
            color: marker.style.color.hex().to_string(),
            width: marker.style.width,
            height: marker.style.height,
            anchor_x: marker.style.anchor.x,
            anchor_y: marker.style.anchor.y,
            z_index: marker.style.z_index,
        }
    }
}

/// Markers of `postings`, lowest z-index first.
pub(crate) fn markers<P>(postings: &[P]) -> Vec<MarkerResponse>
where
    P: Mappable,
    P::Id: Into<Uuid>,
{
    MapView::new(postings)
        .markers()
        .into_iter()
        .map(|(_key, marker)| marker.into())
        .collect()
}

/// Info window of a selected marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct InfoWindowResponse {
    pub posting_uuid: Uuid,
    pub endpoint: String,
    pub location: LocationPayload,
    pub lat: f64,
    pub lng: f64,

    /// Origin to destination, rounded to whole kilometres
    pub distance_km: Option<u64>,
    pub rate: Option<RateResponse>,

    /// Only for per-trip rates over a positive distance
    pub rate_per_km: Option<PerKmResponse>,
}

impl<P> From<InfoWindow<'_, P>> for InfoWindowResponse
where
    P: Mappable,
    P::Id: Into<Uuid>,
{
    fn from(window: InfoWindow<'_, P>) -> Self {
        Self {
            posting_uuid: window.posting.id().into(),
            endpoint: window.endpoint.as_str().to_string(),
            location: window.location.clone().into(),
            lat: window.position.lat(),
            lng: window.position.lng(),
            distance_km: window.distance_km,
            rate: window.rate.map(Into::into),
            rate_per_km: window.rate_per_km.map(Into::into),
        }
    }
}
