//! Selection
//!
//! A [`MapView`] owns the markers for a borrowed slice of postings and at most
//! one open info window. Selecting a marker replaces whatever was open.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::{
    geo::{Coordinates, rounded_distance_km},
    map::{Mappable, markers::Marker, markers_for},
    postings::{EndpointKind, Location},
    rates::Rate,
};

new_key_type! {
    /// Marker key
    pub struct MarkerKey;
}

/// The clicked marker's posting and endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<Id> {
    /// Posting
    pub posting: Id,

    /// Endpoint
    pub endpoint: EndpointKind,
}

/// Contents of the open info window.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoWindow<'a, P> {
    /// Selected posting.
    pub posting: &'a P,

    /// Selected endpoint.
    pub endpoint: EndpointKind,

    /// Endpoint location.
    pub location: &'a Location,

    /// Marker position.
    pub position: Coordinates,

    /// Origin to destination, when both are resolved.
    pub distance_km: Option<u64>,

    /// Posted rate, if any.
    pub rate: Option<Rate>,

    /// Per-trip rate divided by the distance.
    pub rate_per_km: Option<Decimal>,
}

#[derive(Debug, Clone)]
struct Placed<Id> {
    index: usize,
    marker: Marker<Id>,
}

/// Markers of a set of postings plus the open info window.
#[derive(Debug)]
pub struct MapView<'a, P: Mappable> {
    postings: &'a [P],
    markers: SlotMap<MarkerKey, Placed<P::Id>>,
    index: FxHashMap<(P::Id, EndpointKind), MarkerKey>,
    selected: Option<MarkerKey>,
}

impl<'a, P: Mappable> MapView<'a, P> {
    /// Place markers for every resolved endpoint of `postings`.
    pub fn new(postings: &'a [P]) -> Self {
        let mut markers = SlotMap::with_key();
        let mut lookup = FxHashMap::default();

        for (index, posting) in postings.iter().enumerate() {
            for marker in markers_for(posting) {
                let id = (marker.posting, marker.endpoint);
                let key = markers.insert(Placed { index, marker });

                lookup.insert(id, key);
            }
        }

        Self {
            postings,
            markers,
            index: lookup,
            selected: None,
        }
    }

    /// Number of placed markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether no marker was placed.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Markers in paint order, lowest z-index first.
    pub fn markers(&self) -> Vec<(MarkerKey, &Marker<P::Id>)> {
        let mut markers: Vec<_> = self
            .markers
            .iter()
            .map(|(key, placed)| (key, &placed.marker))
            .collect();

        markers.sort_by_key(|(_key, marker)| marker.style.z_index);

        markers
    }

    /// Key of the marker for one endpoint of one posting.
    pub fn find(&self, posting: P::Id, endpoint: EndpointKind) -> Option<MarkerKey> {
        self.index.get(&(posting, endpoint)).copied()
    }

    /// Open the info window for `key`, closing any other.
    ///
    /// Unknown keys leave the current selection untouched.
    pub fn select(&mut self, key: MarkerKey) -> Option<InfoWindow<'a, P>> {
        let window = self.window(key)?;

        self.selected = Some(key);

        Some(window)
    }

    /// Close the open info window.
    pub fn close(&mut self) {
        self.selected = None;
    }

    /// What is currently selected.
    pub fn selection(&self) -> Option<Selection<P::Id>> {
        let placed = self.markers.get(self.selected?)?;

        Some(Selection {
            posting: placed.marker.posting,
            endpoint: placed.marker.endpoint,
        })
    }

    /// The open info window.
    pub fn info_window(&self) -> Option<InfoWindow<'a, P>> {
        self.window(self.selected?)
    }

    fn window(&self, key: MarkerKey) -> Option<InfoWindow<'a, P>> {
        let placed = self.markers.get(key)?;
        let posting = self.postings.get(placed.index)?;
        let location = posting.endpoint(placed.marker.endpoint)?;

        Some(info_window(posting, placed.marker.endpoint, location, placed.marker.position))
    }
}

fn info_window<'a, P: Mappable>(
    posting: &'a P,
    endpoint: EndpointKind,
    location: &'a Location,
    position: Coordinates,
) -> InfoWindow<'a, P> {
    let distance_km = posting
        .position(EndpointKind::Origin)
        .zip(posting.position(EndpointKind::Destination))
        .map(|(origin, destination)| rounded_distance_km(origin, destination));

    let rate = posting.rate();
    let rate_per_km = rate
        .zip(distance_km)
        .and_then(|(rate, distance)| rate.per_km(distance));

    InfoWindow {
        posting,
        endpoint,
        location,
        position,
        distance_km,
        rate,
        rate_per_km,
    }
}
