//! Request and response shapes shared by the posting endpoints.

use std::str::FromStr;

use freight::{
    filters::PostingFilter,
    geo::{Coordinates, GeoError},
    map::{DraftLocations, EditorError, LocationDraft, MapCapability},
    postings::{Availability, EndpointKind, Location, OperatingRadius, PostingError},
    rates::{Rate, RateError, RateKind, format_ars},
};
use freight_app::geocoding::fill_missing;
use jiff::civil::Date;
use rust_decimal::Decimal;
use salvo::oapi::{ToSchema, extract::QueryParam};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::state::State;

/// Reasons a submitted payload cannot become a domain value.
#[derive(Debug, Error)]
pub(crate) enum PayloadError {
    #[error(transparent)]
    Posting(#[from] PostingError),

    #[error(transparent)]
    Coordinates(#[from] GeoError),

    #[error("lat and lng must be given together")]
    PartialCoordinates,

    #[error(transparent)]
    Rate(#[from] RateError),

    #[error("invalid amount: {0}")]
    Amount(#[from] rust_decimal::Error),

    #[error("invalid date: {0}")]
    Date(#[from] jiff::Error),

    #[error(transparent)]
    Editor(#[from] EditorError),
}

/// A posting endpoint as submitted and returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct LocationPayload {
    /// Free-text address
    pub address: String,

    /// Province, if known
    #[serde(default)]
    pub province: Option<String>,

    /// City, if known
    #[serde(default)]
    pub city: Option<String>,

    /// Latitude in decimal degrees
    #[serde(default)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    #[serde(default)]
    pub lng: Option<f64>,
}

impl TryFrom<LocationPayload> for Location {
    type Error = PayloadError;

    fn try_from(payload: LocationPayload) -> Result<Self, Self::Error> {
        if payload.lat.is_some() != payload.lng.is_some() {
            return Err(PayloadError::PartialCoordinates);
        }

        let mut location = Location::from_address(payload.address.trim())?;

        location.province = non_blank(payload.province);
        location.city = non_blank(payload.city);
        location.coordinates = Coordinates::from_parts(payload.lat, payload.lng)?;

        Ok(location)
    }
}

impl From<Location> for LocationPayload {
    fn from(location: Location) -> Self {
        Self {
            address: location.address,
            province: location.province,
            city: location.city,
            lat: location.coordinates.map(|c| c.lat()),
            lng: location.coordinates.map(|c| c.lng()),
        }
    }
}

/// A rate as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct RateRequest {
    /// Amount in pesos, as a decimal string
    pub amount: String,

    /// `per_trip` or `per_ton`
    pub kind: String,

    /// Whether the amount is indicative
    #[serde(default)]
    pub approximate: bool,
}

impl TryFrom<RateRequest> for Rate {
    type Error = PayloadError;

    fn try_from(request: RateRequest) -> Result<Self, Self::Error> {
        let amount = Decimal::from_str(request.amount.trim())?;
        let kind = request.kind.trim().parse::<RateKind>()?;

        Ok(Rate::new(amount, kind, request.approximate)?)
    }
}

/// A rate as returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct RateResponse {
    /// Amount in pesos, as a decimal string
    pub amount: String,

    /// `per_trip` or `per_ton`
    pub kind: String,

    /// Whether the amount is indicative
    pub approximate: bool,

    /// Human-readable form, e.g. `~$150.000,00/trip`
    pub display: String,
}

impl From<Rate> for RateResponse {
    fn from(rate: Rate) -> Self {
        Self {
            amount: rate.amount().to_string(),
            kind: rate.kind().as_str().to_string(),
            approximate: rate.is_approximate(),
            display: rate.to_string(),
        }
    }
}

/// A per-kilometre amount, raw and formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct PerKmResponse {
    /// Pesos per kilometre, two decimals
    pub amount: String,

    /// Formatted in ARS
    pub display: String,
}

impl From<Decimal> for PerKmResponse {
    fn from(amount: Decimal) -> Self {
        Self {
            amount: amount.to_string(),
            display: format_ars(amount),
        }
    }
}

/// When a truck is offered: no dates for permanent, one date for a single
/// day, both for an inclusive range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct AvailabilityPayload {
    /// First day, `YYYY-MM-DD`
    #[serde(default)]
    pub from: Option<String>,

    /// Last day, `YYYY-MM-DD`
    #[serde(default)]
    pub to: Option<String>,
}

impl TryFrom<AvailabilityPayload> for Availability {
    type Error = PayloadError;

    fn try_from(payload: AvailabilityPayload) -> Result<Self, Self::Error> {
        let from = parse_date(payload.from)?;
        let to = parse_date(payload.to)?;

        Ok(Availability::from_columns(from, to)?)
    }
}

/// Availability as returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct AvailabilityResponse {
    /// `permanent`, `on` or `between`
    pub kind: String,

    /// First day
    pub from: Option<String>,

    /// Last day
    pub to: Option<String>,
}

impl From<Availability> for AvailabilityResponse {
    fn from(availability: Availability) -> Self {
        let kind = match availability {
            Availability::Permanent => "permanent",
            Availability::On { .. } => "on",
            Availability::Between { .. } => "between",
        };

        let (from, to) = availability.columns();

        Self {
            kind: kind.to_string(),
            from: from.map(|date| date.to_string()),
            to: to.map(|date| date.to_string()),
        }
    }
}

/// What the client map can do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CapabilityResponse {
    /// `interactive` or `text_only`
    pub mode: String,

    /// Browser key for the map provider, when interactive.
    pub api_key: Option<String>,
}

impl From<MapCapability> for CapabilityResponse {
    fn from(capability: MapCapability) -> Self {
        match capability {
            MapCapability::Interactive { api_key } => Self {
                mode: "interactive".to_string(),
                api_key: Some(api_key),
            },
            MapCapability::TextOnly => Self {
                mode: "text_only".to_string(),
                api_key: None,
            },
        }
    }
}

pub(crate) fn parse_date(value: Option<String>) -> Result<Option<Date>, PayloadError> {
    non_blank(value)
        .map(|value| value.parse::<Date>())
        .transpose()
        .map_err(PayloadError::from)
}

pub(crate) fn parse_radius(km: u16) -> Result<OperatingRadius, PayloadError> {
    Ok(OperatingRadius::new(km)?)
}

/// Browsing filter from the `origin`, `destination` and `truck_type` query
/// parameters.
pub(crate) fn posting_filter(
    origin: QueryParam<String, false>,
    destination: QueryParam<String, false>,
    truck_type: QueryParam<String, false>,
) -> PostingFilter {
    PostingFilter::new(
        origin.into_inner(),
        destination.into_inner(),
        truck_type.into_inner(),
    )
}

/// Map capability, degrading to text-only when settings are unreadable.
pub(crate) async fn map_capability(state: &State) -> MapCapability {
    state
        .app
        .settings
        .map_capability()
        .await
        .unwrap_or_else(|error| {
            warn!(%error, "map credential unavailable, using text-only map");

            MapCapability::TextOnly
        })
}

/// Pass submitted endpoints through a location draft, then geocode what is
/// still unresolved. Geocoding failures leave coordinates empty.
pub(crate) async fn resolve_locations(
    state: &State,
    origin: Location,
    destination: Option<Location>,
) -> Result<DraftLocations, PayloadError> {
    let mut draft = LocationDraft::new(map_capability(state).await);

    place(&mut draft, EndpointKind::Origin, origin)?;

    if let Some(destination) = destination {
        place(&mut draft, EndpointKind::Destination, destination)?;
    }

    let mut locations = draft.commit()?;
    let geocoder = state.app.geocoder.as_ref();

    fill_missing(geocoder, &mut locations.origin).await;

    if let Some(destination) = locations.destination.as_mut() {
        fill_missing(geocoder, destination).await;
    }

    Ok(locations)
}

/// Text-only maps cannot place markers, so only the address survives.
fn place(
    draft: &mut LocationDraft,
    kind: EndpointKind,
    location: Location,
) -> Result<(), EditorError> {
    if draft.capability().is_interactive() {
        draft.pick_place(kind, location)
    } else {
        draft.type_address(kind, location.address)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use freight_app::geocoding::GeocodedPlace;
    use jiff::civil::date;
    use testresult::TestResult;

    use crate::test_helpers::Mocks;

    use super::*;

    fn payload(address: &str, lat: Option<f64>, lng: Option<f64>) -> LocationPayload {
        LocationPayload {
            address: address.to_string(),
            province: Some("  ".to_string()),
            city: None,
            lat,
            lng,
        }
    }

    #[test]
    fn location_payload_requires_both_coordinates() {
        let result = Location::try_from(payload("Rosario", Some(-32.9), None));

        assert!(matches!(result, Err(PayloadError::PartialCoordinates)));
    }

    #[test]
    fn location_payload_rejects_out_of_range_coordinates() {
        let result = Location::try_from(payload("Rosario", Some(-132.9), Some(-60.6)));

        assert!(matches!(result, Err(PayloadError::Coordinates(_))));
    }

    #[test]
    fn location_payload_blanks_become_absent() -> TestResult {
        let location = Location::try_from(payload(" Rosario ", Some(-32.95), Some(-60.64)))?;

        assert_eq!(location.address, "Rosario");
        assert_eq!(location.province, None);
        assert!(location.coordinates.is_some(), "expected coordinates");

        Ok(())
    }

    #[test]
    fn rate_request_parses_amount_and_kind() -> TestResult {
        let rate = Rate::try_from(RateRequest {
            amount: "150000.50".to_string(),
            kind: "per_trip".to_string(),
            approximate: true,
        })?;

        assert_eq!(rate.amount(), Decimal::new(15_000_050, 2));
        assert_eq!(rate.kind(), RateKind::PerTrip);
        assert!(rate.is_approximate());

        Ok(())
    }

    #[test]
    fn rate_request_rejects_unknown_kinds_and_negative_amounts() {
        let unknown = Rate::try_from(RateRequest {
            amount: "10".to_string(),
            kind: "per_hour".to_string(),
            approximate: false,
        });
        let negative = Rate::try_from(RateRequest {
            amount: "-10".to_string(),
            kind: "per_ton".to_string(),
            approximate: false,
        });

        assert!(matches!(unknown, Err(PayloadError::Rate(_))));
        assert!(matches!(negative, Err(PayloadError::Rate(_))));
    }

    #[test]
    fn availability_payload_follows_the_column_rules() -> TestResult {
        let permanent = Availability::try_from(AvailabilityPayload::default())?;
        let range = Availability::try_from(AvailabilityPayload {
            from: Some("2026-11-01".to_string()),
            to: Some("2026-11-30".to_string()),
        })?;
        let inverted = Availability::try_from(AvailabilityPayload {
            from: Some("2026-11-30".to_string()),
            to: Some("2026-11-01".to_string()),
        });

        assert_eq!(permanent, Availability::Permanent);
        assert_eq!(
            range,
            Availability::Between {
                from: date(2026, 11, 1),
                to: date(2026, 11, 30)
            }
        );
        assert!(matches!(inverted, Err(PayloadError::Posting(_))));

        Ok(())
    }

    #[tokio::test]
    async fn text_only_maps_drop_submitted_coordinates_and_geocode() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .settings
            .expect_map_capability()
            .once()
            .return_once(|| Ok(MapCapability::TextOnly));

        mocks
            .geocoder
            .expect_geocode()
            .once()
            .withf(|address| address == "Rosario")
            .return_once(|_| {
                Ok(Some(GeocodedPlace {
                    formatted_address: None,
                    coordinates: Coordinates::new(-32.9468, -60.6393)?,
                    province: Some("Santa Fe".to_string()),
                    city: Some("Rosario".to_string()),
                }))
            });

        let state = mocks.into_state();
        let origin = Location::try_from(payload("Rosario", Some(0.0), Some(0.0)))?;

        let locations = resolve_locations(&state, origin, None).await?;

        assert_eq!(
            locations.origin.coordinates,
            Some(Coordinates::new(-32.9468, -60.6393)?)
        );
        assert_eq!(locations.origin.province.as_deref(), Some("Santa Fe"));
        assert_eq!(locations.destination, None);

        Ok(())
    }

    #[tokio::test]
    async fn interactive_maps_keep_picked_places() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .settings
            .expect_map_capability()
            .once()
            .return_once(|| Ok(MapCapability::from_credential(Some("browser-key"))));

        mocks.geocoder.expect_geocode().never();

        let state = mocks.into_state();
        let origin = Location::try_from(payload("Rosario", Some(-32.95), Some(-60.64)))?;
        let destination = Location::try_from(payload("Córdoba", Some(-31.42), Some(-64.19)))?;

        let locations = resolve_locations(&state, origin.clone(), Some(destination.clone())).await?;

        assert_eq!(locations.origin, origin);
        assert_eq!(locations.destination, Some(destination));

        Ok(())
    }
}
