//! Integration test for the map view over a mixed set of cargo postings.
//!
//! Three postings are placed: one fully resolved with a per-trip rate, one with
//! an unresolved destination and one per-ton offer. The view should place five
//! markers, keep a single info window open and only derive a rate per km where
//! the rate is per trip and both ends are known.

use rust_decimal::Decimal;
use testresult::TestResult;

use freight::prelude::*;

#[derive(Debug)]
struct Carga {
    id: u32,
    origin: Location,
    destination: Option<Location>,
    rate: Option<Rate>,
}

impl Mappable for Carga {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn endpoint(&self, kind: EndpointKind) -> Option<&Location> {
        match kind {
            EndpointKind::Origin => Some(&self.origin),
            EndpointKind::Destination => self.destination.as_ref(),
        }
    }

    fn rate(&self) -> Option<Rate> {
        self.rate
    }
}

fn located(address: &str, province: &str, lat: f64, lng: f64) -> TestResult<Location> {
    let mut location = Location::from_address(address)?;
    location.province = Some(province.to_string());
    location.coordinates = Some(Coordinates::new(lat, lng)?);

    Ok(location)
}

fn cargas() -> TestResult<Vec<Carga>> {
    Ok(vec![
        Carga {
            id: 1,
            origin: located("Puerto de Rosario", "Santa Fe", -32.9468, -60.6393)?,
            destination: Some(located("Mercado Central", "Buenos Aires", -34.6037, -58.3816)?),
            rate: Some(Rate::new(Decimal::from(450_000), RateKind::PerTrip, false)?),
        },
        Carga {
            id: 2,
            origin: located("Parque Industrial", "Córdoba", -31.4201, -64.1888)?,
            destination: Some(Location::from_address("Campo a definir, Salta")?),
            rate: Some(Rate::new(Decimal::from(900_000), RateKind::PerTrip, true)?),
        },
        Carga {
            id: 3,
            origin: located("Bodega", "Mendoza", -32.8895, -68.8458)?,
            destination: Some(located("Depósito", "San Juan", -31.5375, -68.5364)?),
            rate: Some(Rate::new(Decimal::from(30_000), RateKind::PerTon, false)?),
        },
    ])
}

#[test]
fn places_one_marker_per_resolved_endpoint() -> TestResult {
    let cargas = cargas()?;
    let view = MapView::new(&cargas);

    assert_eq!(view.len(), 5);

    let origins = view
        .markers()
        .into_iter()
        .filter(|(_, marker)| marker.endpoint == EndpointKind::Origin)
        .inspect(|(_, marker)| assert_eq!(marker.style, MarkerStyle::ORIGIN))
        .count();

    assert_eq!(origins, 3);

    Ok(())
}

#[test]
fn walking_markers_keeps_a_single_window() -> TestResult {
    let cargas = cargas()?;
    let mut view = MapView::new(&cargas);

    let keys: Vec<MarkerKey> = view.markers().into_iter().map(|(key, _)| key).collect();

    for key in keys {
        let window = view.select(key).ok_or("marker without window")?;
        let selection = view.selection().ok_or("nothing selected")?;

        assert_eq!(selection.posting, window.posting.id);
        assert_eq!(selection.endpoint, window.endpoint);
    }

    view.close();

    assert!(view.info_window().is_none());

    Ok(())
}

#[test]
fn rate_per_km_only_for_resolved_per_trip_postings() -> TestResult {
    let cargas = cargas()?;
    let mut view = MapView::new(&cargas);

    let mut per_km = Vec::new();

    for id in 1..=3 {
        let key = view.find(id, EndpointKind::Origin).ok_or("missing origin")?;
        let window = view.select(key).ok_or("no window")?;

        per_km.push((id, window.distance_km.is_some(), window.rate_per_km));
    }

    let (_, resolved, rate) = per_km.first().copied().ok_or("no rows")?;

    assert!(resolved);
    assert!(rate.is_some_and(|rate| rate > Decimal::ZERO && rate.scale() <= 2));

    assert_eq!(per_km.get(1).copied(), Some((2, false, None)));
    assert_eq!(per_km.get(2).copied(), Some((3, true, None)));

    Ok(())
}

#[test]
fn per_km_rate_matches_the_haversine_distance() -> TestResult {
    let rosario = Coordinates::new(-32.9468, -60.6393)?;
    let buenos_aires = Coordinates::new(-34.6037, -58.3816)?;

    let distance = rounded_distance_km(rosario, buenos_aires);

    assert!((270..=290).contains(&distance), "{distance}");
    assert_eq!(distance, rounded_distance_km(buenos_aires, rosario));
    assert_eq!(
        rate_per_km(Decimal::from(450_000), distance),
        Decimal::from(450_000)
            .checked_div(Decimal::from(distance))
            .map(|rate| rate.round_dp(2))
    );
    assert_eq!(rate_per_km(Decimal::from(450_000), 0), None);

    Ok(())
}
