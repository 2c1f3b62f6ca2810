//! Create Truck Handler

use std::str::FromStr;

use freight::postings::{Availability, Location};
use freight_app::domain::trucks::{data::NewTruck, records::TruckUuid};
use rust_decimal::Decimal;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    payloads::{AvailabilityPayload, LocationPayload, parse_radius, resolve_locations},
    trucks::{TruckResponse, errors::into_status_error},
};

/// Create Truck Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateTruckRequest {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub origin: LocationPayload,

    /// Preferred destination; omit to go anywhere within the radius
    #[serde(default)]
    pub destination: Option<LocationPayload>,
    pub truck_type: String,

    /// Tonnes, as a decimal string
    pub capacity_tons: String,
    #[serde(default)]
    pub refrigerated: bool,

    /// Operating radius in kilometres, at most 500
    pub radius_km: u16,
    #[serde(default)]
    pub availability: AvailabilityPayload,
}

/// Create Truck Handler
///
/// Offers a truck for the signed-in carrier.
#[endpoint(
    tags("trucks"),
    summary = "Create Truck",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Truck created"),
        (status_code = StatusCode::CONFLICT, description = "Truck already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateTruckRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<TruckResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let owner = depot.user_uuid_or_401()?;
    let request = json.into_inner();

    let origin = Location::try_from(request.origin).or_400("invalid origin")?;
    let destination = request
        .destination
        .map(Location::try_from)
        .transpose()
        .or_400("invalid destination")?;
    let capacity_tons =
        Decimal::from_str(request.capacity_tons.trim()).or_400("invalid capacity_tons")?;
    let radius = parse_radius(request.radius_km).or_400("invalid radius_km")?;
    let availability =
        Availability::try_from(request.availability).or_400("invalid availability")?;

    let locations = resolve_locations(state, origin, destination)
        .await
        .or_400("invalid locations")?;

    let new_truck = NewTruck {
        uuid: request.uuid.map_or_else(TruckUuid::new, TruckUuid::from_uuid),
        origin: locations.origin,
        destination: locations.destination,
        truck_type: request.truck_type,
        capacity_tons,
        refrigerated: request.refrigerated,
        radius,
        availability,
    };

    let truck = state
        .app
        .trucks
        .create_truck(owner, new_truck)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/trucks/{}", truck.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(truck.into()))
}

#[cfg(test)]
mod tests {
    use freight::map::MapCapability;
    use jiff::civil::date;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER_UUID, make_truck};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.service(Router::with_path("trucks").post(handler))
    }

    fn body(uuid: Uuid, radius_km: u16) -> Value {
        json!({
            "uuid": uuid,
            "origin": { "address": "Rosario", "lat": -32.9468, "lng": -60.6393 },
            "truck_type": "semi",
            "capacity_tons": "28",
            "radius_km": radius_km,
            "availability": { "from": "2026-11-01", "to": "2026-11-15" },
        })
    }

    #[tokio::test]
    async fn creates_a_truck_with_a_date_range() -> TestResult {
        let uuid = TruckUuid::new();
        let truck = make_truck(uuid)?;

        let mut mocks = Mocks::default();

        mocks
            .settings
            .expect_map_capability()
            .once()
            .return_once(|| Ok(MapCapability::from_credential(Some("browser-key"))));

        mocks
            .trucks
            .expect_create_truck()
            .once()
            .withf(move |owner, new| {
                *owner == TEST_USER_UUID
                    && new.uuid == uuid
                    && new.destination.is_none()
                    && new.radius.km() == 200
                    && new.availability
                        == Availability::Between {
                            from: date(2026, 11, 1),
                            to: date(2026, 11, 15),
                        }
            })
            .return_once(move |_, _| Ok(truck));

        let mut res = TestClient::post("http://example.com/trucks")
            .json(&body(uuid.into_uuid(), 200))
            .send(&make_service(mocks))
            .await;

        let location = res
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/trucks/{uuid}")));

        let response: TruckResponse = res.take_json().await?;

        assert_eq!(response.uuid, uuid.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn radius_beyond_the_maximum_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.trucks.expect_create_truck().never();

        let res = TestClient::post("http://example.com/trucks")
            .json(&body(Uuid::now_v7(), 501))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn unparsable_capacity_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.trucks.expect_create_truck().never();

        let mut request = body(Uuid::now_v7(), 100);
        request["capacity_tons"] = json!("lots");

        let res = TestClient::post("http://example.com/trucks")
            .json(&request)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
