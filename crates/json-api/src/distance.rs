//! Distance Handler

use std::str::FromStr;

use freight::{
    geo::{Coordinates, rounded_distance_km},
    rates::rate_per_km,
};
use rust_decimal::Decimal;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, payloads::PerKmResponse};

/// Great-circle distance between two points.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DistanceResponse {
    /// Rounded to the nearest kilometre
    pub distance_km: u64,

    /// Unrounded haversine distance
    pub exact_km: f64,

    /// Present when a positive per-trip `rate` was given and the distance is
    /// not zero
    pub rate_per_km: Option<PerKmResponse>,
}

/// Distance Handler
///
/// `from` and `to` are `lat,lng` pairs; `rate` is an optional per-trip
/// amount in pesos.
#[endpoint(
    tags("map"),
    summary = "Distance And Rate Per Km",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    from: QueryParam<String, true>,
    to: QueryParam<String, true>,
    rate: QueryParam<String, false>,
) -> Result<Json<DistanceResponse>, StatusError> {
    let from = Coordinates::from_str(&from.into_inner()).or_400("invalid from")?;
    let to = Coordinates::from_str(&to.into_inner()).or_400("invalid to")?;
    let rate = rate
        .into_inner()
        .map(|rate| Decimal::from_str(rate.trim()))
        .transpose()
        .or_400("invalid rate")?;

    let distance_km = rounded_distance_km(from, to);

    Ok(Json(DistanceResponse {
        distance_km,
        exact_km: from.distance_km(&to),
        rate_per_km: rate
            .and_then(|rate| rate_per_km(rate, distance_km))
            .map(Into::into),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use super::*;

    fn make_service() -> Service {
        Service::new(Router::with_path("distance").get(handler))
    }

    async fn distance(query: &str) -> TestResult<DistanceResponse> {
        Ok(TestClient::get(format!("http://example.com/distance?{query}"))
            .send(&make_service())
            .await
            .take_json()
            .await?)
    }

    #[tokio::test]
    async fn rate_per_km_is_derived_from_a_positive_rate() -> TestResult {
        let response =
            distance("from=-34.6037,-58.3816&to=-31.4201,-64.1888&rate=647000").await?;

        assert_eq!(response.distance_km, 647);
        assert_eq!(
            response
                .rate_per_km
                .map(|per_km| per_km.amount.parse::<Decimal>())
                .transpose()?,
            Some(Decimal::from(1000))
        );

        Ok(())
    }

    #[tokio::test]
    async fn same_point_withholds_rate_per_km() -> TestResult {
        let response = distance("from=-34.6,-58.4&to=-34.6,-58.4&rate=100000").await?;

        assert_eq!(response.distance_km, 0);
        assert_eq!(response.rate_per_km, None);

        Ok(())
    }

    #[tokio::test]
    async fn zero_rate_withholds_rate_per_km() -> TestResult {
        let response = distance("from=-34.6,-58.4&to=-31.4,-64.2&rate=0").await?;

        assert_eq!(response.rate_per_km, None);

        Ok(())
    }

    #[tokio::test]
    async fn out_of_range_latitude_returns_400() -> TestResult {
        let res = TestClient::get("http://example.com/distance?from=95,0&to=0,0")
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
