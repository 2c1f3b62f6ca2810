//! Shared column codecs for posting rows.

use std::error::Error;

use freight::{
    geo::Coordinates,
    postings::{Location, PostingState},
    rates::{Rate, RateKind},
};
use jiff::civil::Date;
use jiff_sqlx::Date as SqlxDate;
use rust_decimal::Decimal;
use sqlx::{Row, postgres::PgRow};

fn decode_error(column: &str, source: impl Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

/// Read `{prefix}_address`, `_province`, `_city`, `_lat` and `_lng`.
pub(crate) fn location(row: &PgRow, prefix: &str) -> sqlx::Result<Location> {
    optional_location(row, prefix)?
        .ok_or_else(|| sqlx::Error::ColumnNotFound(format!("{prefix}_address")))
}

/// Like [`location`], but a null address means no location.
pub(crate) fn optional_location(row: &PgRow, prefix: &str) -> sqlx::Result<Option<Location>> {
    let address_column = format!("{prefix}_address");

    let Some(address) = row.try_get::<Option<String>, _>(address_column.as_str())? else {
        return Ok(None);
    };

    let lat: Option<f64> = row.try_get(format!("{prefix}_lat").as_str())?;
    let lng: Option<f64> = row.try_get(format!("{prefix}_lng").as_str())?;

    let coordinates =
        Coordinates::from_parts(lat, lng).map_err(|source| decode_error(&address_column, source))?;

    Ok(Some(Location {
        address,
        province: row.try_get(format!("{prefix}_province").as_str())?,
        city: row.try_get(format!("{prefix}_city").as_str())?,
        coordinates,
    }))
}

pub(crate) fn state(row: &PgRow) -> sqlx::Result<PostingState> {
    row.try_get::<String, _>("state")?
        .parse()
        .map_err(|source| decode_error("state", source))
}

/// Read `rate_amount`, `rate_kind` and `rate_approximate`.
pub(crate) fn rate(row: &PgRow) -> sqlx::Result<Option<Rate>> {
    let Some(amount) = row.try_get::<Option<Decimal>, _>("rate_amount")? else {
        return Ok(None);
    };

    let kind: RateKind = row
        .try_get::<String, _>("rate_kind")?
        .parse()
        .map_err(|source| decode_error("rate_kind", source))?;

    Rate::new(amount, kind, row.try_get("rate_approximate")?)
        .map(Some)
        .map_err(|source| decode_error("rate_amount", source))
}

pub(crate) fn date(row: &PgRow, column: &str) -> sqlx::Result<Option<Date>> {
    Ok(row
        .try_get::<Option<SqlxDate>, _>(column)?
        .map(SqlxDate::to_jiff))
}

/// Bindable parts of a location.
#[derive(Debug, Clone, Default)]
pub(crate) struct LocationColumns {
    pub address: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl From<Option<&Location>> for LocationColumns {
    fn from(location: Option<&Location>) -> Self {
        let Some(location) = location else {
            return Self::default();
        };

        Self {
            address: Some(location.address.clone()),
            province: location.province.clone(),
            city: location.city.clone(),
            lat: location.coordinates.map(|c| c.lat()),
            lng: location.coordinates.map(|c| c.lng()),
        }
    }
}

/// Bindable parts of a rate.
#[derive(Debug, Clone, Default)]
pub(crate) struct RateColumns {
    pub amount: Option<Decimal>,
    pub kind: Option<&'static str>,
    pub approximate: bool,
}

impl From<Option<Rate>> for RateColumns {
    fn from(rate: Option<Rate>) -> Self {
        rate.map_or_else(Self::default, |rate| Self {
            amount: Some(rate.amount()),
            kind: Some(rate.kind().as_str()),
            approximate: rate.is_approximate(),
        })
    }
}
