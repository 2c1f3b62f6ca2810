//! `today` query parameter parsing.

use jiff::{Zoned, civil::Date};
use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use crate::extensions::*;

/// Resolve the reference day for visibility checks.
pub(crate) trait TodayExt {
    fn into_today(self) -> Result<Date, StatusError>;
}

impl TodayExt for QueryParam<String, false> {
    fn into_today(self) -> Result<Date, StatusError> {
        self.into_inner()
            .map(|value| value.parse::<Date>())
            .transpose()
            .or_400("could not parse \"today\" query parameter")
            .map(|today| today.unwrap_or_else(|| Zoned::now().date()))
    }
}
