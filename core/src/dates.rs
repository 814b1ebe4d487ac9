//! `MM/DD/YYYY` date handling.
//!
//! Every persisted date uses this format, zero padded. The validators
//! re-read the tables, so the format must survive a round trip exactly.

use crate::error::{GenError, GenResult};
use chrono::{Duration, NaiveDate};

pub const DATE_FORMAT: &str = "%m/%d/%Y";

pub fn parse_date(value: &str) -> GenResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| GenError::MalformedDate {
        value: value.to_string(),
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Serde adapter: `#[serde(with = "crate::dates::mdy")]`.
pub mod mdy {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(de::Error::custom)
    }
}
