//! The date-time of a transaction and the formats it is read and written in.

use std::fmt::Display;

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use time::{
    OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::Error;

/// The format produced by an HTML `datetime-local` input, e.g. "2024-01-01T15:45".
const MINUTE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const SECOND_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const SUBSECOND_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");

/// Fixed width so that text comparison in SQL matches chronological order.
const STORAGE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]"
);

/// When a transaction happened, as a calendar date and wall-clock time
/// without a UTC offset.
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionDateTime(PrimitiveDateTime);

impl TransactionDateTime {
    /// Create a transaction date-time.
    pub const fn new(date_time: PrimitiveDateTime) -> Self {
        Self(date_time)
    }

    /// Parse a date-time sent by a client.
    ///
    /// Accepts "YYYY-MM-DDTHH:MM", "YYYY-MM-DDTHH:MM:SS" (optionally with
    /// fractional seconds), or an RFC 3339 string with an offset, which is
    /// converted to UTC.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidField] if the string is in none of these formats.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let text = text.trim();

        PrimitiveDateTime::parse(text, MINUTE_FORMAT)
            .or_else(|_| PrimitiveDateTime::parse(text, SECOND_FORMAT))
            .or_else(|_| PrimitiveDateTime::parse(text, SUBSECOND_FORMAT))
            .or_else(|_| {
                OffsetDateTime::parse(text, &Rfc3339).map(|date_time| {
                    let utc = date_time.to_offset(UtcOffset::UTC);
                    PrimitiveDateTime::new(utc.date(), utc.time())
                })
            })
            .map(Self)
            .map_err(|_| {
                Error::InvalidField(format!(
                    "Invalid datetime \"{text}\", expected a date-time like 2024-01-01T15:45"
                ))
            })
    }

    /// Format the date-time the way clients send it, dropping seconds when
    /// they are zero.
    pub fn to_client_string(&self) -> Result<String, time::error::Format> {
        let format = if self.0.nanosecond() != 0 {
            SUBSECOND_FORMAT
        } else if self.0.second() != 0 {
            SECOND_FORMAT
        } else {
            MINUTE_FORMAT
        };

        self.0.format(format)
    }
}

impl Display for TransactionDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_client_string() {
            Ok(text) => write!(f, "{text}"),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for TransactionDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = self
            .to_client_string()
            .map_err(serde::ser::Error::custom)?;

        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for TransactionDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;

        Self::parse(&text).map_err(de::Error::custom)
    }
}

impl ToSql for TransactionDateTime {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let text = self
            .0
            .format(STORAGE_FORMAT)
            .map_err(|error| rusqlite::Error::ToSqlConversionFailure(Box::new(error)))?;

        Ok(ToSqlOutput::from(text))
    }
}

impl FromSql for TransactionDateTime {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        PrimitiveDateTime::parse(text, STORAGE_FORMAT)
            .map(Self)
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}
