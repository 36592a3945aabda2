//! Booking record and form snapshot models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::pricing::PricingError;

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    /// Badge colour name understood by the admin panel
    pub fn color(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "warning",
            BookingStatus::Confirmed => "success",
            BookingStatus::Cancelled => "danger",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "heroicon-o-clock",
            BookingStatus::Confirmed => "heroicon-o-check-circle",
            BookingStatus::Cancelled => "heroicon-o-x-circle",
        }
    }
}

/// Booking as persisted by the admin framework.
///
/// Amounts are in stored (base) units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub user_id: i64,
    pub hotel_id: i64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub number_of_rooms: i32,
    #[serde(serialize_with = "rust_decimal::serde::str::serialize")]
    pub price_per_night: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::str::serialize")]
    pub total_price: Decimal,
    pub status: BookingStatus,
}

/// Numeric form input: the panel sends either a JSON number or raw text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(serde_json::Number),
    Text(String),
}

impl NumericInput {
    /// Parse as a non-negative whole count. Blank text counts as zero.
    pub fn to_count(&self, field: &'static str) -> Result<i64, PricingError> {
        let invalid = || PricingError::InvalidNumericInput {
            field,
            value: self.to_string(),
        };
        let count = match self {
            NumericInput::Number(n) => n.as_i64().ok_or_else(invalid)?,
            NumericInput::Text(s) if s.trim().is_empty() => 0,
            NumericInput::Text(s) => s.trim().parse::<i64>().map_err(|_| invalid())?,
        };
        if count < 0 {
            return Err(invalid());
        }
        Ok(count)
    }
}

/// Optional integer sent as a number, numeric text, blank text or null
pub(crate) fn deserialize_optional_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumericInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumericInput::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid integer: {}", n))),
        Some(NumericInput::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumericInput::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid integer: {:?}", s))),
    }
}

impl From<i64> for NumericInput {
    fn from(value: i64) -> Self {
        NumericInput::Number(value.into())
    }
}

impl std::fmt::Display for NumericInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericInput::Number(n) => write!(f, "{}", n),
            NumericInput::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Current state of the booking form.
///
/// Price fields hold display text (`3.000.000,00`), not stored amounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormState {
    #[serde(deserialize_with = "deserialize_optional_int")]
    pub user_id: Option<i64>,
    #[serde(deserialize_with = "deserialize_optional_int")]
    pub hotel_id: Option<i64>,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    #[serde(deserialize_with = "deserialize_optional_int")]
    pub total_nights: Option<i64>,
    pub number_of_rooms: Option<NumericInput>,
    pub price_per_night: Option<String>,
    pub total_price: Option<String>,
    pub status: Option<BookingStatus>,
}

impl FormState {
    /// Empty form for a new booking
    pub fn for_create() -> Self {
        Self {
            number_of_rooms: Some(NumericInput::from(1)),
            ..Default::default()
        }
    }

    /// Room count as entered; missing means zero
    pub fn rooms(&self) -> Result<i64, PricingError> {
        self.number_of_rooms
            .as_ref()
            .map(|raw| raw.to_count("number_of_rooms"))
            .transpose()
            .map(|rooms| rooms.unwrap_or(0))
    }
}
