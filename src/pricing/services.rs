//! Form hook services with hotel-rate access.
//!
//! The admin panel calls these with an explicit form snapshot and gets
//! back the fields to overwrite; nothing here keeps form state between
//! calls.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::AppCache;
use crate::error::AppError;
use crate::models::{BookingRecord, FormState, NumericInput};

use super::calculators::{self, PricingInputs};
use super::money::MoneyFormatter;
use super::queries;

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Hotel {hotel_id} not found")]
    HotelNotFound { hotel_id: i64 },

    #[error("Invalid numeric input for {field}: {value:?}")]
    InvalidNumericInput { field: &'static str, value: String },

    #[error("Check-out date {check_out} is before check-in date {check_in}")]
    InvalidDateRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("Total price {amount} is below the minimum of {minimum}")]
    BelowMinimum { amount: Decimal, minimum: Decimal },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    #[error("Amount overflow while computing {0}")]
    Overflow(&'static str),
}

impl PricingError {
    /// Stable identifier for API error responses
    pub fn kind(&self) -> &'static str {
        match self {
            PricingError::HotelNotFound { .. } => "hotel_not_found",
            PricingError::InvalidNumericInput { .. } => "invalid_numeric_input",
            PricingError::InvalidDateRange { .. } => "invalid_date_range",
            PricingError::BelowMinimum { .. } => "below_minimum",
            PricingError::MissingField(_) => "missing_field",
            PricingError::UnsupportedLocale(_) => "unsupported_locale",
            PricingError::Overflow(_) => "overflow",
        }
    }
}

/// Source of hotel base rates
pub trait HotelRateLookup: Clone + Send + Sync + 'static {
    /// Base nightly rate, or `None` when the hotel does not exist
    fn price_per_night(
        &self,
        hotel_id: i64,
    ) -> impl Future<Output = Result<Option<Decimal>, AppError>> + Send;

    /// Forget anything remembered about a hotel
    fn invalidate(&self, hotel_id: i64) -> impl Future<Output = ()> + Send;
}

/// Hotel rates read from PostgreSQL through the application cache
#[derive(Clone)]
pub struct CachedHotelRates {
    pool: PgPool,
    cache: AppCache,
}

impl CachedHotelRates {
    pub fn new(pool: PgPool, cache: AppCache) -> Self {
        Self { pool, cache }
    }

    pub fn cache(&self) -> &AppCache {
        &self.cache
    }
}

impl HotelRateLookup for CachedHotelRates {
    fn price_per_night(
        &self,
        hotel_id: i64,
    ) -> impl Future<Output = Result<Option<Decimal>, AppError>> + Send {
        async move {
            if let Some(cached) = self.cache.hotels.get(&hotel_id).await {
                debug!("Cache HIT for hotel: {}", hotel_id);
                return Ok(Some(cached.price_per_night));
            }

            debug!("Cache MISS for hotel: {}", hotel_id);
            let Some(hotel) = queries::find_hotel(&self.pool, hotel_id).await? else {
                return Ok(None);
            };
            let rate = hotel.price_per_night;
            self.cache.hotels.insert(hotel_id, Arc::new(hotel)).await;
            Ok(Some(rate))
        }
    }

    fn invalidate(&self, hotel_id: i64) -> impl Future<Output = ()> + Send {
        self.cache.invalidate_hotel(hotel_id)
    }
}

/// A single user edit on the booking form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldChange {
    #[serde(deserialize_with = "crate::models::booking::deserialize_optional_int")]
    HotelId(Option<i64>),
    CheckInDate(Option<NaiveDate>),
    CheckOutDate(Option<NaiveDate>),
    NumberOfRooms(Option<NumericInput>),
}

impl FieldChange {
    /// Copy of `state` with this edit applied
    pub fn apply_to(&self, state: &FormState) -> FormState {
        let mut next = state.clone();
        match self {
            FieldChange::HotelId(id) => next.hotel_id = *id,
            FieldChange::CheckInDate(date) => next.check_in_date = *date,
            FieldChange::CheckOutDate(date) => next.check_out_date = *date,
            FieldChange::NumberOfRooms(rooms) => next.number_of_rooms = rooms.clone(),
        }
        next
    }
}

/// Fields the form should overwrite after an event.
///
/// Absent fields keep whatever the form currently shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_nights: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_night: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<String>,
}

async fn require_rate<L: HotelRateLookup>(rates: &L, hotel_id: i64) -> Result<Decimal, AppError> {
    rates
        .price_per_night(hotel_id)
        .await?
        .ok_or_else(|| PricingError::HotelNotFound { hotel_id }.into())
}

/// Handle one field-change event.
///
/// Every event recomputes the derived fields through the same
/// [`calculators::quote`]. Clearing the hotel emits nothing, and clearing
/// a date resets the night count to zero.
pub async fn apply_field_change<L: HotelRateLookup>(
    rates: &L,
    money: &MoneyFormatter,
    change: &FieldChange,
    state: &FormState,
) -> Result<FieldUpdates, AppError> {
    if matches!(change, FieldChange::HotelId(None)) {
        return Ok(FieldUpdates::default());
    }

    let next = change.apply_to(state);
    let rooms = next.rooms()?;
    let base_rate = match next.hotel_id {
        Some(hotel_id) => Some(require_rate(rates, hotel_id).await?),
        None => None,
    };

    let date_event = matches!(
        change,
        FieldChange::CheckInDate(_) | FieldChange::CheckOutDate(_)
    );
    let dates_complete = next.check_in_date.is_some() && next.check_out_date.is_some();

    let quote = calculators::quote(&PricingInputs {
        check_in: next.check_in_date,
        check_out: next.check_out_date,
        // A half-cleared date range has no nights, whatever was shown before
        stored_nights: if date_event { Some(0) } else { next.total_nights },
        rooms,
        base_rate,
    })?;

    let mut updates = FieldUpdates {
        total_nights: quote.nights,
        price_per_night: quote.nightly_rate.map(|rate| money.format(rate)),
        total_price: quote.total_price.map(|total| money.format(total)),
    };
    if date_event && !dates_complete {
        updates.total_nights = Some(0);
    }

    debug!(?change, ?updates, "Field change handled");
    Ok(updates)
}

/// Load a persisted booking into the form.
///
/// A hotel that no longer exists leaves the nightly rate blank instead of
/// failing, so old bookings stay viewable.
pub async fn hydrate_record<L: HotelRateLookup>(
    rates: &L,
    money: &MoneyFormatter,
    record: &BookingRecord,
) -> Result<FormState, AppError> {
    let price_per_night = match rates.price_per_night(record.hotel_id).await? {
        Some(rate) => Some(money.format(calculators::compute_display_nightly_rate(rate)?)),
        None => {
            warn!("Hotel {} missing while hydrating booking", record.hotel_id);
            None
        }
    };

    Ok(FormState {
        user_id: Some(record.user_id),
        hotel_id: Some(record.hotel_id),
        check_in_date: Some(record.check_in_date),
        check_out_date: Some(record.check_out_date),
        total_nights: Some(calculators::compute_nights(
            record.check_in_date,
            record.check_out_date,
        )),
        number_of_rooms: Some(NumericInput::from(i64::from(record.number_of_rooms))),
        price_per_night,
        total_price: Some(money.to_display(record.total_price)?),
        status: Some(record.status),
    })
}

/// Turn a submitted form into the record to persist.
pub fn dehydrate_form(money: &MoneyFormatter, form: &FormState) -> Result<BookingRecord, PricingError> {
    let user_id = form.user_id.ok_or(PricingError::MissingField("user_id"))?;
    let hotel_id = form.hotel_id.ok_or(PricingError::MissingField("hotel_id"))?;
    let check_in_date = form
        .check_in_date
        .ok_or(PricingError::MissingField("check_in_date"))?;
    let check_out_date = form
        .check_out_date
        .ok_or(PricingError::MissingField("check_out_date"))?;
    if check_out_date < check_in_date {
        return Err(PricingError::InvalidDateRange {
            check_in: check_in_date,
            check_out: check_out_date,
        });
    }

    let raw_rooms = form
        .number_of_rooms
        .as_ref()
        .ok_or(PricingError::MissingField("number_of_rooms"))?;
    let rooms = raw_rooms.to_count("number_of_rooms")?;
    let number_of_rooms = i32::try_from(rooms)
        .ok()
        .filter(|rooms| *rooms > 0)
        .ok_or_else(|| PricingError::InvalidNumericInput {
            field: "number_of_rooms",
            value: raw_rooms.to_string(),
        })?;

    let price_per_night = form
        .price_per_night
        .as_deref()
        .ok_or(PricingError::MissingField("price_per_night"))?;
    let price_per_night = money.to_storage(money.parse_display(price_per_night)?)?;

    let total_price = form
        .total_price
        .as_deref()
        .ok_or(PricingError::MissingField("total_price"))?;
    let total_display = money.parse_display(total_price)?;
    money.ensure_minimum_total(total_display)?;

    let status = form.status.ok_or(PricingError::MissingField("status"))?;

    Ok(BookingRecord {
        id: None,
        user_id,
        hotel_id,
        check_in_date,
        check_out_date,
        number_of_rooms,
        price_per_night,
        total_price: money.to_storage(total_display)?,
        status,
    })
}

/// Fixed in-memory rates for tests
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct StaticHotelRates {
    rates: Arc<std::collections::HashMap<i64, Decimal>>,
}

#[cfg(test)]
impl StaticHotelRates {
    pub(crate) fn new(rates: &[(i64, Decimal)]) -> Self {
        Self {
            rates: Arc::new(rates.iter().copied().collect()),
        }
    }
}

#[cfg(test)]
impl HotelRateLookup for StaticHotelRates {
    fn price_per_night(
        &self,
        hotel_id: i64,
    ) -> impl Future<Output = Result<Option<Decimal>, AppError>> + Send {
        let rate = self.rates.get(&hotel_id).copied();
        async move { Ok(rate) }
    }

    fn invalidate(&self, _hotel_id: i64) -> impl Future<Output = ()> + Send {
        async {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rates() -> StaticHotelRates {
        StaticHotelRates::new(&[(1, dec!(500)), (2, dec!(250.5))])
    }

    fn filled_form() -> FormState {
        FormState {
            user_id: Some(7),
            hotel_id: Some(1),
            check_in_date: Some(date(2024, 1, 1)),
            check_out_date: Some(date(2024, 1, 4)),
            total_nights: Some(3),
            number_of_rooms: Some(NumericInput::from(2)),
            price_per_night: Some("500.000,00".to_string()),
            total_price: Some("3.000.000,00".to_string()),
            status: Some(BookingStatus::Pending),
        }
    }

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::HotelNotFound { hotel_id: 42 };
        assert!(err.to_string().contains("42"));
        assert_eq!(err.kind(), "hotel_not_found");

        let err = PricingError::InvalidNumericInput {
            field: "number_of_rooms",
            value: "abc".to_string(),
        };
        assert!(err.to_string().contains("number_of_rooms"));
        assert_eq!(err.kind(), "invalid_numeric_input");
    }

    #[test]
    fn test_field_change_deserializes_tagged() {
        let change: FieldChange =
            serde_json::from_str(r#"{"field": "check_out_date", "value": "2024-01-04"}"#).unwrap();
        assert_eq!(change, FieldChange::CheckOutDate(Some(date(2024, 1, 4))));

        let change: FieldChange =
            serde_json::from_str(r#"{"field": "number_of_rooms", "value": "3"}"#).unwrap();
        assert_eq!(
            change,
            FieldChange::NumberOfRooms(Some(NumericInput::Text("3".to_string())))
        );

        let change: FieldChange =
            serde_json::from_str(r#"{"field": "hotel_id", "value": "1"}"#).unwrap();
        assert_eq!(change, FieldChange::HotelId(Some(1)));

        let change: FieldChange =
            serde_json::from_str(r#"{"field": "hotel_id", "value": ""}"#).unwrap();
        assert_eq!(change, FieldChange::HotelId(None));
    }

    #[tokio::test]
    async fn test_hotel_selection_sets_rate_and_total() {
        let state = FormState {
            total_nights: Some(3),
            number_of_rooms: Some(NumericInput::from(2)),
            ..Default::default()
        };

        let updates = apply_field_change(
            &rates(),
            &MoneyFormatter::default(),
            &FieldChange::HotelId(Some(1)),
            &state,
        )
        .await
        .unwrap();

        assert_eq!(updates.price_per_night.as_deref(), Some("500.000,00"));
        assert_eq!(updates.total_price.as_deref(), Some("3.000.000,00"));
        assert_eq!(updates.total_nights, None);
    }

    #[tokio::test]
    async fn test_hotel_cleared_emits_nothing() {
        let updates = apply_field_change(
            &rates(),
            &MoneyFormatter::default(),
            &FieldChange::HotelId(None),
            &filled_form(),
        )
        .await
        .unwrap();

        assert_eq!(updates, FieldUpdates::default());
    }

    #[tokio::test]
    async fn test_unknown_hotel_is_an_error() {
        let err = apply_field_change(
            &rates(),
            &MoneyFormatter::default(),
            &FieldChange::HotelId(Some(99)),
            &FormState::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            AppError::Pricing(PricingError::HotelNotFound { hotel_id: 99 })
        ));
    }

    #[tokio::test]
    async fn test_check_out_change_recomputes_nights_and_total() {
        let state = FormState {
            hotel_id: Some(1),
            check_in_date: Some(date(2024, 1, 1)),
            number_of_rooms: Some(NumericInput::from(2)),
            ..Default::default()
        };

        let updates = apply_field_change(
            &rates(),
            &MoneyFormatter::default(),
            &FieldChange::CheckOutDate(Some(date(2024, 1, 4))),
            &state,
        )
        .await
        .unwrap();

        assert_eq!(updates.total_nights, Some(3));
        assert_eq!(updates.total_price.as_deref(), Some("3.000.000,00"));
    }

    #[tokio::test]
    async fn test_check_in_change_recomputes_nights() {
        let updates = apply_field_change(
            &rates(),
            &MoneyFormatter::default(),
            &FieldChange::CheckInDate(Some(date(2024, 1, 2))),
            &filled_form(),
        )
        .await
        .unwrap();

        assert_eq!(updates.total_nights, Some(2));
        assert_eq!(updates.total_price.as_deref(), Some("2.000.000,00"));
    }

    #[tokio::test]
    async fn test_clearing_check_out_resets_nights_without_price() {
        let updates = apply_field_change(
            &rates(),
            &MoneyFormatter::default(),
            &FieldChange::CheckOutDate(None),
            &filled_form(),
        )
        .await
        .unwrap();

        assert_eq!(updates.total_nights, Some(0));
        assert_eq!(updates.total_price, None);
    }

    #[tokio::test]
    async fn test_reversed_dates_are_rejected() {
        let err = apply_field_change(
            &rates(),
            &MoneyFormatter::default(),
            &FieldChange::CheckOutDate(Some(date(2023, 12, 30))),
            &filled_form(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            AppError::Pricing(PricingError::InvalidDateRange { .. })
        ));
    }

    #[tokio::test]
    async fn test_rooms_change_updates_total() {
        let updates = apply_field_change(
            &rates(),
            &MoneyFormatter::default(),
            &FieldChange::NumberOfRooms(Some(NumericInput::Text("4".to_string()))),
            &filled_form(),
        )
        .await
        .unwrap();

        assert_eq!(updates.total_price.as_deref(), Some("6.000.000,00"));
    }

    #[tokio::test]
    async fn test_zero_rooms_leaves_total_unchanged() {
        let updates = apply_field_change(
            &rates(),
            &MoneyFormatter::default(),
            &FieldChange::NumberOfRooms(Some(NumericInput::from(0))),
            &filled_form(),
        )
        .await
        .unwrap();

        assert_eq!(updates.total_price, None);
    }

    #[tokio::test]
    async fn test_non_numeric_rooms_are_rejected() {
        let err = apply_field_change(
            &rates(),
            &MoneyFormatter::default(),
            &FieldChange::NumberOfRooms(Some(NumericInput::Text("two".to_string()))),
            &filled_form(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            AppError::Pricing(PricingError::InvalidNumericInput { .. })
        ));
    }

    #[tokio::test]
    async fn test_hydrate_record_builds_display_values() {
        let record = BookingRecord {
            id: Some(10),
            user_id: 7,
            hotel_id: 2,
            check_in_date: date(2024, 3, 1),
            check_out_date: date(2024, 3, 3),
            number_of_rooms: 1,
            price_per_night: dec!(250.5),
            total_price: dec!(501),
            status: BookingStatus::Confirmed,
        };

        let form = hydrate_record(&rates(), &MoneyFormatter::default(), &record)
            .await
            .unwrap();

        assert_eq!(form.total_nights, Some(2));
        assert_eq!(form.price_per_night.as_deref(), Some("250.500,00"));
        assert_eq!(form.total_price.as_deref(), Some("501.000,00"));
        assert_eq!(form.status, Some(BookingStatus::Confirmed));
    }

    #[tokio::test]
    async fn test_hydrate_record_with_missing_hotel() {
        let record = BookingRecord {
            id: Some(11),
            user_id: 7,
            hotel_id: 99,
            check_in_date: date(2024, 3, 1),
            check_out_date: date(2024, 3, 2),
            number_of_rooms: 1,
            price_per_night: dec!(100),
            total_price: dec!(100),
            status: BookingStatus::Pending,
        };

        let form = hydrate_record(&rates(), &MoneyFormatter::default(), &record)
            .await
            .unwrap();

        assert_eq!(form.price_per_night, None);
        assert_eq!(form.total_price.as_deref(), Some("100.000,00"));
    }

    #[test]
    fn test_dehydrate_form_maps_back_to_stored_values() {
        let record = dehydrate_form(&MoneyFormatter::default(), &filled_form()).unwrap();

        assert_eq!(record.price_per_night, dec!(500));
        assert_eq!(record.total_price, dec!(3000));
        assert_eq!(record.number_of_rooms, 2);
        assert_eq!(record.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_hydrate_then_dehydrate_round_trip() {
        let original = dehydrate_form(&MoneyFormatter::default(), &filled_form()).unwrap();
        let form = hydrate_record(&rates(), &MoneyFormatter::default(), &original)
            .await
            .unwrap();
        let again = dehydrate_form(&MoneyFormatter::default(), &form).unwrap();

        assert_eq!(again, original);
    }

    #[test]
    fn test_dehydrate_form_validation() {
        let money = MoneyFormatter::default();

        let mut form = filled_form();
        form.status = None;
        assert_eq!(
            dehydrate_form(&money, &form).unwrap_err(),
            PricingError::MissingField("status")
        );

        let mut form = filled_form();
        form.total_price = Some("99,00".to_string());
        assert!(matches!(
            dehydrate_form(&money, &form),
            Err(PricingError::BelowMinimum { .. })
        ));

        let mut form = filled_form();
        form.number_of_rooms = Some(NumericInput::from(0));
        assert!(matches!(
            dehydrate_form(&money, &form),
            Err(PricingError::InvalidNumericInput { .. })
        ));

        let mut form = filled_form();
        form.check_out_date = Some(date(2023, 12, 25));
        assert!(matches!(
            dehydrate_form(&money, &form),
            Err(PricingError::InvalidDateRange { .. })
        ));
    }
}
