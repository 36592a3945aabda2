//! Booking list rendering

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{BookingRecord, BookingStatus};
use crate::pricing::{MoneyFormatter, PricingError};

/// Date format of the list columns, e.g. `Monday, 01 January 2024`
const LIST_DATE_FORMAT: &str = "%A, %d %B %Y";

/// Booking as handed over by the panel's list query
#[derive(Debug, Clone, Deserialize)]
pub struct BookingListItem {
    #[serde(flatten)]
    pub record: BookingRecord,
    pub user_name: String,
    pub hotel_name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Rendered list row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub booked_by: String,
    pub hotel: String,
    pub check_in_date: String,
    pub check_out_date: String,
    pub number_of_rooms: i32,
    pub total_price: String,
    pub status: BookingStatus,
    pub status_label: &'static str,
    pub status_color: &'static str,
}

fn list_date(date: NaiveDate) -> String {
    date.format(LIST_DATE_FORMAT).to_string()
}

impl BookingRow {
    pub fn render(item: &BookingListItem, money: &MoneyFormatter) -> Result<Self, PricingError> {
        let record = &item.record;
        Ok(Self {
            id: record.id,
            booked_by: item.user_name.clone(),
            hotel: item.hotel_name.clone(),
            check_in_date: list_date(record.check_in_date),
            check_out_date: list_date(record.check_out_date),
            number_of_rooms: record.number_of_rooms,
            total_price: money.to_currency_label(record.total_price, money.locale().code)?,
            status: record.status,
            status_label: record.status.label(),
            status_color: record.status.color(),
        })
    }
}

/// Render list items, newest first
pub fn render_rows(
    money: &MoneyFormatter,
    mut items: Vec<BookingListItem>,
) -> Result<Vec<BookingRow>, PricingError> {
    // Undated items sort last
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.iter().map(|item| BookingRow::render(item, money)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn item(id: i64, created_at: Option<DateTime<Utc>>) -> BookingListItem {
        BookingListItem {
            record: BookingRecord {
                id: Some(id),
                user_id: 1,
                hotel_id: 1,
                check_in_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                check_out_date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
                number_of_rooms: 2,
                price_per_night: dec!(500),
                total_price: dec!(1500),
                status: BookingStatus::Confirmed,
            },
            user_name: "Ayu".to_string(),
            hotel_name: "Hotel Melati".to_string(),
            created_at,
        }
    }

    #[test]
    fn test_render_row_formats_columns() {
        let row = BookingRow::render(&item(1, None), &MoneyFormatter::default()).unwrap();

        assert_eq!(row.check_in_date, "Monday, 01 January 2024");
        assert_eq!(row.check_out_date, "Thursday, 04 January 2024");
        assert_eq!(row.total_price, "Rp\u{a0}1.500.000,00");
        assert_eq!(row.status_color, "success");
        assert_eq!(row.booked_by, "Ayu");
    }

    #[test]
    fn test_render_rows_newest_first() {
        let older = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();
        let items = vec![item(1, Some(older)), item(2, None), item(3, Some(newer))];

        let rows = render_rows(&MoneyFormatter::default(), items).unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.id).collect();

        assert_eq!(ids, vec![Some(3), Some(1), Some(2)]);
    }

    #[test]
    fn test_list_item_deserializes_flat_record() {
        let json = r#"{
            "id": 5,
            "user_id": 1,
            "hotel_id": 2,
            "check_in_date": "2024-01-01",
            "check_out_date": "2024-01-02",
            "number_of_rooms": 1,
            "price_per_night": "500.00",
            "total_price": "500.00",
            "status": "pending",
            "user_name": "Budi",
            "hotel_name": "Hotel Kenanga"
        }"#;

        let item: BookingListItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.record.id, Some(5));
        assert_eq!(item.record.total_price, dec!(500));
        assert_eq!(item.hotel_name, "Hotel Kenanga");
        assert!(item.created_at.is_none());
    }
}
