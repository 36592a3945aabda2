//! Pricing engine module for the booking resource.
//!
//! Derives nights and prices for the booking form and formats money for
//! display. The admin panel calls in via HTTP/JSON hooks.

pub mod calculators;
pub mod models;
pub mod money;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{compute_nights, round_money, DISPLAY_SCALE};
pub use money::{Locale, MoneyFormatter};
pub use routes::router;
pub use services::{CachedHotelRates, FieldChange, FieldUpdates, HotelRateLookup, PricingError};
