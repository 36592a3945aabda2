//! Domain models shared by the hooks

pub mod booking;

pub use booking::{BookingRecord, BookingStatus, FormState, NumericInput};
