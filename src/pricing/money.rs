//! Money formatting between stored amounts, display text and persisted values.
//!
//! Stored amounts are plain decimals in base units. The form shows them
//! multiplied by [`DISPLAY_SCALE`] with locale grouping, and writes them
//! back divided by the configured persistence scale.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::calculators::{round_money, DISPLAY_SCALE};
use super::services::PricingError;

/// Smallest total price accepted on save, in display scale.
pub const MINIMUM_TOTAL_PRICE: Decimal = dec!(100);

/// ISO currency code for every amount handled by this service.
pub const CURRENCY_CODE: &str = "IDR";

/// Separator conventions for one locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    pub code: &'static str,
    pub decimal_separator: char,
    pub group_separator: char,
    /// How IDR is written in this locale
    pub currency_symbol: &'static str,
}

impl Locale {
    pub const ID_ID: Locale = Locale {
        code: "id_ID",
        decimal_separator: ',',
        group_separator: '.',
        currency_symbol: "Rp",
    };

    pub const EN_US: Locale = Locale {
        code: "en_US",
        decimal_separator: '.',
        group_separator: ',',
        currency_symbol: "IDR",
    };

    /// Resolve a locale code such as `id_ID` or `en-US`
    pub fn parse(code: &str) -> Result<Locale, PricingError> {
        match code.trim().replace('-', "_").as_str() {
            "id_ID" | "id" => Ok(Self::ID_ID),
            "en_US" | "en" => Ok(Self::EN_US),
            _ => Err(PricingError::UnsupportedLocale(code.to_string())),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::ID_ID
    }
}

/// Remove everything except digits, `,`, `.` and `-`.
pub fn strip_formatting(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect()
}

/// Format an amount with two decimals and the locale's separators.
///
/// `3000000` becomes `3.000.000,00` under `id_ID`.
pub fn format_grouped(amount: Decimal, locale: &Locale) -> String {
    let mut rounded = round_money(amount, 2);
    rounded.rescale(2);

    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut out = String::with_capacity(text.len() + text.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(locale.group_separator);
        }
        out.push(ch);
    }
    out.push(locale.decimal_separator);
    out.push_str(frac_part);
    out
}

/// Converts amounts between their stored, displayed and persisted forms
#[derive(Debug, Clone, Copy)]
pub struct MoneyFormatter {
    locale: Locale,
    persistence_scale: Decimal,
}

impl MoneyFormatter {
    /// `persistence_scale` must be positive; `Config` validates it on load.
    pub fn new(locale: Locale, persistence_scale: Decimal) -> Self {
        Self {
            locale,
            persistence_scale,
        }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Render an already display-scaled amount
    pub fn format(&self, display_value: Decimal) -> String {
        format_grouped(display_value, &self.locale)
    }

    /// Stored amount as editable display text
    pub fn to_display(&self, stored: Decimal) -> Result<String, PricingError> {
        let scaled = stored
            .checked_mul(DISPLAY_SCALE)
            .ok_or(PricingError::Overflow("display amount"))?;
        Ok(self.format(scaled))
    }

    /// Raw stored text (as it arrives from the record) as display text.
    ///
    /// Stored values use `.` as the decimal point; anything else that is
    /// not part of the number is dropped first. A `,` is therefore read as
    /// grouping, so `"1,500"` is 1500 rather than truncating at the comma.
    pub fn to_display_text(&self, raw: &str) -> Result<String, PricingError> {
        let cleaned = strip_formatting(raw).replace(',', "");
        if cleaned.is_empty() {
            return self.to_display(Decimal::ZERO);
        }
        let stored = cleaned
            .parse::<Decimal>()
            .map_err(|_| PricingError::InvalidNumericInput {
                field: "amount",
                value: raw.to_string(),
            })?;
        self.to_display(stored)
    }

    /// Read display text back into a display-scale decimal
    pub fn parse_display(&self, display: &str) -> Result<Decimal, PricingError> {
        let cleaned = strip_formatting(display);
        let normalized: String = cleaned
            .chars()
            .filter(|c| *c != self.locale.group_separator)
            .map(|c| if c == self.locale.decimal_separator { '.' } else { c })
            .collect();

        normalized
            .parse::<Decimal>()
            .map_err(|_| PricingError::InvalidNumericInput {
                field: "amount",
                value: display.to_string(),
            })
    }

    /// Display-scale amount as the value written to the record
    pub fn to_storage(&self, display_value: Decimal) -> Result<Decimal, PricingError> {
        display_value
            .checked_div(self.persistence_scale)
            .map(|stored| stored.normalize())
            .ok_or(PricingError::Overflow("stored amount"))
    }

    /// Read-only currency label for list views
    pub fn to_currency_label(&self, stored: Decimal, locale: &str) -> Result<String, PricingError> {
        let locale = Locale::parse(locale)?;
        let scaled = stored
            .checked_mul(DISPLAY_SCALE)
            .ok_or(PricingError::Overflow("currency label"))?;

        let number = format_grouped(scaled.abs(), &locale);
        let sign = if scaled.is_sign_negative() && !scaled.is_zero() {
            "-"
        } else {
            ""
        };
        Ok(format!("{}{}\u{a0}{}", sign, locale.currency_symbol, number))
    }

    /// Reject totals under the form's minimum
    pub fn ensure_minimum_total(&self, display_value: Decimal) -> Result<(), PricingError> {
        if display_value < MINIMUM_TOTAL_PRICE {
            return Err(PricingError::BelowMinimum {
                amount: display_value,
                minimum: MINIMUM_TOTAL_PRICE,
            });
        }
        Ok(())
    }
}

impl Default for MoneyFormatter {
    fn default() -> Self {
        Self::new(Locale::default(), DISPLAY_SCALE)
    }
}
