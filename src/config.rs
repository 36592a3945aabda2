//! Configuration loaded from the environment

use anyhow::{bail, Context};
use rust_decimal::Decimal;

use crate::pricing::{Locale, MoneyFormatter, DISPLAY_SCALE};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub locale: Locale,
    /// Divisor applied when a displayed amount is written back
    pub persistence_scale: Decimal,
}

impl Config {
    /// Create a new [`Config`] from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(port) => port.parse().context("PORT must be a valid number")?,
            None => 8080,
        };
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(n) => n
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
            None => 5,
        };
        let locale = match lookup("BOOKING_LOCALE") {
            Some(code) => Locale::parse(&code)?,
            None => Locale::default(),
        };
        let persistence_scale = match lookup("PERSISTENCE_SCALE") {
            Some(scale) => scale
                .parse::<Decimal>()
                .context("PERSISTENCE_SCALE must be a decimal")?,
            None => DISPLAY_SCALE,
        };
        if persistence_scale <= Decimal::ZERO {
            bail!("PERSISTENCE_SCALE must be positive, got {}", persistence_scale);
        }

        Ok(Self {
            database_url,
            host,
            port,
            max_connections,
            locale,
            persistence_scale,
        })
    }

    pub fn money_formatter(&self) -> MoneyFormatter {
        MoneyFormatter::new(self.locale, self.persistence_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[("DATABASE_URL", "postgres://localhost/bookings")]).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.locale, Locale::ID_ID);
        assert_eq!(cfg.persistence_scale, dec!(1000));
    }

    #[test]
    fn test_missing_database_url() {
        assert!(config(&[]).is_err());
    }

    #[test]
    fn test_legacy_scale_and_locale() {
        let cfg = config(&[
            ("DATABASE_URL", "postgres://localhost/bookings"),
            ("PERSISTENCE_SCALE", "100000"),
            ("BOOKING_LOCALE", "en-US"),
        ])
        .unwrap();
        assert_eq!(cfg.persistence_scale, dec!(100000));
        assert_eq!(cfg.money_formatter().locale().code, "en_US");
    }

    #[test]
    fn test_rejects_bad_values() {
        let base = ("DATABASE_URL", "postgres://localhost/bookings");
        assert!(config(&[base, ("PERSISTENCE_SCALE", "0")]).is_err());
        assert!(config(&[base, ("PORT", "eighty")]).is_err());
        assert!(config(&[base, ("BOOKING_LOCALE", "xx_XX")]).is_err());
    }
}
