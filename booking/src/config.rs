//! Configuration management for the booking application.
//!
//! Loads configuration from environment variables with sensible defaults.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;

/// Seats in every stock show
const DEFAULT_SEATS_PER_SHOW: u32 = 78;

/// Primary screening date
const DEFAULT_SHOW_DATE: &str = "2024-12-01";

/// Alternate screening date
const DEFAULT_ALTERNATE_SHOW_DATE: &str = "2024-12-02";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Seats per show (`MARQUEE_SEATS_PER_SHOW`)
    pub seats_per_show: u32,
    /// Screening dates offered to customers, primary first
    /// (`MARQUEE_SHOW_DATE`, `MARQUEE_ALTERNATE_SHOW_DATE`)
    pub show_dates: Vec<NaiveDate>,
    /// Currency label printed before amounts (`MARQUEE_CURRENCY`)
    pub currency: String,
    /// Log filter used when `RUST_LOG` is unset (`MARQUEE_LOG`)
    pub log_level: String,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// Missing or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    #[must_use]
    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let seats_per_show = lookup("MARQUEE_SEATS_PER_SHOW")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seats_per_show);

        let date = |key: &str, fallback: &str| {
            lookup(key)
                .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
                .or_else(|| NaiveDate::parse_from_str(fallback, "%Y-%m-%d").ok())
        };
        let mut show_dates: Vec<NaiveDate> = [
            date("MARQUEE_SHOW_DATE", DEFAULT_SHOW_DATE),
            date("MARQUEE_ALTERNATE_SHOW_DATE", DEFAULT_ALTERNATE_SHOW_DATE),
        ]
        .into_iter()
        .flatten()
        .collect();
        show_dates.dedup();

        Self {
            seats_per_show,
            show_dates,
            currency: lookup("MARQUEE_CURRENCY").unwrap_or(defaults.currency),
            log_level: lookup("MARQUEE_LOG").unwrap_or(defaults.log_level),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seats_per_show: DEFAULT_SEATS_PER_SHOW,
            show_dates: [DEFAULT_SHOW_DATE, DEFAULT_ALTERNATE_SHOW_DATE]
                .iter()
                .filter_map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .collect(),
            currency: "Rs.".to_string(),
            log_level: "marquee=info".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = from_pairs(&[]);

        assert_eq!(config, Config::default());
        assert_eq!(config.seats_per_show, 78);
        assert_eq!(
            config.show_dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 2).unwrap(),
            ]
        );
        assert_eq!(config.currency, "Rs.");
    }

    #[test]
    fn overrides_are_read() {
        let config = from_pairs(&[
            ("MARQUEE_SEATS_PER_SHOW", "40"),
            ("MARQUEE_SHOW_DATE", "2025-01-10"),
            ("MARQUEE_CURRENCY", "INR"),
        ]);

        assert_eq!(config.seats_per_show, 40);
        assert_eq!(config.show_dates[0], NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(config.show_dates[1], NaiveDate::from_ymd_opt(2024, 12, 2).unwrap());
        assert_eq!(config.currency, "INR");
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = from_pairs(&[
            ("MARQUEE_SEATS_PER_SHOW", "lots"),
            ("MARQUEE_ALTERNATE_SHOW_DATE", "tomorrow"),
        ]);

        assert_eq!(config.seats_per_show, 78);
        assert_eq!(config.show_dates, Config::default().show_dates);
    }

    #[test]
    fn log_level_has_its_own_key() {
        // RUST_LOG is read by the subscriber directly; the fallback comes from MARQUEE_LOG
        let config = from_pairs(&[("RUST_LOG", "debug")]);
        assert_eq!(config.log_level, "marquee=info");

        let config = from_pairs(&[("RUST_LOG", "debug"), ("MARQUEE_LOG", "marquee=trace")]);
        assert_eq!(config.log_level, "marquee=trace");
    }

    #[test]
    fn identical_dates_collapse() {
        let config = from_pairs(&[
            ("MARQUEE_SHOW_DATE", "2024-12-05"),
            ("MARQUEE_ALTERNATE_SHOW_DATE", "2024-12-05"),
        ]);
        assert_eq!(config.show_dates.len(), 1);
    }
}
