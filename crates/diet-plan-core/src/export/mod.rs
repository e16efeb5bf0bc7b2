//! JSON and CSV export of a client record.

mod csv;
mod json;

pub use self::csv::*;
pub use self::json::*;

use chrono::{DateTime, Days, NaiveDate, SecondsFormat, Utc};

use crate::config::{PlanConfig, MAX_VALIDITY_DAYS};

/// Clock and settings for one export.
#[derive(Debug, Clone)]
pub struct ExportContext {
    /// Export timestamp
    pub exported_at: DateTime<Utc>,
    pub config: PlanConfig,
}

impl ExportContext {
    /// Context stamped with the current time.
    pub fn now(config: PlanConfig) -> Self {
        Self::at(Utc::now(), config)
    }

    /// Context stamped with a fixed time.
    pub fn at(exported_at: DateTime<Utc>, config: PlanConfig) -> Self {
        Self {
            exported_at,
            config,
        }
    }

    /// Export timestamp, ISO 8601 with milliseconds ("2025-03-05T10:00:00.000Z").
    pub fn export_timestamp(&self) -> String {
        self.exported_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn valid_from(&self) -> NaiveDate {
        self.exported_at.date_naive()
    }

    /// Last day of the plan. Validity is clamped to `0..=MAX_VALIDITY_DAYS`
    /// for configs built in code rather than loaded.
    pub fn valid_until(&self) -> NaiveDate {
        let days = self.config.validity_days.clamp(0, MAX_VALIDITY_DAYS) as u64;
        let from = self.valid_from();
        from.checked_add_days(Days::new(days)).unwrap_or(from)
    }
}

/// Format a date as `YYYY-MM-DD`.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Client identifier derived from the name: lowercased, whitespace runs
/// replaced by hyphens.
pub fn client_id(name: &str) -> String {
    if name.is_empty() {
        return "unnamed-client".to_string();
    }

    let mut id = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                id.push('-');
            }
            in_space = true;
        } else {
            id.extend(c.to_lowercase());
            in_space = false;
        }
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_client_id() {
        assert_eq!(client_id("Asha Rao"), "asha-rao");
        assert_eq!(client_id("Asha   Rao"), "asha-rao");
        assert_eq!(client_id("ASHA\tK  Rao"), "asha-k-rao");
        assert_eq!(client_id(""), "unnamed-client");
    }

    #[test]
    fn test_validity_window() {
        let at = Utc.with_ymd_and_hms(2025, 2, 10, 9, 30, 0).unwrap();
        let ctx = ExportContext::at(at, PlanConfig::default());

        assert_eq!(iso_date(ctx.valid_from()), "2025-02-10");
        assert_eq!(iso_date(ctx.valid_until()), "2025-03-10");
        assert_eq!(ctx.export_timestamp(), "2025-02-10T09:30:00.000Z");
    }

    #[test]
    fn test_validity_window_never_overflows() {
        let at = Utc.with_ymd_and_hms(2025, 2, 10, 9, 30, 0).unwrap();
        let config = PlanConfig {
            validity_days: i64::MAX,
            ..PlanConfig::default()
        };
        let ctx = ExportContext::at(at, config);
        assert_eq!(iso_date(ctx.valid_until()), "2035-02-08");

        let config = PlanConfig {
            validity_days: -5,
            ..PlanConfig::default()
        };
        let ctx = ExportContext::at(at, config);
        assert_eq!(ctx.valid_until(), ctx.valid_from());
    }
}
