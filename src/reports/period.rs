//! Reporting period resolution
//!
//! The club's financial year runs 1 July to 30 June and is named after the
//! calendar year it ends in.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Period key used when a request does not name one
pub const DEFAULT_PERIOD: &str = "ytd";

/// A resolved reporting window, inclusive at both ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub key: String,
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReportPeriod {
    /// Whether a transaction date (taken at midnight) falls in the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        let at = date.and_time(NaiveTime::MIN);
        at >= self.start && at <= self.end
    }

    /// Whether a transaction date is on or before the end of the window
    pub fn includes_up_to_end(&self, date: NaiveDate) -> bool {
        date.and_time(NaiveTime::MIN) <= self.end
    }

    /// `1 Jul 2023 - 30 Jun 2024`
    pub fn range_label(&self) -> String {
        format!("{} - {}", format_date(self.start), format_date(self.end))
    }

    /// `As at 30 Jun 2024`
    pub fn as_at_label(&self) -> String {
        format!("As at {}", format_date(self.end))
    }
}

/// Calendar year in which the financial year containing `now` ends
pub fn financial_year_end(now: NaiveDateTime) -> i32 {
    if now.month() >= 7 {
        now.year() + 1
    } else {
        now.year()
    }
}

/// Resolve a period key (`ytd`, `fy-1`, `fy-2`) against the current time
pub fn resolve_period(key: &str, now: NaiveDateTime) -> LedgerResult<ReportPeriod> {
    let current_fy_end = financial_year_end(now);

    match key {
        "ytd" => Ok(ReportPeriod {
            key: key.to_string(),
            label: "Current YTD".to_string(),
            start: year_start(current_fy_end - 1)?,
            end: now,
        }),
        "fy-1" | "fy-2" => {
            let offset = if key == "fy-2" { 2 } else { 1 };
            let end_year = current_fy_end - offset;
            let end = NaiveDate::from_ymd_opt(end_year, 6, 30)
                .and_then(|date| date.and_hms_opt(23, 59, 59))
                .ok_or_else(|| LedgerError::InvalidPeriod(key.to_string()))?;
            Ok(ReportPeriod {
                key: key.to_string(),
                label: format!("FY {}", end_year),
                start: year_start(end_year - 1)?,
                end,
            })
        }
        other => Err(LedgerError::InvalidPeriod(other.to_string())),
    }
}

fn year_start(year: i32) -> LedgerResult<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 7, 1)
        .map(|date| date.and_time(NaiveTime::MIN))
        .ok_or_else(|| LedgerError::InvalidPeriod(format!("year {} out of range", year)))
}

/// `2 Jan 2006` style
pub fn format_date(value: NaiveDateTime) -> String {
    value.format("%-d %b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_financial_year_end() {
        assert_eq!(financial_year_end(at(2025, 3, 15)), 2025);
        assert_eq!(financial_year_end(at(2025, 6, 30)), 2025);
        assert_eq!(financial_year_end(at(2025, 7, 1)), 2026);
    }

    #[test]
    fn test_previous_financial_year() {
        let period = resolve_period("fy-1", at(2025, 3, 15)).unwrap();

        assert_eq!(period.label, "FY 2024");
        assert_eq!(period.start, date(2023, 7, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(period.end, date(2024, 6, 30).and_hms_opt(23, 59, 59).unwrap());
        assert_eq!(period.range_label(), "1 Jul 2023 - 30 Jun 2024");
        assert_eq!(period.as_at_label(), "As at 30 Jun 2024");
    }

    #[test]
    fn test_two_years_back() {
        let period = resolve_period("fy-2", at(2025, 8, 1)).unwrap();
        assert_eq!(period.label, "FY 2024");
        assert_eq!(period.start.date(), date(2023, 7, 1));
    }

    #[test]
    fn test_year_to_date() {
        let now = at(2024, 9, 10);
        let period = resolve_period("ytd", now).unwrap();

        assert_eq!(period.label, "Current YTD");
        assert_eq!(period.start.date(), date(2024, 7, 1));
        assert_eq!(period.end, now);
        assert!(period.contains(date(2024, 9, 10)));
        assert!(!period.contains(date(2024, 9, 11)));
        assert!(!period.contains(date(2024, 6, 30)));
    }

    #[test]
    fn test_unknown_period() {
        let result = resolve_period("fy-3", at(2025, 1, 1));
        assert!(matches!(result, Err(LedgerError::InvalidPeriod(_))));
        assert!(resolve_period("", at(2025, 1, 1)).is_err());
    }
}
