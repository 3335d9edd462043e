//! Reporting period resolution
//!
//! Turns a `PeriodSelector` into a concrete `ResolvedInterval`. Resolution is
//! a pure function of the selector, the account creation date and "today";
//! callers pass today explicitly so every window can be tested.
//!
//! | tag        | start                         | end                          |
//! |------------|-------------------------------|------------------------------|
//! | today      | today                         | today                        |
//! | week       | first day of the current week | six days later               |
//! | month      | 1st of this month             | last day of this month       |
//! | lastMonth  | 1st of previous month         | last day of previous month   |
//! | year       | Jan 1                         | Dec 31                       |
//! | lastYear   | Jan 1 of previous year        | Dec 31 of previous year      |
//! | all        | account creation, else floor  | custom end if set, else today|
//! | custom     | custom start                  | custom end                   |

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::config::settings::Settings;
use crate::error::{ReportError, ReportResult};
use crate::models::{PeriodKind, PeriodSelector, ResolvedInterval};

/// Start of the "all" period when the account creation date is unknown
pub const ALL_TIME_FLOOR: (i32, u32, u32) = (2000, 1, 1);

/// Resolves period selectors into date intervals
#[derive(Debug, Clone, Copy)]
pub struct PeriodResolver {
    /// First day of week (0 = Sunday, 1 = Monday)
    first_day_of_week: u8,
}

impl Default for PeriodResolver {
    fn default() -> Self {
        Self {
            first_day_of_week: 0,
        }
    }
}

impl PeriodResolver {
    /// Create a resolver using the user's week-start preference
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            first_day_of_week: settings.first_day_of_week % 7,
        }
    }

    /// Create a resolver with an explicit week start (0 = Sunday)
    pub fn with_week_start(first_day_of_week: u8) -> Self {
        Self {
            first_day_of_week: first_day_of_week % 7,
        }
    }

    /// Today's local calendar date
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Resolve a selector against `today`
    ///
    /// Returns `ReportError::IncompleteSelector` for a custom selector missing
    /// a bound; that is an expected state, not a failure to show the user.
    pub fn resolve(
        &self,
        selector: &PeriodSelector,
        account_created_at: Option<NaiveDate>,
        today: NaiveDate,
    ) -> ReportResult<ResolvedInterval> {
        let (start, end) = match selector.kind {
            PeriodKind::Today => (today, today),
            PeriodKind::Week => {
                let offset =
                    (today.weekday().num_days_from_sunday() + 7 - self.first_day_of_week as u32) % 7;
                let start = today - Duration::days(offset as i64);
                (start, start + Duration::days(6))
            }
            PeriodKind::Month => month_bounds(today.year(), today.month())?,
            PeriodKind::LastMonth => {
                let (year, month) = if today.month() == 1 {
                    (today.year() - 1, 12)
                } else {
                    (today.year(), today.month() - 1)
                };
                month_bounds(year, month)?
            }
            PeriodKind::Year => year_bounds(today.year())?,
            PeriodKind::LastYear => year_bounds(today.year() - 1)?,
            PeriodKind::All => {
                let floor = ymd(ALL_TIME_FLOOR.0, ALL_TIME_FLOOR.1, ALL_TIME_FLOOR.2)?;
                let start = account_created_at.unwrap_or(floor);
                let end = selector.custom_end.unwrap_or(today);
                (start, end)
            }
            PeriodKind::Custom => match (selector.custom_start, selector.custom_end) {
                (Some(start), Some(end)) => (start, end),
                _ => return Err(ReportError::IncompleteSelector),
            },
        };

        if start > end {
            return Err(ReportError::Validation(format!(
                "Period start {} is after its end {}",
                start, end
            )));
        }

        Ok(ResolvedInterval::new(start, end))
    }

    /// Header line describing the period, e.g. "This Month (2024-03-01 to 2024-03-31)"
    ///
    /// Custom and all-time periods render the explicit range instead of a name.
    pub fn describe(
        selector: &PeriodSelector,
        interval: &ResolvedInterval,
        date_format: &str,
    ) -> String {
        let start = interval.start.format(date_format);
        let end = interval.end.format(date_format);
        match selector.kind {
            PeriodKind::Custom => format!("{} to {}", start, end),
            PeriodKind::All => format!("All Time: {} to {}", start, end),
            kind => format!("{} ({} to {})", kind.display_name(), start, end),
        }
    }

    /// Token used in export file names
    ///
    /// The tag for named periods, `all-time` for all, `<start>_to_<end>` for custom.
    pub fn file_token(selector: &PeriodSelector, interval: &ResolvedInterval) -> String {
        match selector.kind {
            PeriodKind::All => "all-time".to_string(),
            PeriodKind::Custom => format!("{}_to_{}", interval.start_iso(), interval.end_iso()),
            kind => kind.tag().to_string(),
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> ReportResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ReportError::Validation(format!("Invalid date {:04}-{:02}-{:02}", year, month, day))
    })
}

fn month_bounds(year: i32, month: u32) -> ReportResult<(NaiveDate, NaiveDate)> {
    let start = ymd(year, month, 1)?;
    let next_month = if month == 12 {
        ymd(year + 1, 1, 1)?
    } else {
        ymd(year, month + 1, 1)?
    };
    Ok((start, next_month - Duration::days(1)))
}

fn year_bounds(year: i32) -> ReportResult<(NaiveDate, NaiveDate)> {
    Ok((ymd(year, 1, 1)?, ymd(year, 12, 31)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolve(kind: PeriodKind, today: NaiveDate) -> ResolvedInterval {
        PeriodResolver::default()
            .resolve(&PeriodSelector::named(kind), None, today)
            .unwrap()
    }

    #[test]
    fn test_today() {
        let today = date(2024, 3, 15);
        assert_eq!(resolve(PeriodKind::Today, today), ResolvedInterval::new(today, today));
    }

    #[test]
    fn test_week_starts_sunday_by_default() {
        // 2024-03-15 is a Friday
        let interval = resolve(PeriodKind::Week, date(2024, 3, 15));
        assert_eq!(interval, ResolvedInterval::new(date(2024, 3, 10), date(2024, 3, 16)));

        // A Sunday is the first day of its own week
        let interval = resolve(PeriodKind::Week, date(2024, 3, 10));
        assert_eq!(interval.start, date(2024, 3, 10));
    }

    #[test]
    fn test_week_with_monday_start() {
        let resolver = PeriodResolver::with_week_start(1);
        let interval = resolver
            .resolve(&PeriodSelector::named(PeriodKind::Week), None, date(2024, 3, 10))
            .unwrap();
        // Sunday belongs to the week that began the previous Monday
        assert_eq!(interval, ResolvedInterval::new(date(2024, 3, 4), date(2024, 3, 10)));
    }

    #[test]
    fn test_month() {
        let interval = resolve(PeriodKind::Month, date(2024, 2, 10));
        assert_eq!(interval, ResolvedInterval::new(date(2024, 2, 1), date(2024, 2, 29)));

        let interval = resolve(PeriodKind::Month, date(2024, 12, 31));
        assert_eq!(interval, ResolvedInterval::new(date(2024, 12, 1), date(2024, 12, 31)));
    }

    #[test]
    fn test_last_month_leap_year() {
        let interval = resolve(PeriodKind::LastMonth, date(2024, 3, 15));
        assert_eq!(interval, ResolvedInterval::new(date(2024, 2, 1), date(2024, 2, 29)));
    }

    #[test]
    fn test_last_month_non_leap_year() {
        let interval = resolve(PeriodKind::LastMonth, date(2023, 3, 31));
        assert_eq!(interval, ResolvedInterval::new(date(2023, 2, 1), date(2023, 2, 28)));
    }

    #[test]
    fn test_last_month_wraps_to_december() {
        let interval = resolve(PeriodKind::LastMonth, date(2024, 1, 5));
        assert_eq!(interval, ResolvedInterval::new(date(2023, 12, 1), date(2023, 12, 31)));
    }

    #[test]
    fn test_year_and_last_year() {
        let today = date(2024, 7, 4);
        assert_eq!(
            resolve(PeriodKind::Year, today),
            ResolvedInterval::new(date(2024, 1, 1), date(2024, 12, 31))
        );
        assert_eq!(
            resolve(PeriodKind::LastYear, today),
            ResolvedInterval::new(date(2023, 1, 1), date(2023, 12, 31))
        );
    }

    #[test]
    fn test_all_uses_account_creation() {
        let resolver = PeriodResolver::default();
        let today = date(2024, 3, 15);
        let interval = resolver
            .resolve(&PeriodSelector::named(PeriodKind::All), Some(date(2021, 6, 1)), today)
            .unwrap();
        assert_eq!(interval, ResolvedInterval::new(date(2021, 6, 1), today));
    }

    #[test]
    fn test_all_without_account_uses_floor() {
        let interval = resolve(PeriodKind::All, date(2024, 3, 15));
        assert_eq!(interval.start, date(2000, 1, 1));
        assert_eq!(interval.end, date(2024, 3, 15));
    }

    #[test]
    fn test_all_honours_custom_end_override() {
        let selector = PeriodSelector {
            kind: PeriodKind::All,
            custom_start: Some(date(2023, 5, 5)),
            custom_end: Some(date(2023, 12, 31)),
        };
        let interval = PeriodResolver::default()
            .resolve(&selector, Some(date(2022, 1, 1)), date(2024, 3, 15))
            .unwrap();
        // The custom start is ignored; only the end overrides
        assert_eq!(interval, ResolvedInterval::new(date(2022, 1, 1), date(2023, 12, 31)));
    }

    #[test]
    fn test_custom_passes_bounds_through() {
        let selector = PeriodSelector::custom(Some(date(2024, 1, 10)), Some(date(2024, 2, 20)));
        let interval = PeriodResolver::default()
            .resolve(&selector, None, date(2024, 3, 15))
            .unwrap();
        assert_eq!(interval, ResolvedInterval::new(date(2024, 1, 10), date(2024, 2, 20)));
    }

    #[test]
    fn test_custom_with_only_start_is_incomplete() {
        let selector = PeriodSelector::custom(Some(date(2024, 1, 10)), None);
        let err = PeriodResolver::default()
            .resolve(&selector, None, date(2024, 3, 15))
            .unwrap_err();
        assert!(err.is_incomplete_selector());
    }

    #[test]
    fn test_custom_with_only_end_is_incomplete() {
        let selector = PeriodSelector::custom(None, Some(date(2024, 1, 10)));
        let err = PeriodResolver::default()
            .resolve(&selector, None, date(2024, 3, 15))
            .unwrap_err();
        assert!(err.is_incomplete_selector());
    }

    #[test]
    fn test_reversed_custom_bounds_rejected() {
        let selector = PeriodSelector::custom(Some(date(2024, 2, 1)), Some(date(2024, 1, 1)));
        let err = PeriodResolver::default()
            .resolve(&selector, None, date(2024, 3, 15))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_describe() {
        let interval = ResolvedInterval::new(date(2024, 2, 1), date(2024, 2, 29));
        assert_eq!(
            PeriodResolver::describe(&PeriodSelector::named(PeriodKind::LastMonth), &interval, "%Y-%m-%d"),
            "Last Month (2024-02-01 to 2024-02-29)"
        );
        assert_eq!(
            PeriodResolver::describe(&PeriodSelector::custom(None, None), &interval, "%Y-%m-%d"),
            "2024-02-01 to 2024-02-29"
        );
        assert_eq!(
            PeriodResolver::describe(&PeriodSelector::named(PeriodKind::All), &interval, "%d/%m/%Y"),
            "All Time: 01/02/2024 to 29/02/2024"
        );
    }

    #[test]
    fn test_file_token() {
        let interval = ResolvedInterval::new(date(2024, 2, 1), date(2024, 2, 29));
        assert_eq!(
            PeriodResolver::file_token(&PeriodSelector::named(PeriodKind::LastMonth), &interval),
            "lastMonth"
        );
        assert_eq!(
            PeriodResolver::file_token(&PeriodSelector::named(PeriodKind::All), &interval),
            "all-time"
        );
        assert_eq!(
            PeriodResolver::file_token(&PeriodSelector::custom(None, None), &interval),
            "2024-02-01_to_2024-02-29"
        );
    }
}
