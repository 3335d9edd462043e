//! Reporting period representation
//!
//! A `PeriodSelector` is the symbolic choice ("this month", "last year",
//! "custom range"); a `ResolvedInterval` is the concrete inclusive date range
//! it stands for on a given day. Resolution lives in `services::period`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Symbolic period tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PeriodKind {
    Today,
    Week,
    #[default]
    Month,
    LastMonth,
    Year,
    LastYear,
    All,
    Custom,
}

impl PeriodKind {
    /// Every tag, in menu order
    pub const ALL: [PeriodKind; 8] = [
        Self::Today,
        Self::Week,
        Self::Month,
        Self::LastMonth,
        Self::Year,
        Self::LastYear,
        Self::All,
        Self::Custom,
    ];

    /// The wire tag, also used in export file names
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::LastMonth => "lastMonth",
            Self::Year => "year",
            Self::LastYear => "lastYear",
            Self::All => "all",
            Self::Custom => "custom",
        }
    }

    /// Human-friendly name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "This Week",
            Self::Month => "This Month",
            Self::LastMonth => "Last Month",
            Self::Year => "This Year",
            Self::LastYear => "Last Year",
            Self::All => "All Time",
            Self::Custom => "Custom Range",
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for PeriodKind {
    type Err = PeriodParseError;

    /// Accepts the wire tags plus kebab/snake spellings ("last-month")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "today" => Ok(Self::Today),
            "week" | "thisweek" => Ok(Self::Week),
            "month" | "thismonth" => Ok(Self::Month),
            "lastmonth" => Ok(Self::LastMonth),
            "year" | "thisyear" => Ok(Self::Year),
            "lastyear" => Ok(Self::LastYear),
            "all" | "alltime" => Ok(Self::All),
            "custom" => Ok(Self::Custom),
            _ => Err(PeriodParseError::UnknownPeriod(s.to_string())),
        }
    }
}

/// A period tag plus the optional custom bounds
///
/// Bounds are only meaningful for `Custom`, except that `All` honours a
/// custom end as an override of "today".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PeriodSelector {
    pub kind: PeriodKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_end: Option<NaiveDate>,
}

impl PeriodSelector {
    /// Selector for a named period with no bounds
    pub fn named(kind: PeriodKind) -> Self {
        Self {
            kind,
            custom_start: None,
            custom_end: None,
        }
    }

    /// Custom selector; either bound may still be missing
    pub fn custom(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            kind: PeriodKind::Custom,
            custom_start: start,
            custom_end: end,
        }
    }

    /// A selector is complete unless it is custom with a bound missing
    pub fn is_complete(&self) -> bool {
        match self.kind {
            PeriodKind::Custom => self.custom_start.is_some() && self.custom_end.is_some(),
            _ => true,
        }
    }
}

/// Concrete inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ResolvedInterval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Check if a date falls within this interval
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn start_iso(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_iso(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for ResolvedInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_iso(), self.end_iso())
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    UnknownPeriod(String),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::UnknownPeriod(s) => write!(f, "Unknown period: {}", s),
        }
    }
}

impl std::error::Error for PeriodParseError {}
