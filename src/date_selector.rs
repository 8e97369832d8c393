/*!
Year/month/day selection of the archive date.

The selector owns the three select values and derives the ISO date and the
compact `YYYYMMDD` timestamp sent to the diff service. Any selection later
than yesterday is pulled back to yesterday.
*/

use chrono::{Datelike, Duration, Local, NaiveDate};
use thiserror::Error;
use tracing::debug;

/// Number of past years offered besides the current one.
pub const YEAR_RANGE: i32 = 10;

pub const FUTURE_DATE_WARNING: &str =
    "Today's or future dates cannot be used for comparison. Setting to yesterday's date.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Year {0} is not in the selectable range")]
    YearOutOfRange(i32),

    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    #[error("Invalid day {day} for {year}-{month:02}")]
    InvalidDay { year: i32, month: u32, day: u32 },

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    Unparseable(String),
}

/// Values derived after a selection change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateUpdate {
    /// `YYYY-MM-DD`
    pub iso_date: String,
    /// `YYYYMMDD`
    pub timestamp: String,
    /// Set when the selection was clamped to yesterday
    pub warning: Option<String>,
}

/// Returns the number of days in `month` of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

#[derive(Debug, Clone)]
pub struct DateSelector {
    today: NaiveDate,
    year: i32,
    month: u32,
    day: u32,
}

impl DateSelector {
    /// Creates a selector for the local clock's current date.
    pub fn new() -> Self {
        Self::with_today(Local::now().date_naive())
    }

    /// Creates a selector defaulting to the same day one year before `today`.
    pub fn with_today(today: NaiveDate) -> Self {
        let year = today.year() - 1;
        let month = today.month();
        let day = today.day().min(days_in_month(year, month));
        Self { today, year, month, day }
    }

    /// Latest selectable date.
    pub fn yesterday(&self) -> NaiveDate {
        self.today - Duration::days(1)
    }

    /// Year options, newest first.
    pub fn year_options(&self) -> Vec<i32> {
        let current = self.today.year();
        (current - YEAR_RANGE..=current).rev().collect()
    }

    /// Day options for the selected month, as zero padded select values.
    pub fn day_options(&self) -> Vec<String> {
        (1..=days_in_month(self.year, self.month))
            .map(|day| format!("{:02}", day))
            .collect()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn selected_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).unwrap_or_else(|| self.yesterday())
    }

    pub fn iso_date(&self) -> String {
        format!("{}-{:02}-{:02}", self.year, self.month, self.day)
    }

    pub fn timestamp(&self) -> String {
        format!("{}{:02}{:02}", self.year, self.month, self.day)
    }

    pub fn select_year(&mut self, year: i32) -> Result<DateUpdate, DateError> {
        if !self.year_options().contains(&year) {
            return Err(DateError::YearOutOfRange(year));
        }
        self.year = year;
        self.refresh_days();
        Ok(self.validate())
    }

    pub fn select_month(&mut self, month: u32) -> Result<DateUpdate, DateError> {
        if !(1..=12).contains(&month) {
            return Err(DateError::InvalidMonth(month));
        }
        self.month = month;
        self.refresh_days();
        Ok(self.validate())
    }

    pub fn select_day(&mut self, day: u32) -> Result<DateUpdate, DateError> {
        if day == 0 || day > days_in_month(self.year, self.month) {
            return Err(DateError::InvalidDay { year: self.year, month: self.month, day });
        }
        self.day = day;
        Ok(self.validate())
    }

    /// Selects a full `YYYY-MM-DD` date at once, with the same clamping as
    /// the individual selectors.
    pub fn select_iso(&mut self, date: &str) -> Result<DateUpdate, DateError> {
        let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| DateError::Unparseable(date.to_string()))?;
        if parsed.year() > self.today.year() {
            // Beyond the offered years, which only happens for future dates.
            return Ok(self.clamp_to_yesterday());
        }
        if !self.year_options().contains(&parsed.year()) {
            return Err(DateError::YearOutOfRange(parsed.year()));
        }
        self.year = parsed.year();
        self.month = parsed.month();
        self.day = parsed.day();
        Ok(self.validate())
    }

    /// Current values without re-validating.
    pub fn current(&self) -> DateUpdate {
        DateUpdate { iso_date: self.iso_date(), timestamp: self.timestamp(), warning: None }
    }

    /// Keeps the chosen day when the new month still has it, otherwise falls
    /// back to the first day.
    fn refresh_days(&mut self) {
        if self.day > days_in_month(self.year, self.month) {
            self.day = 1;
        }
    }

    fn validate(&mut self) -> DateUpdate {
        if self.selected_date() > self.yesterday() {
            return self.clamp_to_yesterday();
        }
        self.current()
    }

    fn clamp_to_yesterday(&mut self) -> DateUpdate {
        let yesterday = self.yesterday();
        debug!(selected = %self.iso_date(), clamped = %yesterday, "archive date clamped");
        self.year = yesterday.year();
        self.month = yesterday.month();
        self.day = yesterday.day();
        DateUpdate { warning: Some(FUTURE_DATE_WARNING.to_string()), ..self.current() }
    }
}

impl Default for DateSelector {
    fn default() -> Self {
        Self::new()
    }
}
