//! ISO-week calendar arithmetic.
//!
//! Every week-scoped document and instance id is keyed by a [`WeekId`]
//! (`YYYY-Www`). Weeks start on Monday and week 1 is the week holding the
//! year's first Thursday, so a week near New Year can belong to the
//! neighbouring ISO year. All arithmetic goes through the week's Monday to
//! stay off those boundaries.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use jiff::ToSpan;
use jiff::civil::{Date, ISOWeekDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::dream::Milestone;

/// Average number of weeks in a calendar month.
pub const WEEKS_PER_MONTH: f64 = 4.345;

const HOURS_PER_WEEK: i64 = 7 * 24;

/// Success flag per ISO week, used for streak counting.
pub type WeekLog = BTreeMap<WeekId, bool>;

/// An ISO week, printed and parsed as `YYYY-Www` (e.g. `2025-W47`).
///
/// Internally the week is stored as its Monday, which makes ordering and
/// distance calculations plain date arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekId {
    monday: Date,
}

impl WeekId {
    /// Build a week id, rejecting weeks that do not exist in `year`
    /// (e.g. week 53 of a 52-week year).
    pub fn new(year: i16, week: i8) -> Result<Self, CoreError> {
        let iso = ISOWeekDate::new(year, week, Weekday::Monday)
            .map_err(|_| CoreError::InvalidWeekId(format!("{year:04}-W{week:02}")))?;
        Ok(Self { monday: iso.date() })
    }

    /// The ISO week containing `date`.
    pub fn of(date: Date) -> Self {
        let offset = i64::from(date.weekday().to_monday_zero_offset());
        let monday = date.checked_sub(offset.days()).unwrap_or(date);
        Self { monday }
    }

    pub fn year(self) -> i16 {
        self.monday.iso_week_date().year()
    }

    pub fn week(self) -> i8 {
        self.monday.iso_week_date().week()
    }

    pub fn monday(self) -> Date {
        self.monday
    }

    /// The week `weeks` weeks after this one (negative goes back).
    pub fn offset(self, weeks: i32) -> Result<Self, CoreError> {
        let monday = self.monday.checked_add(i64::from(weeks).weeks())?;
        Ok(Self { monday })
    }

    pub fn next(self) -> Result<Self, CoreError> {
        self.offset(1)
    }

    pub fn prev(self) -> Result<Self, CoreError> {
        self.offset(-1)
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year(), self.week())
    }
}

impl FromStr for WeekId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidWeekId(s.to_string());
        let (year, week) = s.split_once("-W").ok_or_else(invalid)?;
        if year.len() != 4 || week.len() != 2 {
            return Err(invalid());
        }
        let year: i16 = year.parse().map_err(|_| invalid())?;
        let week: i8 = week.parse().map_err(|_| invalid())?;
        Self::new(year, week)
    }
}

impl TryFrom<String> for WeekId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekId> for String {
    fn from(value: WeekId) -> Self {
        value.to_string()
    }
}

/// Today's date in the system time zone.
pub fn today() -> Date {
    jiff::Zoned::now().date()
}

/// The ISO week containing today.
pub fn current_iso_week() -> WeekId {
    WeekId::of(today())
}

/// Signed number of weeks from `from` to `to`.
pub fn weeks_between(from: WeekId, to: WeekId) -> i32 {
    let hours = to.monday.duration_since(from.monday).as_hours();
    (hours / HOURS_PER_WEEK) as i32
}

/// Whole ISO weeks from `from_week` until the week containing `date`.
///
/// Zero when `date` falls inside `from_week`, negative once it has passed.
pub fn weeks_until(date: Date, from_week: WeekId) -> i32 {
    weeks_between(from_week, WeekId::of(date))
}

pub fn months_to_weeks(months: u32) -> u32 {
    (f64::from(months) * WEEKS_PER_MONTH).round() as u32
}

pub fn is_milestone_complete(milestone: &Milestone, dream_progress: u8) -> bool {
    if milestone.completed {
        return true;
    }
    milestone
        .progress_threshold
        .is_some_and(|threshold| dream_progress >= threshold)
}

/// Consecutive successful weeks ending at `current`.
///
/// The current week only breaks the streak once it is over, so an
/// unfinished current week is skipped rather than counted as a miss.
/// Weeks before the week of `start_date` never count.
pub fn compute_streak(log: &WeekLog, start_date: Date, current: WeekId) -> u32 {
    let first = WeekId::of(start_date);
    let succeeded = |week: WeekId| log.get(&week).copied().unwrap_or(false);

    let mut week = current;
    if !succeeded(week) {
        week = match week.prev() {
            Ok(prev) => prev,
            Err(_) => return 0,
        };
    }

    let mut streak = 0;
    while week >= first && succeeded(week) {
        streak += 1;
        week = match week.prev() {
            Ok(prev) => prev,
            Err(_) => break,
        };
    }
    streak
}
