use chrono::{Datelike, Days, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::Error;
use crate::models::CYCLE_START_RANGE;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// One billing cycle: a month-long window of whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct BillingCycle {
    pub(crate) start: NaiveDate,
    /// Last day of the cycle, inclusive.
    pub(crate) end: NaiveDate,
}

impl BillingCycle {
    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// 00:00:00.000 on the first day.
    pub(crate) fn starts_at(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// 23:59:59.999 on the last day.
    pub(crate) fn ends_at(&self) -> NaiveDateTime {
        (self.end + Days::new(1)).and_time(NaiveTime::MIN) - Duration::milliseconds(1)
    }

    pub(crate) fn key(&self) -> CycleKey {
        CycleKey(self.start)
    }
}

/// Resolve the billing cycle that `reference` falls in, for cycles starting
/// on `cycle_start_day` of each month.
///
/// If the reference day is on or after the start day, the cycle began this
/// month; otherwise it began on the start day of the previous month. The cycle
/// ends the day before the next one begins.
///
/// Start days outside 1..=28 are clamped into that range.
pub(crate) fn resolve_cycle(cycle_start_day: u32, reference: NaiveDate) -> BillingCycle {
    let start_day = cycle_start_day.clamp(*CYCLE_START_RANGE.start(), *CYCLE_START_RANGE.end());
    let day = reference.day();

    let first_of_month = reference - Days::new(u64::from(day - 1));
    let month = if day >= start_day {
        first_of_month
    } else {
        first_of_month - Months::new(1)
    };
    let start = month + Days::new(u64::from(start_day - 1));
    let end = start + Months::new(1) - Days::new(1);

    BillingCycle { start, end }
}

/// The cycle containing today's local date.
pub(crate) fn current_cycle(cycle_start_day: u32) -> BillingCycle {
    resolve_cycle(cycle_start_day, today())
}

/// The key of the cycle that `date` falls in.
pub(crate) fn cycle_key(cycle_start_day: u32, date: NaiveDate) -> CycleKey {
    resolve_cycle(cycle_start_day, date).key()
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Identifies a billing cycle by its first day.
///
/// Displays as the start month and two-digit year, e.g. `JAN 26`. Keys order
/// chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct CycleKey(NaiveDate);

impl CycleKey {
    pub(crate) fn start(&self) -> NaiveDate {
        self.0
    }

    pub(crate) fn cycle(&self) -> BillingCycle {
        resolve_cycle(self.start().day(), self.start())
    }

    /// Parse a label such as `JAN 26`, `jan 2026` or `2026-01` into the key of
    /// the cycle starting in that month.
    pub(crate) fn parse(label: &str, cycle_start_day: u32) -> Result<Self, Error> {
        let invalid = || Error::InvalidCycleKey(label.to_string());
        let (year, month) = parse_month_label(label.trim()).ok_or_else(invalid)?;
        let start_day = cycle_start_day.clamp(*CYCLE_START_RANGE.start(), *CYCLE_START_RANGE.end());
        let start = NaiveDate::from_ymd_opt(year, month, start_day).ok_or_else(invalid)?;
        Ok(Self(start))
    }
}

impl std::fmt::Display for CycleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let month = MONTHS[self.0.month0() as usize];
        write!(f, "{month} {:02}", self.0.year().rem_euclid(100))
    }
}

fn parse_month_label(label: &str) -> Option<(i32, u32)> {
    if let Some((year, month)) = label.split_once('-') {
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        return (1..=12).contains(&month).then_some((year, month));
    }

    let mut parts = label.split_whitespace();
    let (Some(month), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    let month = MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(month))
        .map(|i| i as u32 + 1)?;
    let year: i32 = year.trim_start_matches('\'').parse().ok()?;
    let year = if (0..100).contains(&year) { 2000 + year } else { year };
    Some((year, month))
}

#[cfg(test)]
#[path = "cycle_tests.rs"]
mod tests;
