//! Wall-clock helpers: epoch milliseconds and UTC calendar dates.
//!
//! Streaks are counted in UTC days, so a date is just a day number
//! since 1970-01-01 rendered as `YYYY-MM-DD`. Conversion uses the
//! proleptic Gregorian calendar (days-from-civil / civil-from-days).

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

const MILLIS_PER_DAY: u64 = 86_400_000;

/// Milliseconds since the Unix epoch. Zero if the clock is before 1970.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A calendar date (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CivilDate {
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return None;
        }
        Some(CivilDate { year, month, day })
    }

    pub fn from_epoch_millis(millis: u64) -> Self {
        Self::from_epoch_days((millis / MILLIS_PER_DAY) as i64)
    }

    pub fn from_epoch_days(days: i64) -> Self {
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
        let year = (yoe + era * 400 + i64::from(month <= 2)) as i32;
        CivilDate { year, month, day }
    }

    pub fn to_epoch_days(self) -> i64 {
        let y = i64::from(self.year) - i64::from(self.month <= 2);
        let era = y.div_euclid(400);
        let yoe = y.rem_euclid(400);
        let m = i64::from(self.month);
        let mp = if m > 2 { m - 3 } else { m + 9 };
        let doy = (153 * mp + 2) / 5 + i64::from(self.day) - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * 146_097 + doe - 719_468
    }

    /// The previous day.
    pub fn pred(self) -> Self {
        Self::from_epoch_days(self.to_epoch_days() - 1)
    }
}

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CivilDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(3, '-');
        let mut next = |what: &str| {
            parts
                .next()
                .ok_or_else(|| format!("missing {} in date: {}", what, s))
        };
        let year = next("year")?.parse::<i32>().map_err(|e| e.to_string())?;
        let month = next("month")?.parse::<u32>().map_err(|e| e.to_string())?;
        let day = next("day")?.parse::<u32>().map_err(|e| e.to_string())?;
        CivilDate::new(year, month, day).ok_or_else(|| format!("invalid date: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_day_zero_is_1970_01_01() {
        assert_eq!(CivilDate::from_epoch_days(0), CivilDate::new(1970, 1, 1).unwrap());
        assert_eq!(CivilDate::new(1970, 1, 1).unwrap().to_epoch_days(), 0);
    }

    #[test]
    fn known_date_converts_both_ways() {
        // 2024-02-29 is day 19782
        let leap = CivilDate::new(2024, 2, 29).unwrap();
        assert_eq!(leap.to_epoch_days(), 19_782);
        assert_eq!(CivilDate::from_epoch_days(19_782), leap);
    }

    #[test]
    fn pred_crosses_month_and_year_boundaries() {
        let new_year = CivilDate::new(2025, 1, 1).unwrap();
        assert_eq!(new_year.pred(), CivilDate::new(2024, 12, 31).unwrap());
        let march = CivilDate::new(2023, 3, 1).unwrap();
        assert_eq!(march.pred(), CivilDate::new(2023, 2, 28).unwrap());
    }

    #[test]
    fn millis_truncate_to_the_utc_day() {
        let date = CivilDate::from_epoch_millis(19_782 * MILLIS_PER_DAY + MILLIS_PER_DAY - 1);
        assert_eq!(date.to_string(), "2024-02-29");
    }

    #[test]
    fn display_and_parse_agree() {
        let date: CivilDate = "2026-10-18".parse().unwrap();
        assert_eq!(date.to_string(), "2026-10-18");
        assert!("2023-02-29".parse::<CivilDate>().is_err());
        assert!("yesterday".parse::<CivilDate>().is_err());
    }
}
