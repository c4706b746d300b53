//! Calendar days in the configured timezone.
//!
//! A day such as `2024-03-11` is stored as the UTC instant of its local
//! midnight, so day boundaries never depend on where the caller is.
//! Weeks run Monday through Sunday.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::api_error::{ApiError, ApiResult};

pub const DAY_FORMAT: &str = "%Y-%m-%d";
pub const DAYS_PER_WEEK: i64 = 7;

pub fn parse_day(day: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(day, DAY_FORMAT).map_err(|_| ApiError::InvalidDateFormat)
}

pub fn local_midnight(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);

    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t.with_timezone(&Utc),
        // midnight skipped by a DST jump, use the offset in force just before it
        LocalResult::None => {
            let offset = tz.offset_from_utc_datetime(&midnight).fix();
            Utc.from_utc_datetime(&(midnight - Duration::seconds(offset.local_minus_utc() as i64)))
        }
    }
}

pub fn local_day(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

pub fn today(tz: &Tz) -> NaiveDate {
    local_day(Utc::now(), tz)
}

/// Monday of the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

pub fn previous_week(week_start: NaiveDate) -> NaiveDate {
    week_start - Duration::days(DAYS_PER_WEEK)
}

pub fn next_week(week_start: NaiveDate) -> NaiveDate {
    week_start + Duration::days(DAYS_PER_WEEK)
}

/// Compared by calendar date only.
pub fn is_future_day(day: NaiveDate, today: NaiveDate) -> bool {
    day > today
}

/// Seven local days starting on a Monday, with their storage bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl WeekWindow {
    pub fn containing(day: NaiveDate, tz: &Tz) -> WeekWindow {
        let start = week_start(day);

        WeekWindow {
            start,
            from: local_midnight(start, tz),
            until: local_midnight(next_week(start), tz),
        }
    }

    pub fn parse(day: &str, tz: &Tz) -> ApiResult<WeekWindow> {
        parse_day(day).map(|day| WeekWindow::containing(day, tz))
    }

    pub fn last_day(&self) -> NaiveDate {
        self.start + Duration::days(DAYS_PER_WEEK - 1)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..DAYS_PER_WEEK).map(move |offset| start + Duration::days(offset))
    }
}
