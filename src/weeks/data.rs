use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::dates::{is_future_day, next_week, previous_week, WeekWindow};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub weekday: String,
    pub future: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekView {
    pub week_start: NaiveDate,
    pub previous: NaiveDate,
    pub next: NaiveDate,
    pub today: NaiveDate,
    pub days: Vec<WeekDay>,
}

impl WeekView {
    pub fn new(window: &WeekWindow, today: NaiveDate) -> WeekView {
        WeekView {
            week_start: window.start,
            previous: previous_week(window.start),
            next: next_week(window.start),
            today,
            days: window
                .days()
                .map(|date| WeekDay {
                    date,
                    weekday: date.weekday().to_string(),
                    future: is_future_day(date, today),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_day;

    #[test]
    fn marks_days_after_today() {
        let today = parse_day("2024-03-13").unwrap();
        let window = WeekWindow::containing(today, &chrono_tz::Asia::Kolkata);

        let view = WeekView::new(&window, today);

        assert_eq!(view.week_start, parse_day("2024-03-11").unwrap());
        assert_eq!(view.previous, parse_day("2024-03-04").unwrap());
        assert_eq!(view.next, parse_day("2024-03-18").unwrap());
        let future: Vec<bool> = view.days.iter().map(|day| day.future).collect();
        assert_eq!(future, vec![false, false, false, true, true, true, true]);
        assert_eq!(view.days[0].weekday, "Mon");
        assert_eq!(view.days[6].weekday, "Sun");
    }
}
