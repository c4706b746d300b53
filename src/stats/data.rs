use chrono::NaiveDate;
use serde::Serialize;

use crate::habits::data::HabitID;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HabitStats {
    pub habit_id: HabitID,
    pub habit_name: String,
    pub count: u32,
    pub percent: u32,
    pub streak: u32,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct TotalStats {
    pub count: u32,
    pub possible: u32,
    pub percent: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub week_start: NaiveDate,
    pub per_habit: Vec<HabitStats>,
    pub total: TotalStats,
}
