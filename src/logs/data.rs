use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::lenient_string;

use crate::habits::data::{Habit, HabitID};

pub type LogID = String;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HabitLog {
    pub id: LogID,
    pub habit_id: HabitID,
    pub date: DateTime<Utc>,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habit: Option<Habit>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLogRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub habit_id: Option<HabitID>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
}
