use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::lenient_string;

pub type HabitID = String;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitID,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Default)]
pub struct CreateHabitRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub color: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateHabitRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub color: Option<String>,
}
