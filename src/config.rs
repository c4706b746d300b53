use chrono_tz::Tz;
use serde::Deserialize;

/// Application settings read from `Rocket.toml` / `ROCKET_*` alongside Rocket's own.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file, or `:memory:`.
    pub database: String,
    /// Every calendar day is interpreted in this zone.
    pub timezone: Tz,
    /// Most completed records read when counting a streak.
    pub streak_lookback: u32,
    pub default_color: String,
}

impl Default for AppConfig {
    fn default() -> AppConfig {
        AppConfig {
            database: "habits.db".to_string(),
            timezone: chrono_tz::Asia::Kolkata,
            streak_lookback: 100,
            default_color: "#22c55e".to_string(),
        }
    }
}
