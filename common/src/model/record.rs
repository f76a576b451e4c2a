use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One entry of a habit log: whether the habit was completed on `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub id: i64,
    pub habit_id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}
