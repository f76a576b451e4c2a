use serde::{Deserialize, Serialize};

fn default_frequency() -> String {
    "daily".to_string()
}

fn default_active() -> bool {
    true
}

/// A habit owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_frequency")]
    pub frequency: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}
