use chrono::NaiveDate;
use serde::Serialize;

/// Body of `POST /users/`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /users/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /habits/` and `PUT /habits/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub frequency: String,
}

/// Body of `POST /habits/{id}/records`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordPayload {
    pub habit_id: i64,
    pub date: NaiveDate,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `POST /notifications/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewNotification {
    pub user_id: i64,
    pub title: String,
    pub message: String,
}
