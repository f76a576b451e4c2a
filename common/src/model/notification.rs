use serde::{Deserialize, Serialize};

/// Kind of follow-up action a notification offers.
///
/// Kinds the client does not know about decode to `Unknown` so a single new
/// action type on the server does not break the whole notification list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationActionType {
    Download,
    Delete,
    #[serde(other)]
    Unknown,
}

/// Action descriptor attached to a notification. `payload` carries the
/// uploaded file name the action refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    #[serde(default)]
    pub id: Option<i64>,
    pub action_type: NotificationActionType,
    #[serde(default)]
    pub label: String,
    pub payload: String,
}

/// Server-issued, user-facing event record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationItem {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
    #[serde(default)]
    pub actions: Vec<NotificationAction>,
}

/// Body of `PUT /notifications/mark-all/read`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MarkAllReadResponse {
    #[serde(default)]
    pub updated: u64,
}

/// Body of `GET /notifications/unread/count`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UnreadCount {
    pub unread_count: u64,
}
