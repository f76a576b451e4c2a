use common::model::notification::{MarkAllReadResponse, NotificationItem, UnreadCount};
use common::requests::NewNotification;

use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Clone)]
pub struct NotificationApi {
    client: ApiClient,
}

impl NotificationApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, user_id: i64, include_read: bool) -> ClientResult<Vec<NotificationItem>> {
        self.client
            .get("/notifications/")
            .query("user_id", user_id)
            .query("include_read", include_read)
            .send()
            .await
    }

    pub async fn unread_count(&self, user_id: i64) -> ClientResult<u64> {
        let count: UnreadCount = self
            .client
            .get("/notifications/unread/count")
            .query("user_id", user_id)
            .send()
            .await?;
        Ok(count.unread_count)
    }

    pub async fn mark_as_read(&self, id: i64) -> ClientResult<NotificationItem> {
        self.client
            .put(format!("/notifications/{}/read", id))
            .json(&serde_json::json!({}))?
            .send()
            .await
    }

    pub async fn mark_all_as_read(&self, user_id: i64) -> ClientResult<MarkAllReadResponse> {
        self.client
            .put("/notifications/mark-all/read")
            .query("user_id", user_id)
            .json(&serde_json::json!({}))?
            .send()
            .await
    }

    pub async fn create(&self, notification: &NewNotification) -> ClientResult<NotificationItem> {
        self.client
            .post("/notifications/")
            .json(notification)?
            .send()
            .await
    }
}
