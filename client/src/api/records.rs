use common::model::record::HabitRecord;
use common::requests::RecordPayload;

use crate::error::ClientResult;
use crate::http::ApiClient;

/// Habit log entries under `/habits/{id}/records`.
#[derive(Clone)]
pub struct RecordApi {
    client: ApiClient,
}

impl RecordApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, habit_id: i64) -> ClientResult<Vec<HabitRecord>> {
        self.client
            .get(format!("/habits/{}/records", habit_id))
            .send()
            .await
    }

    pub async fn create(&self, habit_id: i64, record: &RecordPayload) -> ClientResult<HabitRecord> {
        self.client
            .post(format!("/habits/{}/records", habit_id))
            .json(record)?
            .send()
            .await
    }

    pub async fn delete(&self, habit_id: i64, record_id: i64) -> ClientResult<()> {
        self.client
            .delete(format!("/habits/{}/records/{}", habit_id, record_id))
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::RequestBody;
    use crate::testing::fixture;
    use chrono::NaiveDate;
    use serde_json::json;

    #[tokio::test]
    async fn create_posts_the_log_entry() {
        let (transport, client) = fixture();
        transport.respond(
            201,
            r#"{"id":8,"habit_id":2,"date":"2024-03-01","completed":true}"#,
        );
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let record = RecordApi::new(client)
            .create(
                2,
                &RecordPayload {
                    habit_id: 2,
                    date,
                    completed: true,
                    notes: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(record.date, date);
        let sent = transport.last_request();
        assert_eq!(sent.url, "http://localhost:8000/habits/2/records");
        assert_eq!(
            sent.body,
            RequestBody::Json(json!({"habit_id": 2, "date": "2024-03-01", "completed": true}))
        );
    }

    #[tokio::test]
    async fn delete_addresses_the_record() {
        let (transport, client) = fixture();
        transport.respond(204, "");
        RecordApi::new(client).delete(2, 8).await.unwrap();
        assert_eq!(transport.last_request().url, "http://localhost:8000/habits/2/records/8");
    }
}
