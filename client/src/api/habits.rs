use common::model::habit::Habit;
use common::requests::HabitPayload;

use crate::error::ClientResult;
use crate::http::{ApiClient, RequestBuilder};

#[derive(Clone)]
pub struct HabitApi {
    client: ApiClient,
}

impl HabitApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // The backend scopes habit listing and creation by `user_id`.
    fn scoped<'a>(&'a self, builder: RequestBuilder<'a>) -> RequestBuilder<'a> {
        match self.client.session().get_user_id() {
            Some(user_id) => builder.query("user_id", user_id),
            None => builder,
        }
    }

    pub async fn list(&self) -> ClientResult<Vec<Habit>> {
        self.scoped(self.client.get("/habits/")).send().await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Habit> {
        self.client.get(format!("/habits/{}", id)).send().await
    }

    pub async fn create(&self, habit: &HabitPayload) -> ClientResult<Habit> {
        self.scoped(self.client.post("/habits/"))
            .json(habit)?
            .send()
            .await
    }

    pub async fn update(&self, id: i64, habit: &HabitPayload) -> ClientResult<Habit> {
        self.client
            .put(format!("/habits/{}", id))
            .json(habit)?
            .send()
            .await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client.delete(format!("/habits/{}", id)).send().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::testing::fixture;
    use common::model::user::User;

    #[tokio::test]
    async fn list_is_scoped_to_the_signed_in_user() {
        let (transport, client) = fixture();
        client
            .session()
            .save_user(&User {
                id: 3,
                username: "ana".into(),
                email: "ana@example.com".into(),
                created_at: None,
            })
            .unwrap();
        transport.respond(200, r#"[{"id":1,"name":"Leer","user_id":3}]"#);

        let habits = HabitApi::new(client).list().await.unwrap();

        assert_eq!(habits[0].frequency, "daily");
        assert_eq!(transport.last_request().url, "http://localhost:8000/habits/?user_id=3");
    }

    #[tokio::test]
    async fn update_and_delete_address_the_habit() {
        let (transport, client) = fixture();
        transport.respond(200, r#"{"id":5,"name":"Correr","frequency":"weekly"}"#);
        transport.respond(204, "");
        let api = HabitApi::new(client);
        let payload = HabitPayload {
            name: "Correr".into(),
            description: None,
            frequency: "weekly".into(),
        };

        api.update(5, &payload).await.unwrap();
        api.delete(5).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::Put);
        assert_eq!(sent[0].url, "http://localhost:8000/habits/5");
        assert_eq!(sent[1].method, Method::Delete);
    }
}
