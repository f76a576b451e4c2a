use common::model::user::{LoginResponse, User};
use common::requests::{LoginRequest, RegisterRequest};
use log::info;

use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn session(&self) -> &SessionStore {
        self.client.session()
    }

    /// `POST /users/`
    pub async fn register(&self, username: &str, email: &str, password: &str) -> ClientResult<User> {
        let body = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.client.post("/users/").json(&body)?.send().await
    }

    /// `POST /users/login`
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.client.post("/users/login").json(&body)?.send().await
    }

    /// Logs in and stores the returned token (and user, when present) in the
    /// session.
    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let response = self.login(email, password).await?;
        let session = self.session();
        session.save_token(&response.token)?;
        match &response.user {
            Some(user) => session.save_user(user)?,
            None => session.clear_user(),
        }
        info!("signed in as {}", email);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, RequestBody};
    use crate::testing::fixture;
    use serde_json::json;

    #[tokio::test]
    async fn register_posts_credentials() {
        let (transport, client) = fixture();
        transport.respond(201, r#"{"id":1,"username":"ana","email":"ana@example.com"}"#);

        let user = AuthApi::new(client)
            .register("ana", "ana@example.com", "secret123")
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        let sent = transport.last_request();
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.url, "http://localhost:8000/users/");
        assert_eq!(
            sent.body,
            RequestBody::Json(json!({
                "username": "ana", "email": "ana@example.com", "password": "secret123"
            }))
        );
    }

    #[tokio::test]
    async fn sign_in_persists_the_session() {
        let (transport, client) = fixture();
        transport.respond(
            200,
            r#"{"token":"tok","user":{"id":9,"username":"ana","email":"ana@example.com"}}"#,
        );
        let auth = AuthApi::new(client);

        auth.sign_in("ana@example.com", "secret123").await.unwrap();

        assert_eq!(transport.last_request().url, "http://localhost:8000/users/login");
        assert_eq!(auth.session().get_token().as_deref(), Some("tok"));
        assert_eq!(auth.session().get_user_id(), Some(9));
    }

    #[tokio::test]
    async fn failed_login_leaves_session_untouched() {
        let (transport, client) = fixture();
        transport.respond(401, r#"{"detail":"Invalid credentials"}"#);
        let auth = AuthApi::new(client);

        assert!(auth.sign_in("ana@example.com", "nope").await.is_err());
        assert!(!auth.session().is_authenticated());
    }
}
