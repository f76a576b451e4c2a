//! Request plumbing shared by every API gateway client.
//!
//! [`ApiClient`] turns a method + path into a [`HttpRequest`], runs it through
//! the auth interceptor, hands it to the [`HttpTransport`] and decodes the
//! answer. Non-2xx answers become [`ClientError::Http`] carrying the backend's
//! error payload untouched.

use std::fmt;
use std::rc::Rc;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::ports::HttpTransport;
use crate::session::SessionStore;

pub const AUTHORIZATION: &str = "Authorization";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Multipart form with a single file field.
    File {
        field: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL including the encoded query string.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Percent-encodes one path segment.
pub fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Shared HTTP client: configuration, session and transport.
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    session: SessionStore,
    transport: Rc<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, session: SessionStore, transport: Rc<dyn HttpTransport>) -> Self {
        Self {
            config,
            session,
            transport,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn get(&self, path: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::Get, path.into())
    }

    pub fn post(&self, path: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::Post, path.into())
    }

    pub fn put(&self, path: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::Put, path.into())
    }

    pub fn delete(&self, path: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::Delete, path.into())
    }

    /// Auth interceptor: attaches the bearer token when a session exists and
    /// leaves the request alone otherwise.
    pub fn authorize(&self, mut request: HttpRequest) -> HttpRequest {
        if let Some(token) = self.session.get_token() {
            request
                .headers
                .push((AUTHORIZATION.to_string(), format!("Bearer {}", token)));
        }
        request
    }

    pub async fn execute<T: DeserializeOwned>(&self, request: HttpRequest) -> ClientResult<T> {
        let request = self.authorize(request);
        let method = request.method;
        let url = request.url.clone();
        debug!("{} {}", method, url);

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            warn!("{} {} answered {}", method, url, response.status);
            return Err(ClientError::Http {
                status: response.status,
                payload: serde_json::from_str(&response.body).ok(),
            });
        }

        // 204 and friends carry no body; decode them as JSON `null`.
        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| ClientError::Decode(format!("{} {}: {}", method, url, e)))
    }
}

pub struct RequestBuilder<'a> {
    client: &'a ApiClient,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
}

impl<'a> RequestBuilder<'a> {
    fn new(client: &'a ApiClient, method: Method, path: String) -> Self {
        Self {
            client,
            method,
            path,
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ClientResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| ClientError::Encode(e.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn file(mut self, field: &str, file_name: &str, bytes: Vec<u8>) -> Self {
        self.body = RequestBody::File {
            field: field.to_string(),
            file_name: file_name.to_string(),
            bytes,
        };
        self
    }

    pub fn build(self) -> HttpRequest {
        let mut url = self.client.config.endpoint(&self.path);
        if !self.query.is_empty() {
            let query: Vec<String> = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect();
            url.push('?');
            url.push_str(&query.join("&"));
        }
        HttpRequest {
            method: self.method,
            url,
            headers: Vec::new(),
            body: self.body,
        }
    }

    pub async fn send<T: DeserializeOwned>(self) -> ClientResult<T> {
        let client = self.client;
        client.execute(self.build()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture, RecordingTransport};
    use serde_json::json;

    #[tokio::test]
    async fn anonymous_requests_go_out_unmodified() {
        let (transport, client) = fixture();
        transport.respond(200, "[]");

        let _: Value = client.get("/habits/").send().await.unwrap();

        let sent = transport.last_request();
        assert_eq!(sent.url, "http://localhost:8000/habits/");
        assert!(sent.headers.is_empty());
    }

    #[tokio::test]
    async fn bearer_token_is_attached_when_logged_in() {
        let (transport, client) = fixture();
        client.session().save_token("secret").unwrap();
        transport.respond(200, "{}");

        let _: Value = client.get("/habits/").send().await.unwrap();

        assert_eq!(
            transport.last_request().header("authorization"),
            Some("Bearer secret")
        );
    }

    #[tokio::test]
    async fn error_payload_is_passed_through() {
        let (transport, client) = fixture();
        transport.respond(400, r#"{"error":"bad format"}"#);

        let err = client.get("/x").send::<Value>().await.unwrap_err();
        match err {
            ClientError::Http { status, payload } => {
                assert_eq!(status, 400);
                assert_eq!(payload, Some(json!({"error": "bad format"})));
            }
            other => unreachable!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_body_decodes_as_unit() {
        let (transport, client) = fixture();
        transport.respond(204, "");
        client.delete("/habits/1").send::<()>().await.unwrap();
    }

    #[tokio::test]
    async fn query_values_are_encoded() {
        let (transport, client) = fixture();
        transport.respond(200, "{}");

        let _: Value = client
            .get("/search")
            .query("q", "a b&c")
            .query("limit", 10)
            .send()
            .await
            .unwrap();

        assert_eq!(
            transport.last_request().url,
            "http://localhost:8000/search?q=a%20b%26c&limit=10"
        );
    }

    #[tokio::test]
    async fn transport_failures_surface_as_transport_errors() {
        let transport = Rc::new(RecordingTransport::new());
        transport.fail("connection refused");
        let client = crate::testing::client_with(transport.clone());

        let err = client.get("/x").send::<Value>().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
