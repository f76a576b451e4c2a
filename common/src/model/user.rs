use serde::{Deserialize, Serialize};

/// Public profile of a registered user, as returned by `POST /users/` and
/// cached client-side under the `auth_user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body returned by `POST /users/login`.
///
/// Older backends answer with `access_token`, newer ones with `token`; both
/// are accepted. The user record is optional because not every deployment
/// echoes it back.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access_token")]
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}
