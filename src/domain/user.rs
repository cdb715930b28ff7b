use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A registered account. Only the bcrypt hash of the password is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    /// Older data files hold the plaintext under `password`; it is hashed
    /// the first time the users are loaded by the service.
    #[serde(alias = "password")]
    pub password_hash: String,
    pub role: String,
}

/// The public face of a [`User`].
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserView {
    pub username: String,
    pub role: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role.clone(),
        }
    }
}
