//! Request and response payloads for user accounts

use common::models::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Username and clear-text password, as sent to register or log in
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Public view of a registered user
#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}
