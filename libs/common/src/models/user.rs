//! User model and related functionality

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{
    repository::{Document, NewDocument},
    store::Collection,
};

/// User entity
///
/// `password_hash` is an Argon2 PHC string. It is stored with the document
/// but never leaves the services: API responses use [`UserSummary`].
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    #[serde(rename = "passwordHash")]
    pub password_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Document for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// New user creation payload, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

impl NewDocument<User> for NewUser {
    fn into_document(self, id: Uuid) -> User {
        User {
            id,
            username: self.username,
            password_hash: self.password_hash,
        }
    }
}

/// Public projection of a user: the username and nothing else
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
        }
    }
}
