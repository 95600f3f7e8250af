//! User repository for account operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use common::{
    models::{NewUser, User},
    repository::Repository,
    store::Filter,
};
use tracing::info;

use crate::models::Credentials;

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    users: Repository<User>,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(users: Repository<User>) -> Self {
        Self { users }
    }

    /// Create a new user with a salted password hash
    ///
    /// A taken username fails with `StoreError::Conflict`.
    pub async fn create(&self, credentials: &Credentials) -> Result<User> {
        info!("Creating new user: {}", credentials.username);

        let password_hash = hash_password(&credentials.password)?;

        let user = self
            .users
            .create(NewUser {
                username: credentials.username.clone(),
                password_hash,
            })
            .await?;

        Ok(user)
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        info!("Finding user by username: {}", username);

        let users = self
            .users
            .find_where(&Filter::new().eq("username", username))
            .await?;

        // The store keeps usernames unique
        Ok(users.into_iter().next())
    }

    /// Verify a user's password
    pub fn verify_password(&self, user: &User, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

        Ok(result.is_ok())
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{error::StoreError, store::MemoryStore};
    use std::sync::Arc;

    fn repository() -> UserRepository {
        UserRepository::new(Repository::new(Arc::new(MemoryStore::new())))
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_password_is_stored_hashed() -> Result<()> {
        let users = repository();
        let user = users.create(&credentials("trinity", "follow-the-rabbit")).await?;

        assert_ne!(user.password_hash, "follow-the-rabbit");
        assert!(user.password_hash.starts_with("$argon2"));
        assert!(users.verify_password(&user, "follow-the-rabbit")?);
        assert!(!users.verify_password(&user, "wrong")?);
        Ok(())
    }

    #[tokio::test]
    async fn test_same_password_gets_distinct_salts() -> Result<()> {
        let users = repository();
        let first = users.create(&credentials("a", "same")).await?;
        let second = users.create(&credentials("b", "same")).await?;

        assert_ne!(first.password_hash, second.password_hash);
        Ok(())
    }

    #[tokio::test]
    async fn test_taken_username_is_a_conflict() -> Result<()> {
        let users = repository();
        users.create(&credentials("neo", "one")).await?;

        let err = users.create(&credentials("neo", "two")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Conflict { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_username() -> Result<()> {
        let users = repository();
        let created = users.create(&credentials("morpheus", "pill")).await?;

        let found = users.find_by_username("morpheus").await?;
        assert_eq!(found.map(|u| u.id), Some(created.id));
        assert!(users.find_by_username("smith").await?.is_none());
        Ok(())
    }
}
