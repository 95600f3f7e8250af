//! Common library for the movie catalog services
//!
//! This crate provides shared functionality used by the API and auth
//! services: database connectivity, the document store and its typed
//! repositories, session tokens, settings and logging setup.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use common::database::{DatabaseConfig, init_pool};
//! use common::models::User;
//! use common::repository::Repository;
//! use common::store::PostgresStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let store = PostgresStore::new(init_pool(&config).await?);
//!     store.ensure_collections().await?;
//!     let users: Repository<User> = Repository::new(Arc::new(store));
//!     println!("{} users", users.find_all().await?.len());
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod models;
pub mod repository;
pub mod settings;
pub mod store;
pub mod telemetry;
pub mod token;
