//! Shared document models

pub mod user;

pub use user::{NewUser, User, UserSummary};
