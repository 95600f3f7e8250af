//! Catalog models
//!
//! Raw documents hold references as ids. The `*View` types are what
//! clients receive after the resolver has followed those references.

pub mod movie;
pub mod person;
pub mod review;

pub use movie::{Movie, MovieView, NewMovie};
pub use person::{Actor, Director, NewPerson, Producer};
pub use review::{NewReview, Review, ReviewBody, ReviewView};
