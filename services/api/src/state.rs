//! Application state shared across handlers

use common::{
    models::User,
    repository::Repository,
    store::DocumentStore,
    token::TokenService,
};
use std::sync::Arc;

use crate::{
    models::{Actor, Director, Movie, Producer, Review},
    resolver::ReferenceResolver,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub movies: Repository<Movie>,
    pub actors: Repository<Actor>,
    pub directors: Repository<Director>,
    pub producers: Repository<Producer>,
    pub reviews: Repository<Review>,
    pub resolver: ReferenceResolver,
    pub tokens: TokenService,
}

impl AppState {
    /// Build every repository over one shared store
    pub fn new(store: Arc<dyn DocumentStore>, tokens: TokenService) -> Self {
        let actors: Repository<Actor> = Repository::new(Arc::clone(&store));
        let directors: Repository<Director> = Repository::new(Arc::clone(&store));
        let producers: Repository<Producer> = Repository::new(Arc::clone(&store));
        let users: Repository<User> = Repository::new(Arc::clone(&store));

        let resolver = ReferenceResolver::new(
            actors.clone(),
            directors.clone(),
            producers.clone(),
            users,
        );

        Self {
            movies: Repository::new(Arc::clone(&store)),
            actors,
            directors,
            producers,
            reviews: Repository::new(store),
            resolver,
            tokens,
        }
    }
}
