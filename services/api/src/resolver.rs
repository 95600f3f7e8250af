//! Reference resolution
//!
//! Turns raw documents into their client views by fetching what their
//! reference ids point to. Lookups are batched per collection; a reference
//! to a missing document resolves to nothing instead of failing the read.

use common::{
    error::StoreResult,
    models::{User, UserSummary},
    repository::{Document, Repository},
};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::models::{Actor, Director, Movie, MovieView, Producer, Review, ReviewView};

/// Follows movie and review references
#[derive(Clone)]
pub struct ReferenceResolver {
    actors: Repository<Actor>,
    directors: Repository<Director>,
    producers: Repository<Producer>,
    users: Repository<User>,
}

impl ReferenceResolver {
    /// Create a new resolver over the referenced repositories
    pub fn new(
        actors: Repository<Actor>,
        directors: Repository<Director>,
        producers: Repository<Producer>,
        users: Repository<User>,
    ) -> Self {
        Self {
            actors,
            directors,
            producers,
            users,
        }
    }

    /// Resolve a single movie
    pub async fn movie(&self, movie: Movie) -> StoreResult<MovieView> {
        let crew = self.crew(std::slice::from_ref(&movie)).await?;
        Ok(crew.view(movie))
    }

    /// Resolve a list of movies, keeping their order
    pub async fn movies(&self, movies: Vec<Movie>) -> StoreResult<Vec<MovieView>> {
        let crew = self.crew(&movies).await?;
        Ok(movies.into_iter().map(|movie| crew.view(movie)).collect())
    }

    /// Resolve reviews, projecting each author to its username
    pub async fn reviews(&self, reviews: Vec<Review>) -> StoreResult<Vec<ReviewView>> {
        let users = lookup(&self.users, reviews.iter().map(|r| r.user)).await?;

        Ok(reviews
            .into_iter()
            .map(|review| ReviewView {
                user: users.get(&review.user).map(UserSummary::from),
                rating: review.rating,
                content: review.content,
            })
            .collect())
    }

    async fn crew(&self, movies: &[Movie]) -> StoreResult<Crew> {
        Ok(Crew {
            actors: lookup(
                &self.actors,
                movies.iter().flat_map(|m| m.actors.iter().copied()),
            )
            .await?,
            directors: lookup(&self.directors, movies.iter().filter_map(|m| m.director)).await?,
            producers: lookup(&self.producers, movies.iter().filter_map(|m| m.producer)).await?,
        })
    }
}

/// Everyone referenced by a batch of movies
struct Crew {
    actors: HashMap<Uuid, Actor>,
    directors: HashMap<Uuid, Director>,
    producers: HashMap<Uuid, Producer>,
}

impl Crew {
    fn view(&self, movie: Movie) -> MovieView {
        MovieView {
            id: movie.id,
            title: movie.title,
            runtime: movie.runtime,
            actors: movie
                .actors
                .iter()
                .filter_map(|id| self.actors.get(id).cloned())
                .collect(),
            director: movie.director.and_then(|id| self.directors.get(&id).cloned()),
            producer: movie.producer.and_then(|id| self.producers.get(&id).cloned()),
            release_date: movie.release_date,
            poster_image: movie.poster_image,
        }
    }
}

/// Fetch the distinct `ids` from `repository`, indexed by id
async fn lookup<T: Document>(
    repository: &Repository<T>,
    ids: impl Iterator<Item = Uuid>,
) -> StoreResult<HashMap<Uuid, T>> {
    let ids: Vec<Uuid> = ids.collect::<HashSet<_>>().into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(repository
        .find_many(&ids)
        .await?
        .into_iter()
        .map(|doc| (doc.id(), doc))
        .collect())
}
