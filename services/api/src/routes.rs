//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use common::{
    repository::{Document, NewDocument, Repository},
    store::Filter,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::{Session, require_session},
    models::{
        Actor, Director, Movie, MovieView, NewMovie, NewPerson, NewReview, Producer, Review,
        ReviewBody, ReviewView,
    },
};

const MOVIE_NOT_FOUND: &str = "Movie or TV show not found";

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/movies", get(get_movies).post(create_movie))
        .route("/api/movies/:id", get(get_movie))
        .route(
            "/api/movies/:id/reviews",
            get(get_movie_reviews).post(create_movie_review),
        )
        .route(
            "/api/actors",
            get(get_people::<Actor>).post(create_person::<Actor>),
        )
        .route(
            "/api/directors",
            get(get_people::<Director>).post(create_person::<Director>),
        )
        .route(
            "/api/producers",
            get(get_people::<Producer>).post(create_person::<Producer>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// Get all movies with cast and crew resolved
pub async fn get_movies(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<Vec<MovieView>>> {
    info!("User {} listing movies", session.user_id);

    let movies = state.movies.find_all().await?;
    let views = state.resolver.movies(movies).await?;

    Ok(Json(views))
}

/// Get a movie by ID with cast and crew resolved
pub async fn get_movie(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> ApiResult<Json<MovieView>> {
    info!("User {} fetching movie {}", session.user_id, id);

    let movie = find_movie(&state, &id)
        .await?
        .ok_or(ApiError::NotFound(MOVIE_NOT_FOUND))?;

    Ok(Json(state.resolver.movie(movie).await?))
}

/// Create a movie; references are stored and returned as raw ids
pub async fn create_movie(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<NewMovie>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Movie>)> {
    let Json(new_movie) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let movie = state.movies.create(new_movie).await?;
    info!("User {} created movie {}", session.user_id, movie.id);

    Ok((StatusCode::CREATED, Json(movie)))
}

/// Get all reviews of a movie, authors reduced to their username
pub async fn get_movie_reviews(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<ReviewView>>> {
    info!("User {} listing reviews of movie {}", session.user_id, id);

    // An id that cannot exist has no reviews
    let Some(movie_id) = parse_id(&id) else {
        return Ok(Json(Vec::new()));
    };

    let reviews = state
        .reviews
        .find_where(&Filter::new().eq("movie", movie_id.to_string()))
        .await?;

    Ok(Json(state.resolver.reviews(reviews).await?))
}

/// Review a movie as the session user
pub async fn create_movie_review(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    payload: Result<Json<ReviewBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    let Json(body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let movie = find_movie(&state, &id)
        .await?
        .ok_or(ApiError::NotFound(MOVIE_NOT_FOUND))?;

    let review = state
        .reviews
        .create(NewReview {
            movie: movie.id,
            user: session.user_id,
            body,
        })
        .await?;
    info!("User {} reviewed movie {}", session.user_id, movie.id);

    Ok((StatusCode::CREATED, Json(review)))
}

/// Actors, directors and producers
pub trait PersonKind: Document + 'static {
    /// Repository holding this kind
    fn repository(state: &AppState) -> &Repository<Self>;
}

impl PersonKind for Actor {
    fn repository(state: &AppState) -> &Repository<Self> {
        &state.actors
    }
}

impl PersonKind for Director {
    fn repository(state: &AppState) -> &Repository<Self> {
        &state.directors
    }
}

impl PersonKind for Producer {
    fn repository(state: &AppState) -> &Repository<Self> {
        &state.producers
    }
}

/// Get every person of one kind
pub async fn get_people<P: PersonKind>(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<Vec<P>>> {
    info!("User {} listing {}", session.user_id, P::COLLECTION);

    Ok(Json(P::repository(&state).find_all().await?))
}

/// Create a person of one kind
pub async fn create_person<P>(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<NewPerson>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<P>)>
where
    P: PersonKind,
    NewPerson: NewDocument<P>,
{
    let Json(new_person) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let person = P::repository(&state).create(new_person).await?;
    info!(
        "User {} added {} to {}",
        session.user_id,
        person.id(),
        P::COLLECTION
    );

    Ok((StatusCode::CREATED, Json(person)))
}

fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

async fn find_movie(state: &AppState, raw_id: &str) -> ApiResult<Option<Movie>> {
    match parse_id(raw_id) {
        Some(id) => Ok(state.movies.find_by_id(id).await?),
        None => Ok(None),
    }
}
