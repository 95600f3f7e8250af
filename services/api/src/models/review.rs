//! Review models

use common::{
    models::UserSummary,
    repository::{Document, NewDocument},
    store::Collection,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored review, references kept as ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub movie: Uuid,
    pub user: Uuid,
    pub rating: Option<f64>,
    pub content: Option<String>,
}

impl Document for Review {
    const COLLECTION: Collection = Collection::Reviews;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Review body as sent by clients
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewBody {
    pub rating: Option<f64>,
    pub content: Option<String>,
}

/// Review creation payload, author and movie already known
#[derive(Debug, Clone)]
pub struct NewReview {
    pub movie: Uuid,
    pub user: Uuid,
    pub body: ReviewBody,
}

impl NewDocument<Review> for NewReview {
    fn into_document(self, id: Uuid) -> Review {
        Review {
            id,
            movie: self.movie,
            user: self.user,
            rating: self.body.rating,
            content: self.body.content,
        }
    }
}

/// Review as listed under a movie
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewView {
    pub user: Option<UserSummary>,
    pub rating: Option<f64>,
    pub content: Option<String>,
}
