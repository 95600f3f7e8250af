//! Cast and crew models
//!
//! Actors, directors and producers are stored in separate collections but
//! share one shape: an id and a name.

use common::{
    repository::{Document, NewDocument},
    store::Collection,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Creation payload shared by every person kind
#[derive(Debug, Clone, Deserialize)]
pub struct NewPerson {
    pub name: Option<String>,
}

macro_rules! person {
    ($(#[$meta:meta])* $name:ident, $collection:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(rename = "_id")]
            pub id: Uuid,
            pub name: Option<String>,
        }

        impl Document for $name {
            const COLLECTION: Collection = $collection;

            fn id(&self) -> Uuid {
                self.id
            }
        }

        impl NewDocument<$name> for NewPerson {
            fn into_document(self, id: Uuid) -> $name {
                $name {
                    id,
                    name: self.name,
                }
            }
        }
    };
}

person!(
    /// Actor entity
    Actor,
    Collection::Actors
);
person!(
    /// Director entity
    Director,
    Collection::Directors
);
person!(
    /// Producer entity
    Producer,
    Collection::Producers
);
