//! Movie models

use chrono::NaiveDate;
use common::{
    repository::{Document, NewDocument},
    store::Collection,
};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use uuid::Uuid;

use super::person::{Actor, Director, Producer};

/// Stored movie, references kept as ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: Option<String>,
    /// Runtime in minutes, kept as sent
    pub runtime: Option<Number>,
    #[serde(default)]
    pub actors: Vec<Uuid>,
    pub director: Option<Uuid>,
    pub producer: Option<Uuid>,
    #[serde(rename = "releaseDate", default, with = "calendar_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(rename = "posterImage")]
    pub poster_image: Option<String>,
}

impl Document for Movie {
    const COLLECTION: Collection = Collection::Movies;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Movie creation payload
///
/// Every field may be omitted; the movie is stored with whatever was sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMovie {
    pub title: Option<String>,
    pub runtime: Option<Number>,
    pub actors: Option<Vec<Uuid>>,
    pub director: Option<Uuid>,
    pub producer: Option<Uuid>,
    #[serde(rename = "releaseDate", default, with = "calendar_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(rename = "posterImage")]
    pub poster_image: Option<String>,
}

impl NewDocument<Movie> for NewMovie {
    fn into_document(self, id: Uuid) -> Movie {
        Movie {
            id,
            title: self.title,
            runtime: self.runtime,
            actors: self.actors.unwrap_or_default(),
            director: self.director,
            producer: self.producer,
            release_date: self.release_date,
            poster_image: self.poster_image,
        }
    }
}

/// Movie with its cast and crew inlined
#[derive(Debug, Clone, Serialize)]
pub struct MovieView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: Option<String>,
    pub runtime: Option<Number>,
    pub actors: Vec<Actor>,
    pub director: Option<Director>,
    pub producer: Option<Producer>,
    #[serde(rename = "releaseDate", with = "calendar_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(rename = "posterImage")]
    pub poster_image: Option<String>,
}

/// `YYYY-MM-DD` dates that also accept full RFC 3339 timestamps on input
pub mod calendar_date {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse(&raw).map_err(de::Error::custom))
            .transpose()
    }

    /// Parse a calendar date, keeping only the UTC date of a timestamp
    pub fn parse(raw: &str) -> Result<NaiveDate, String> {
        NaiveDate::parse_from_str(raw, FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc).date_naive()))
            .map_err(|_| format!("invalid calendar date: {}", raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_movie_accepts_partial_body() {
        let new: NewMovie = serde_json::from_value(json!({"title": "Heat"})).unwrap();
        let movie = new.into_document(Uuid::new_v4());

        assert_eq!(movie.title.as_deref(), Some("Heat"));
        assert!(movie.actors.is_empty());
        assert_eq!(movie.director, None);
        assert_eq!(movie.release_date, None);
    }

    #[test]
    fn test_movie_wire_names() {
        let actor = Uuid::new_v4();
        let new: NewMovie = serde_json::from_value(json!({
            "title": "Heat",
            "runtime": 170,
            "actors": [actor],
            "releaseDate": "1995-12-15",
            "posterImage": "https://img/heat.jpg"
        }))
        .unwrap();
        let movie = new.into_document(Uuid::new_v4());

        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["_id"], json!(movie.id));
        assert_eq!(value["actors"], json!([actor]));
        assert_eq!(value["releaseDate"], json!("1995-12-15"));
        assert_eq!(value["posterImage"], json!("https://img/heat.jpg"));
        assert_eq!(value["director"], json!(null));
    }

    #[test]
    fn test_runtime_is_stored_as_sent() {
        for runtime in [json!(90.5), json!(-3), json!(170)] {
            let new: NewMovie = serde_json::from_value(json!({"runtime": runtime})).unwrap();
            let movie = new.into_document(Uuid::new_v4());
            assert_eq!(serde_json::to_value(&movie).unwrap()["runtime"], runtime);
        }
    }

    #[test]
    fn test_release_date_accepts_timestamps() {
        assert_eq!(
            calendar_date::parse("1995-12-15T00:00:00.000Z"),
            Ok(NaiveDate::from_ymd_opt(1995, 12, 15).unwrap())
        );
        assert_eq!(
            calendar_date::parse("1995-12-15"),
            Ok(NaiveDate::from_ymd_opt(1995, 12, 15).unwrap())
        );
        assert!(calendar_date::parse("15/12/1995").is_err());
    }

    #[test]
    fn test_null_release_date_is_none() {
        let new: NewMovie = serde_json::from_value(json!({"releaseDate": null})).unwrap();
        assert_eq!(new.release_date, None);
    }
}
