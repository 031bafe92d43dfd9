use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(MovieId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Director {
    pub firstname: String,
    pub lastname: String,
}

impl Director {
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self {
            firstname: firstname.into(),
            lastname: lastname.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub isbn: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<Director>,
}

/// Client-supplied part of a movie. The server owns `id`, so any `id` in a
/// request body is ignored and missing text fields decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDraft {
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<Director>,
}

impl MovieDraft {
    pub fn into_movie(self, id: MovieId) -> Movie {
        Movie {
            id,
            isbn: self.isbn,
            title: self.title,
            director: self.director,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn director_is_omitted_when_absent() {
        let movie = MovieDraft {
            isbn: "847532".into(),
            title: "Bee Movie".into(),
            director: None,
        }
        .into_movie(MovieId(3));
        let json = serde_json::to_value(&movie).expect("json");
        assert_eq!(
            json,
            serde_json::json!({ "id": 3, "isbn": "847532", "title": "Bee Movie" })
        );
    }

    #[test]
    fn draft_ignores_client_supplied_id() {
        let draft: MovieDraft = serde_json::from_str(
            r#"{"id":42,"isbn":"111","title":"New","director":{"firstname":"Ann","lastname":"Lee"}}"#,
        )
        .expect("draft");
        assert_eq!(draft.isbn, "111");
        assert_eq!(draft.director, Some(Director::new("Ann", "Lee")));
    }

    #[test]
    fn draft_fills_missing_fields_with_empty_strings() {
        let draft: MovieDraft = serde_json::from_str("{}").expect("draft");
        assert_eq!(draft, MovieDraft::default());
    }
}
