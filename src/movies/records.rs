//! Result shaping. Stored documents are loosely typed, so shaping never fails: a missing field or
//! a value of an unexpected type comes out as `None` (or an empty list).

use bson::{Bson, Document as BsonDocument};
use serde::{Deserialize, Serialize};

use super::criteria::{FIELD_CAST, FIELD_GENRES, FIELD_PLOT, FIELD_TITLE, FIELD_YEAR};

/// A search hit as returned by `find_movies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub genres: Vec<String>,
    pub cast: Vec<String>,
    pub rating: Option<f64>,
    pub plot: Option<String>,
}

/// A ranking entry as returned by `get_top_movies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopMovie {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub genres: Vec<String>,
}

impl From<&BsonDocument> for MovieRecord {
    fn from(doc: &BsonDocument) -> Self {
        Self {
            title: text(doc.get(FIELD_TITLE)),
            year: integer(doc.get(FIELD_YEAR)),
            genres: strings(doc.get(FIELD_GENRES)),
            cast: strings(doc.get(FIELD_CAST)),
            rating: rating(doc),
            plot: text(doc.get(FIELD_PLOT)),
        }
    }
}

impl From<&BsonDocument> for TopMovie {
    fn from(doc: &BsonDocument) -> Self {
        Self {
            title: text(doc.get(FIELD_TITLE)),
            year: integer(doc.get(FIELD_YEAR)),
            rating: rating(doc),
            genres: strings(doc.get(FIELD_GENRES)),
        }
    }
}

fn text(v: Option<&Bson>) -> Option<String> {
    match v {
        Some(Bson::String(s)) => Some(s.clone()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn integer(v: Option<&Bson>) -> Option<i32> {
    match v {
        Some(Bson::Int32(i)) => Some(*i),
        Some(Bson::Int64(i)) => i32::try_from(*i).ok(),
        Some(Bson::Double(f))
            if f.fract() == 0.0 && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(f) =>
        {
            Some(*f as i32)
        }
        _ => None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn number(v: Option<&Bson>) -> Option<f64> {
    match v {
        Some(Bson::Double(f)) => Some(*f),
        Some(Bson::Int32(i)) => Some(f64::from(*i)),
        Some(Bson::Int64(i)) => Some(*i as f64),
        _ => None,
    }
}

fn rating(doc: &BsonDocument) -> Option<f64> {
    match doc.get("imdb") {
        Some(Bson::Document(imdb)) => number(imdb.get("rating")),
        _ => None,
    }
}

fn strings(v: Option<&Bson>) -> Vec<String> {
    match v {
        Some(Bson::Array(items)) => items
            .iter()
            .filter_map(|b| match b {
                Bson::String(s) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
