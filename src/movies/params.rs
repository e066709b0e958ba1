//! Parameter sets of the four operations. They deserialize from tool-call arguments, so unknown
//! fields and wrong types are rejected there.

use serde::{Deserialize, Serialize};

use super::criteria::SearchCriteria;

pub const DEFAULT_FIND_LIMIT: i64 = 10;
pub const DEFAULT_TOP_LIMIT: i64 = 5;

const fn default_find_limit() -> i64 {
    DEFAULT_FIND_LIMIT
}

const fn default_top_limit() -> i64 {
    DEFAULT_TOP_LIMIT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FindMoviesParams {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default = "default_find_limit")]
    pub limit: i64,
}

impl Default for FindMoviesParams {
    fn default() -> Self {
        Self {
            title: None,
            genre: None,
            actor: None,
            year: None,
            min_rating: None,
            limit: DEFAULT_FIND_LIMIT,
        }
    }
}

impl FindMoviesParams {
    #[must_use]
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            title: self.title.clone(),
            genre: self.genre.clone(),
            actor: self.actor.clone(),
            year: self.year,
            min_rating: self.min_rating,
        }
        .normalized()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountMoviesParams {
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub min_rating: Option<f64>,
}

impl CountMoviesParams {
    #[must_use]
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            genre: self.genre.clone(),
            year: self.year,
            min_rating: self.min_rating,
            ..SearchCriteria::default()
        }
        .normalized()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopMoviesParams {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default = "default_top_limit")]
    pub limit: i64,
}

impl Default for TopMoviesParams {
    fn default() -> Self {
        Self { year: None, genre: None, limit: DEFAULT_TOP_LIMIT }
    }
}

impl TopMoviesParams {
    #[must_use]
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria { year: self.year, genre: self.genre.clone(), ..SearchCriteria::default() }
            .normalized()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MovieDetailsParams {
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn limits_default_per_operation() {
        let f: FindMoviesParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(f.limit, 10);
        let t: TopMoviesParams = serde_json::from_value(json!({"year": 1994})).unwrap();
        assert_eq!(t.limit, 5);
        assert_eq!(t.year, Some(1994));
    }

    #[test]
    fn null_means_absent() {
        let f: FindMoviesParams =
            serde_json::from_value(json!({"title": null, "min_rating": null})).unwrap();
        assert_eq!(f, FindMoviesParams::default());
    }

    #[test]
    fn count_rejects_fields_it_does_not_take() {
        assert!(serde_json::from_value::<CountMoviesParams>(json!({"title": "Heat"})).is_err());
        assert!(serde_json::from_value::<CountMoviesParams>(json!({"year": "1994"})).is_err());
    }

    #[test]
    fn details_requires_title() {
        assert!(serde_json::from_value::<MovieDetailsParams>(json!({})).is_err());
    }

    #[test]
    fn negative_limit_passes_through() {
        let f: FindMoviesParams = serde_json::from_value(json!({"limit": -3})).unwrap();
        assert_eq!(f.limit, -3);
    }
}
