use bson::Bson;

use crate::query::{CmpOp, Filter};

pub const FIELD_TITLE: &str = "title";
pub const FIELD_GENRES: &str = "genres";
pub const FIELD_CAST: &str = "cast";
pub const FIELD_YEAR: &str = "year";
pub const FIELD_RATING: &str = "imdb.rating";
pub const FIELD_PLOT: &str = "plot";

/// Optional search constraints. An unset field imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Exact element of `genres`.
    pub genre: Option<String>,
    /// Case-insensitive substring of any `cast` entry.
    pub actor: Option<String>,
    pub year: Option<i32>,
    /// Inclusive lower bound on `imdb.rating`.
    pub min_rating: Option<f64>,
}

impl SearchCriteria {
    /// Drops "empty" criteria: an empty string, a year of `0` and a minimum rating of `0.0`
    /// constrain nothing. Whitespace is ordinary text.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for field in [&mut self.title, &mut self.genre, &mut self.actor] {
            if field.as_deref().is_some_and(str::is_empty) {
                *field = None;
            }
        }
        if self.year == Some(0) {
            self.year = None;
        }
        if self.min_rating.is_some_and(|r| r == 0.0) {
            self.min_rating = None;
        }
        self
    }

    /// Builds the conjunction of the clauses for the present criteria.
    #[must_use]
    pub fn to_filter(&self) -> Filter {
        Filter::And(self.clauses())
    }

    #[must_use]
    pub fn clauses(&self) -> Vec<Filter> {
        let mut out = Vec::new();
        if let Some(title) = &self.title {
            out.push(contains_ci(FIELD_TITLE, title));
        }
        if let Some(genre) = &self.genre {
            out.push(Filter::Cmp {
                path: FIELD_GENRES.into(),
                op: CmpOp::Eq,
                value: Bson::String(genre.clone()),
            });
        }
        if let Some(actor) = &self.actor {
            out.push(contains_ci(FIELD_CAST, actor));
        }
        if let Some(year) = self.year {
            out.push(Filter::Cmp { path: FIELD_YEAR.into(), op: CmpOp::Eq, value: Bson::Int32(year) });
        }
        if let Some(min) = self.min_rating {
            out.push(Filter::Cmp { path: FIELD_RATING.into(), op: CmpOp::Gte, value: Bson::Double(min) });
        }
        out
    }
}

// The text is matched literally, not as a pattern.
fn contains_ci(path: &str, needle: &str) -> Filter {
    Filter::Regex { path: path.into(), pattern: regex::escape(needle), case_insensitive: true }
}

/// Requires the rating field to be present, whatever its value.
#[must_use]
pub fn has_rating() -> Filter {
    Filter::Exists { path: FIELD_RATING.into() }
}

/// Exact, case-sensitive title equality.
#[must_use]
pub fn title_equals(title: &str) -> Filter {
    Filter::Cmp { path: FIELD_TITLE.into(), op: CmpOp::Eq, value: Bson::String(title.to_string()) }
}
