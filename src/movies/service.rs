use bson::Document as BsonDocument;
use std::sync::Arc;

use super::criteria::{
    FIELD_CAST, FIELD_GENRES, FIELD_PLOT, FIELD_RATING, FIELD_TITLE, FIELD_YEAR, has_rating,
    title_equals,
};
use super::params::{CountMoviesParams, FindMoviesParams, MovieDetailsParams, TopMoviesParams};
use super::records::{MovieRecord, TopMovie};
use crate::errors::DbError;
use crate::query::{Filter, FindOptions, Projection, SortSpec};
use crate::store::DocumentStore;

/// The four movie queries over one shared store handle. Holds no other state.
#[derive(Clone)]
pub struct MovieService {
    store: Arc<dyn DocumentStore>,
}

fn fields(names: &[&str]) -> Projection {
    Projection::Include(names.iter().map(|s| (*s).to_string()).collect())
}

fn by_rating_desc() -> Option<Vec<SortSpec>> {
    Some(vec![SortSpec::desc(FIELD_RATING)])
}

// The ranking skips documents without a rating.
fn top_filter(params: &TopMoviesParams) -> Filter {
    let mut clauses = params.criteria().clauses();
    clauses.push(has_rating());
    Filter::And(clauses)
}

fn details_projection() -> Projection {
    Projection::Exclude(vec!["_id".to_string()])
}

impl MovieService {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Searches by any combination of criteria, best rated first. Unrated movies sort last.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn find_movies(&self, params: &FindMoviesParams) -> Result<Vec<MovieRecord>, DbError> {
        let filter = params.criteria().to_filter();
        let opts = FindOptions {
            projection: Some(fields(&[
                FIELD_TITLE,
                FIELD_YEAR,
                FIELD_GENRES,
                FIELD_CAST,
                FIELD_RATING,
                FIELD_PLOT,
            ])),
            sort: by_rating_desc(),
            limit: Some(params.limit),
        };
        let docs = self.store.find(&filter, &opts)?;
        log::debug!("find_movies matched {} documents", docs.len());
        Ok(docs.iter().map(MovieRecord::from).collect())
    }

    /// # Errors
    /// Propagates store failures.
    pub fn count_movies(&self, params: &CountMoviesParams) -> Result<u64, DbError> {
        self.store.count(&params.criteria().to_filter())
    }

    /// Best rated movies, restricted to documents that carry a rating.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn get_top_movies(&self, params: &TopMoviesParams) -> Result<Vec<TopMovie>, DbError> {
        let opts = FindOptions {
            projection: Some(fields(&[FIELD_TITLE, FIELD_YEAR, FIELD_RATING, FIELD_GENRES])),
            sort: by_rating_desc(),
            limit: Some(params.limit),
        };
        let docs = self.store.find(&top_filter(params), &opts)?;
        Ok(docs.iter().map(TopMovie::from).collect())
    }

    /// Looks a movie up by its exact, case-sensitive title. Unlike `find_movies`, no substring
    /// or case folding applies. With duplicate titles the store's first match wins.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn get_movie_details(
        &self,
        params: &MovieDetailsParams,
    ) -> Result<Option<BsonDocument>, DbError> {
        self.store.find_one(&title_equals(&params.title), Some(&details_projection()))
    }
}
