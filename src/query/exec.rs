use bson::Document as BsonDocument;

use super::eval::{Matcher, compare_docs, project};
use super::types::{Filter, FindOptions, Projection, effective_limit};
use crate::errors::DbError;
use crate::utils::devlog::QueryTiming;

const BACKEND: &str = "memory";

/// Runs a find over an in-memory set of documents: filter, stable sort, limit, then projection.
///
/// # Errors
/// Returns `DbError::QueryError` when the filter cannot be compiled.
pub fn find_docs(
    collection: &str,
    docs: &[BsonDocument],
    filter: &Filter,
    opts: &FindOptions,
) -> Result<Vec<BsonDocument>, DbError> {
    let bench_start = std::time::Instant::now();
    let matcher = Matcher::new(filter)?;
    let mut hits: Vec<&BsonDocument> = docs.iter().filter(|d| matcher.matches(d)).collect();
    if let Some(sort) = &opts.sort {
        // sort_by is stable: equal keys keep insertion order
        hits.sort_by(|a, b| compare_docs(a, b, sort));
    }
    hits.truncate(effective_limit(opts.limit));
    let out: Vec<BsonDocument> = match &opts.projection {
        Some(p) => hits.into_iter().map(|d| project(d, p)).collect(),
        None => hits.into_iter().cloned().collect(),
    };
    QueryTiming::new("find", BACKEND, collection, bench_start)
        .scanned(docs.len())
        .results(out.len() as u64)
        .limit(opts.limit)
        .record();
    Ok(out)
}

/// # Errors
/// Returns `DbError::QueryError` when the filter cannot be compiled.
pub fn count_docs(collection: &str, docs: &[BsonDocument], filter: &Filter) -> Result<u64, DbError> {
    let bench_start = std::time::Instant::now();
    let matcher = Matcher::new(filter)?;
    let n = docs.iter().filter(|d| matcher.matches(d)).count() as u64;
    QueryTiming::new("count", BACKEND, collection, bench_start).scanned(docs.len()).results(n).record();
    Ok(n)
}

/// Returns the first document in store order matching `filter`.
///
/// # Errors
/// Returns `DbError::QueryError` when the filter cannot be compiled.
pub fn find_one(
    collection: &str,
    docs: &[BsonDocument],
    filter: &Filter,
    projection: Option<&Projection>,
) -> Result<Option<BsonDocument>, DbError> {
    let bench_start = std::time::Instant::now();
    let matcher = Matcher::new(filter)?;
    let hit = docs.iter().find(|d| matcher.matches(d));
    QueryTiming::new("find_one", BACKEND, collection, bench_start)
        .scanned(docs.len())
        .results(u64::from(hit.is_some()))
        .record();
    Ok(hit.map(|d| projection.map_or_else(|| d.clone(), |p| project(d, p))))
}
