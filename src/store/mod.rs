//! Document-store adapters.
//!
//! A store executes typed queries against one named collection. The process opens exactly one
//! store at startup through [`connect`] and shares it read-only across calls.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use bson::Document as BsonDocument;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::StoreConfig;
use crate::errors::DbError;
use crate::import::{ImportOptions, load_file};
use crate::query::{Filter, FindOptions, Projection};

pub trait DocumentStore: Send + Sync {
    /// Backend label used in logs.
    fn backend(&self) -> &'static str;

    /// Returns matching documents after sort, limit and projection.
    ///
    /// # Errors
    /// Returns an error when the store call fails.
    fn find(&self, filter: &Filter, opts: &FindOptions) -> Result<Vec<BsonDocument>, DbError>;

    /// # Errors
    /// Returns an error when the store call fails.
    fn count(&self, filter: &Filter) -> Result<u64, DbError>;

    /// Returns the store's first matching document, if any.
    ///
    /// # Errors
    /// Returns an error when the store call fails.
    fn find_one(
        &self,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Option<BsonDocument>, DbError>;
}

/// Where a connection string points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    Mongo(String),
    File(PathBuf),
}

impl StoreTarget {
    /// # Errors
    /// Returns `DbError::Config` for a blank string or an unsupported scheme.
    pub fn parse(uri: &str) -> Result<Self, DbError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(DbError::Config("connection string is empty".into()));
        }
        if uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://") {
            return Ok(Self::Mongo(uri.to_string()));
        }
        if let Some(path) = uri.strip_prefix("file://") {
            if path.is_empty() {
                return Err(DbError::Config("file:// connection string has no path".into()));
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        let scheme = uri.split_once("://").map_or(uri, |(s, _)| s);
        Err(DbError::Config(format!("unsupported connection scheme: {scheme}")))
    }
}

/// Opens the process-wide store described by `cfg`.
///
/// # Errors
/// Returns a configuration, I/O or connection error; callers treat any of them as fatal.
pub fn connect(cfg: &StoreConfig) -> Result<Arc<dyn DocumentStore>, DbError> {
    match StoreTarget::parse(&cfg.uri)? {
        StoreTarget::Mongo(uri) => {
            let store = MongoStore::connect(&uri, &cfg.database, &cfg.collection)?;
            Ok(Arc::new(store))
        }
        StoreTarget::File(path) => {
            let (docs, report) = load_file(&path, &ImportOptions::default())?;
            log::info!(
                "loaded {} documents from {} (skipped {})",
                report.inserted,
                path.display(),
                report.skipped
            );
            Ok(Arc::new(MemoryStore::from_documents(&cfg.collection, docs)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_recognises_schemes() {
        assert_eq!(
            StoreTarget::parse("mongodb+srv://u:p@cluster0.example.net").unwrap(),
            StoreTarget::Mongo("mongodb+srv://u:p@cluster0.example.net".into())
        );
        assert_eq!(
            StoreTarget::parse(" file:///data/movies.json ").unwrap(),
            StoreTarget::File(PathBuf::from("/data/movies.json"))
        );
    }

    #[test]
    fn parse_rejects_blank_and_unknown() {
        assert!(matches!(StoreTarget::parse("   "), Err(DbError::Config(_))));
        assert!(matches!(StoreTarget::parse("file://"), Err(DbError::Config(_))));
        let err = StoreTarget::parse("postgres://localhost/db").unwrap_err();
        assert!(err.to_string().contains("postgres"));
    }

    #[test]
    fn connect_reports_missing_export_file() {
        let cfg = StoreConfig {
            uri: "file:///definitely/not/here/movies.json".into(),
            database: "sample_mflix".into(),
            collection: "movies".into(),
        };
        assert!(matches!(connect(&cfg), Err(DbError::Io(_))));
    }
}
