use bson::{Document as BsonDocument, doc};
use mongodb::sync::{Client, Collection};

use super::DocumentStore;
use crate::errors::DbError;
use crate::utils::devlog::QueryTiming;
use crate::query::{
    Filter, FindOptions, Projection, filter_to_document, projection_to_document, sort_to_document,
};

const BACKEND: &str = "mongodb";

/// A MongoDB collection reached through the driver's blocking API.
///
/// The client owns its own connection pool; one instance lives for the whole process.
pub struct MongoStore {
    collection: Collection<BsonDocument>,
}

impl MongoStore {
    /// Connects and pings the deployment once so a bad URI fails at startup rather than on the
    /// first tool call.
    ///
    /// # Errors
    /// Returns `DbError::Connection` when the URI is invalid or the server is unreachable.
    pub fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, DbError> {
        let client = Client::with_uri_str(uri).map_err(|e| DbError::Connection(e.to_string()))?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .run()
            .map_err(|e| DbError::Connection(e.to_string()))?;
        log::info!("connected to MongoDB, using {database}.{collection}");
        Ok(Self { collection: client.database(database).collection(collection) })
    }
}

impl DocumentStore for MongoStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn find(&self, filter: &Filter, opts: &FindOptions) -> Result<Vec<BsonDocument>, DbError> {
        let bench_start = std::time::Instant::now();
        let mut action = self.collection.find(filter_to_document(filter));
        if let Some(p) = &opts.projection {
            action = action.projection(projection_to_document(p));
        }
        if let Some(sort) = &opts.sort {
            action = action.sort(sort_to_document(sort));
        }
        // A negative driver limit means "single batch"; use the magnitude as the in-memory store does.
        if let Some(limit) = opts.limit.filter(|l| *l != 0) {
            action = action.limit(limit.saturating_abs());
        }
        let docs = action.run()?.collect::<Result<Vec<_>, _>>()?;
        QueryTiming::new("find", BACKEND, self.collection.name(), bench_start)
            .results(docs.len() as u64)
            .limit(opts.limit)
            .record();
        Ok(docs)
    }

    fn count(&self, filter: &Filter) -> Result<u64, DbError> {
        let bench_start = std::time::Instant::now();
        let n = self.collection.count_documents(filter_to_document(filter)).run()?;
        QueryTiming::new("count", BACKEND, self.collection.name(), bench_start).results(n).record();
        Ok(n)
    }

    fn find_one(
        &self,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Option<BsonDocument>, DbError> {
        let bench_start = std::time::Instant::now();
        let mut action = self.collection.find_one(filter_to_document(filter));
        if let Some(p) = projection {
            action = action.projection(projection_to_document(p));
        }
        let hit = action.run()?;
        QueryTiming::new("find_one", BACKEND, self.collection.name(), bench_start)
            .results(u64::from(hit.is_some()))
            .record();
        Ok(hit)
    }
}
