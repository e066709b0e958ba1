use bson::Document as BsonDocument;
use parking_lot::RwLock;

use super::DocumentStore;
use crate::errors::DbError;
use crate::query::{self, Filter, FindOptions, Projection};

/// An in-process collection. Documents keep insertion order, which is the store order used for
/// sort ties and for `find_one`.
pub struct MemoryStore {
    name: String,
    docs: RwLock<Vec<BsonDocument>>,
}

impl MemoryStore {
    #[must_use]
    pub fn from_documents(name: &str, docs: Vec<BsonDocument>) -> Self {
        Self { name: name.to_string(), docs: RwLock::new(docs) }
    }
}

impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn find(&self, filter: &Filter, opts: &FindOptions) -> Result<Vec<BsonDocument>, DbError> {
        query::find_docs(&self.name, &self.docs.read(), filter, opts)
    }

    fn count(&self, filter: &Filter) -> Result<u64, DbError> {
        query::count_docs(&self.name, &self.docs.read(), filter)
    }

    fn find_one(
        &self,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Option<BsonDocument>, DbError> {
        query::find_one(&self.name, &self.docs.read(), filter, projection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn store_order_decides_find_one() {
        let store = MemoryStore::from_documents(
            "movies",
            vec![doc! {"title": "Heat", "year": 1995}, doc! {"title": "Casino", "year": 1995}],
        );
        assert_eq!(store.backend(), "memory");
        assert_eq!(store.count(&Filter::And(Vec::new())).unwrap(), 2);
        let first = store.find_one(&Filter::And(Vec::new()), None).unwrap().unwrap();
        assert_eq!(first.get_str("title").unwrap(), "Heat");
    }
}
