//! Rendering of typed queries into MongoDB command documents.

use bson::{Bson, Document as BsonDocument, doc};

use super::types::{CmpOp, Filter, Order, Projection, SortSpec};

const fn op_name(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Eq => "$eq",
        CmpOp::Gte => "$gte",
    }
}

/// Renders a filter as a MongoDB query document.
///
/// A conjunction over distinct paths becomes one flat document (`{a: .., b: ..}`); a repeated
/// path falls back to `$and`. Equality is written in its implicit form (`{year: 1994}`).
#[must_use]
pub fn filter_to_document(filter: &Filter) -> BsonDocument {
    match filter {
        Filter::And(fs) => {
            let parts: Vec<BsonDocument> =
                fs.iter().map(filter_to_document).filter(|d| !d.is_empty()).collect();
            let mut merged = BsonDocument::new();
            for part in &parts {
                if part.keys().any(|k| merged.contains_key(k)) {
                    return doc! { "$and": parts.iter().cloned().map(Bson::Document).collect::<Vec<_>>() };
                }
                merged.extend(part.clone());
            }
            merged
        }
        Filter::Exists { path } => doc! { path.as_str(): { "$exists": true } },
        Filter::Cmp { path, op: CmpOp::Eq, value } => doc! { path.as_str(): value.clone() },
        Filter::Cmp { path, op, value } => doc! { path.as_str(): { op_name(*op): value.clone() } },
        Filter::Regex { path, pattern, case_insensitive } => {
            let options = if *case_insensitive { "i" } else { "" };
            doc! { path.as_str(): { "$regex": pattern.as_str(), "$options": options } }
        }
    }
}

/// Renders a projection. Inclusion projections suppress `_id` unless it is named.
#[must_use]
pub fn projection_to_document(projection: &Projection) -> BsonDocument {
    let mut out = BsonDocument::new();
    match projection {
        Projection::Include(fields) => {
            for f in fields {
                out.insert(f.as_str(), 1);
            }
            if !fields.iter().any(|f| f == "_id") {
                out.insert("_id", 0);
            }
        }
        Projection::Exclude(fields) => {
            for f in fields {
                out.insert(f.as_str(), 0);
            }
        }
    }
    out
}

#[must_use]
pub fn sort_to_document(sort: &[SortSpec]) -> BsonDocument {
    let mut out = BsonDocument::new();
    for s in sort {
        out.insert(s.field.as_str(), if s.order == Order::Asc { 1 } else { -1 });
    }
    out
}
