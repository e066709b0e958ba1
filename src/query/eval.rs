use bson::{Bson, Document as BsonDocument};
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;

use super::types::{CmpOp, Filter, MAX_PATH_DEPTH, Order, Projection, SortSpec};
use crate::errors::DbError;

/// A filter prepared for repeated evaluation: regex clauses are compiled once.
#[derive(Debug, Clone)]
pub struct Matcher {
    root: Node,
}

#[derive(Debug, Clone)]
enum Node {
    And(Vec<Node>),
    Exists { path: String },
    Cmp { path: String, op: CmpOp, value: Bson },
    Regex { path: String, re: Regex },
}

impl Matcher {
    /// # Errors
    /// Returns `DbError::QueryError` when a regex clause does not compile.
    pub fn new(filter: &Filter) -> Result<Self, DbError> {
        Ok(Self { root: compile(filter)? })
    }

    #[must_use]
    pub fn matches(&self, doc: &BsonDocument) -> bool {
        eval_node(doc, &self.root)
    }
}

fn compile(filter: &Filter) -> Result<Node, DbError> {
    Ok(match filter {
        Filter::And(fs) => Node::And(fs.iter().map(compile).collect::<Result<_, _>>()?),
        Filter::Exists { path } => Node::Exists { path: path.clone() },
        Filter::Cmp { path, op, value } => {
            Node::Cmp { path: path.clone(), op: *op, value: value.clone() }
        }
        Filter::Regex { path, pattern, case_insensitive } => {
            let re = RegexBuilder::new(pattern)
                .case_insensitive(*case_insensitive)
                .build()
                .map_err(|e| DbError::QueryError(format!("invalid regex on {path}: {e}")))?;
            Node::Regex { path: path.clone(), re }
        }
    })
}

fn eval_node(doc: &BsonDocument, node: &Node) -> bool {
    match node {
        Node::And(ns) => ns.iter().all(|n| eval_node(doc, n)),
        Node::Exists { path } => get_path(doc, path).is_some(),
        Node::Cmp { path, op, value } => match get_path(doc, path) {
            // Array fields match when the whole array or any element satisfies the comparison
            Some(whole @ Bson::Array(items)) => {
                cmp_matches(whole, *op, value) || items.iter().any(|v| cmp_matches(v, *op, value))
            }
            Some(v) => cmp_matches(v, *op, value),
            None => false,
        },
        Node::Regex { path, re } => match get_path(doc, path) {
            Some(Bson::String(s)) => re.is_match(s),
            Some(Bson::Array(items)) => {
                items.iter().any(|v| matches!(v, Bson::String(s) if re.is_match(s)))
            }
            _ => false,
        },
    }
}

fn cmp_matches(v: &Bson, op: CmpOp, value: &Bson) -> bool {
    match op {
        CmpOp::Eq => bson_equal(v, value),
        // Range operators only compare values of the same type class
        CmpOp::Gte => compare_same_class(v, value).is_some_and(|o| o != Ordering::Less),
    }
}

pub(crate) fn get_path<'a>(doc: &'a BsonDocument, path: &str) -> Option<&'a Bson> {
    if path.is_empty() || path.len() > 1024 {
        return None;
    }
    let mut parts = path.split('.');
    let mut cur = doc.get(parts.next()?);
    for (depth, part) in parts.enumerate() {
        if depth + 1 >= MAX_PATH_DEPTH {
            return None;
        }
        match cur {
            Some(Bson::Document(d)) => cur = d.get(part),
            _ => return None,
        }
    }
    cur
}

fn to_f64(b: &Bson) -> Option<f64> {
    match b {
        Bson::Int32(i) => Some(f64::from(*i)),
        #[allow(clippy::cast_precision_loss)]
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

#[allow(clippy::float_cmp)]
fn bson_equal(a: &Bson, b: &Bson) -> bool {
    match (to_f64(a), to_f64(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn compare_same_class(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (to_f64(a), to_f64(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Total order over BSON values: type class first, then value within the class.
fn compare_bson(a: &Bson, b: &Bson) -> Ordering {
    let (ra, rb) = (type_rank(a), type_rank(b));
    if ra != rb {
        return ra.cmp(&rb);
    }
    if let (Some(x), Some(y)) = (to_f64(a), to_f64(b)) {
        return x.total_cmp(&y);
    }
    compare_same_class(a, b).unwrap_or(Ordering::Equal)
}

// Cross-type sort order used by MongoDB.
fn type_rank(v: &Bson) -> u8 {
    match v {
        Bson::MinKey => 0,
        Bson::Null | Bson::Undefined => 1,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 2,
        Bson::Symbol(_) | Bson::String(_) => 3,
        Bson::Document(_) => 4,
        Bson::Array(_) => 5,
        Bson::Binary(_) => 6,
        Bson::ObjectId(_) => 7,
        Bson::Boolean(_) => 8,
        Bson::DateTime(_) => 9,
        Bson::Timestamp(_) => 10,
        Bson::RegularExpression(_) => 11,
        Bson::DbPointer(_) | Bson::JavaScriptCode(_) | Bson::JavaScriptCodeWithScope(_) => 12,
        Bson::MaxKey => 13,
    }
}

/// Compares two documents by the sort keys in order. A missing field ranks with null, below
/// every number or string, so it lands last in a descending sort.
pub(crate) fn compare_docs(a: &BsonDocument, b: &BsonDocument, sort: &[SortSpec]) -> Ordering {
    for s in sort {
        let ord = match (get_path(a, &s.field), get_path(b, &s.field)) {
            (Some(x), Some(y)) => compare_bson(x, y),
            (Some(x), None) => compare_bson(x, &Bson::Null),
            (None, Some(y)) => compare_bson(&Bson::Null, y),
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return if s.order == Order::Asc { ord } else { ord.reverse() };
        }
    }
    Ordering::Equal
}

#[must_use]
pub(crate) fn project(doc: &BsonDocument, projection: &Projection) -> BsonDocument {
    match projection {
        Projection::Include(fields) => {
            let mut out = BsonDocument::new();
            for f in fields {
                if let Some(v) = get_path(doc, f) {
                    insert_path(&mut out, f, v.clone());
                }
            }
            out
        }
        Projection::Exclude(fields) => {
            let mut out = doc.clone();
            for f in fields {
                remove_path(&mut out, f);
            }
            out
        }
    }
}

fn insert_path(root: &mut BsonDocument, path: &str, value: Bson) {
    match path.split_once('.') {
        None => {
            root.insert(path, value);
        }
        Some((head, rest)) => {
            if !matches!(root.get(head), Some(Bson::Document(_))) {
                root.insert(head, BsonDocument::new());
            }
            if let Some(Bson::Document(sub)) = root.get_mut(head) {
                insert_path(sub, rest, value);
            }
        }
    }
}

fn remove_path(root: &mut BsonDocument, path: &str) {
    match path.split_once('.') {
        None => {
            root.remove(path);
        }
        Some((head, rest)) => {
            if let Some(Bson::Document(sub)) = root.get_mut(head) {
                remove_path(sub, rest);
            }
        }
    }
}
