use bson::Bson;
use serde::{Deserialize, Serialize};

// Safety limit for dotted path traversal
pub(crate) const MAX_PATH_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: Order,
}

impl SortSpec {
    #[must_use]
    pub fn desc(field: &str) -> Self {
        Self { field: field.to_string(), order: Order::Desc }
    }
}

/// Field selection applied to returned documents.
///
/// `Include` keeps only the listed (possibly dotted) paths and drops `_id` unless it is listed.
/// `Exclude` keeps everything except the listed top-level fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    Include(Vec<String>),
    Exclude(Vec<String>),
}

/// Options for `find_docs`.
///
/// Semantics:
/// - Sorting is stable and applied before the limit and the projection.
/// - `limit` follows the MongoDB convention: `0` means unlimited, a negative value uses its magnitude.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindOptions {
    pub projection: Option<Projection>,
    pub sort: Option<Vec<SortSpec>>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Gte,
}

/// A query predicate. An empty `And` matches every document.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    And(Vec<Filter>),
    /// The path is present, whatever its value.
    Exists { path: String },
    Cmp { path: String, op: CmpOp, value: Bson },
    Regex { path: String, pattern: String, case_insensitive: bool },
}

impl Filter {
    /// Dotted paths constrained by this filter, in clause order.
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        match self {
            Self::And(fs) => fs.iter().flat_map(Self::paths).collect(),
            Self::Exists { path, .. } | Self::Cmp { path, .. } | Self::Regex { path, .. } => {
                vec![path.as_str()]
            }
        }
    }
}

/// Normalizes a requested limit to a slice length. `None` and `0` are unbounded.
#[must_use]
pub(crate) fn effective_limit(limit: Option<i64>) -> usize {
    match limit {
        None | Some(0) => usize::MAX,
        Some(n) => usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX),
    }
}
