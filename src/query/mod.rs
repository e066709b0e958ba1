// Submodules for separation of concerns
mod encode;
mod eval;
mod exec;
mod types;

pub use encode::{filter_to_document, projection_to_document, sort_to_document};
pub use exec::{count_docs, find_docs, find_one};
pub use types::{CmpOp, Filter, FindOptions, Order, Projection, SortSpec};
