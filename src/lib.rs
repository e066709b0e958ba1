//! Query tools over a movie catalogue.
//!
//! A [`MovieService`] answers four questions against a document store (MongoDB, or an in-memory
//! copy of an export): find movies by criteria, count them, rank the best rated, and fetch one
//! record by exact title. The [`server`] module exposes those operations as callable tools over
//! stdio; [`cli`] runs them once from the command line.

pub mod cli;
pub mod config;
pub mod errors;
pub mod import;
pub mod logger;
pub mod movies;
pub mod query;
pub mod server;
pub mod store;
pub mod utils;

pub use errors::DbError;
pub use movies::MovieService;
pub use store::{DocumentStore, MemoryStore};
