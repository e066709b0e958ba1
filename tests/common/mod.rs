#![allow(dead_code)]

use bson::{Document as BsonDocument, doc, oid::ObjectId};
use movielite::{MemoryStore, MovieService};
use std::sync::Arc;

/// A small catalogue covering the awkward cases: duplicate titles, a movie with no rating,
/// one whose rating is an empty string, and equal ratings.
pub fn catalogue() -> Vec<BsonDocument> {
    vec![
        doc! {
            "_id": ObjectId::new(),
            "title": "The Shawshank Redemption",
            "year": 1994,
            "genres": ["Crime", "Drama"],
            "cast": ["Tim Robbins", "Morgan Freeman", "Bob Gunton"],
            "imdb": {"rating": 9.3, "votes": 1_521_105},
            "plot": "Two imprisoned men bond over a number of years.",
            "rated": "R",
        },
        doc! {
            "_id": ObjectId::new(),
            "title": "Forrest Gump",
            "year": 1994,
            "genres": ["Drama", "Romance"],
            "cast": ["Tom Hanks", "Robin Wright", "Gary Sinise"],
            "imdb": {"rating": 8.8},
            "plot": "Decades of history through the eyes of one man.",
        },
        doc! {
            "_id": ObjectId::new(),
            "title": "Cast Away",
            "year": 2000,
            "genres": ["Adventure", "Drama"],
            "cast": ["Tom Hanks", "Helen Hunt"],
            "imdb": {"rating": 7.8},
        },
        doc! {
            "_id": ObjectId::new(),
            "title": "Big",
            "year": 1988,
            "genres": ["Comedy", "Drama", "Fantasy"],
            "cast": ["Tom Hanks", "Elizabeth Perkins"],
            "imdb": {"rating": 7.3},
        },
        doc! {
            "_id": ObjectId::new(),
            "title": "Dumb and Dumber",
            "year": 1994,
            "genres": ["Comedy"],
            "cast": ["Jim Carrey", "Jeff Daniels"],
            "imdb": {"rating": 7.3},
        },
        doc! {
            "_id": ObjectId::new(),
            "title": "The Mask",
            "year": 1994,
            "genres": ["Comedy", "Crime", "Fantasy"],
            "cast": ["Jim Carrey", "Cameron Diaz"],
            "imdb": {"rating": 6.9},
        },
        doc! {
            "_id": ObjectId::new(),
            "title": "Lost Reel",
            "year": 1994,
            "genres": ["Comedy"],
            "cast": ["Nobody Known"],
        },
        doc! {
            "_id": ObjectId::new(),
            "title": "Blank Rating",
            "year": 1995,
            "genres": ["Drama"],
            "cast": ["Someone Else"],
            "imdb": {"rating": ""},
        },
        doc! {
            "_id": ObjectId::new(),
            "title": "Hamlet",
            "year": 1948,
            "genres": ["Drama"],
            "cast": ["Laurence Olivier"],
            "imdb": {"rating": 7.8},
            "edition": "first",
        },
        doc! {
            "_id": ObjectId::new(),
            "title": "Hamlet",
            "year": 1996,
            "genres": ["Drama"],
            "cast": ["Kenneth Branagh"],
            "imdb": {"rating": 7.8},
            "edition": "second",
        },
    ]
}

pub fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::from_documents("movies", catalogue()))
}

pub fn service() -> MovieService {
    MovieService::new(store())
}

pub fn titles<'a, I>(titles: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Option<String>>,
{
    titles.into_iter().map(|t| t.clone().unwrap_or_default()).collect()
}
