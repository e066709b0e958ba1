//! The callable tools. Each one is a typed parameter set that knows its name, its input schema
//! and how to run against the service.

use bson::Bson;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;

use crate::errors::DbError;
use crate::movies::{
    CountMoviesParams, DEFAULT_FIND_LIMIT, DEFAULT_TOP_LIMIT, FindMoviesParams, MovieDetailsParams,
    MovieService, TopMoviesParams,
};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error(transparent)]
    Failed(#[from] DbError),
}

pub trait Tool: DeserializeOwned {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    fn input_schema() -> Value;

    /// # Errors
    /// Propagates store failures.
    fn invoke(&self, service: &MovieService) -> Result<Value, DbError>;

    #[must_use]
    fn descriptor() -> Value {
        json!({
            "name": Self::NAME,
            "description": Self::DESCRIPTION,
            "inputSchema": Self::input_schema(),
        })
    }
}

impl Tool for FindMoviesParams {
    const NAME: &'static str = "find_movies";
    const DESCRIPTION: &'static str = "Find movies based on search criteria. Title and actor match \
        case-insensitive substrings, genre matches exactly. Results are sorted by IMDb rating, best \
        first; unrated movies come last.";

    fn input_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string", "description": "Movie title to search for"},
                "genre": {"type": "string", "description": "Genre like \"Comedy\", \"Drama\", etc."},
                "actor": {"type": "string", "description": "Actor name to search for"},
                "year": {"type": "integer", "description": "Release year"},
                "min_rating": {"type": "number", "description": "Minimum IMDb rating (e.g., 7.5)"},
                "limit": {"type": "integer", "default": DEFAULT_FIND_LIMIT, "description": "Maximum number of results"},
            },
            "additionalProperties": false,
        })
    }

    fn invoke(&self, service: &MovieService) -> Result<Value, DbError> {
        Ok(serde_json::to_value(service.find_movies(self)?)?)
    }
}

impl Tool for CountMoviesParams {
    const NAME: &'static str = "count_movies";
    const DESCRIPTION: &'static str = "Count how many movies match the criteria.";

    fn input_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "genre": {"type": "string", "description": "Genre to filter by"},
                "year": {"type": "integer", "description": "Release year to filter by"},
                "min_rating": {"type": "number", "description": "Minimum IMDb rating"},
            },
            "additionalProperties": false,
        })
    }

    fn invoke(&self, service: &MovieService) -> Result<Value, DbError> {
        Ok(json!(service.count_movies(self)?))
    }
}

impl Tool for TopMoviesParams {
    const NAME: &'static str = "get_top_movies";
    const DESCRIPTION: &'static str = "Get the top-rated movies. Only movies with an IMDb rating are considered.";

    fn input_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "year": {"type": "integer", "description": "Filter by release year"},
                "genre": {"type": "string", "description": "Filter by genre"},
                "limit": {"type": "integer", "default": DEFAULT_TOP_LIMIT, "description": "Number of movies to return"},
            },
            "additionalProperties": false,
        })
    }

    fn invoke(&self, service: &MovieService) -> Result<Value, DbError> {
        Ok(serde_json::to_value(service.get_top_movies(self)?)?)
    }
}

impl Tool for MovieDetailsParams {
    const NAME: &'static str = "get_movie_details";
    const DESCRIPTION: &'static str = "Get detailed information about a specific movie by its exact, \
        case-sensitive title. Returns null if not found.";

    fn input_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string", "description": "Exact movie title"},
            },
            "required": ["title"],
            "additionalProperties": false,
        })
    }

    fn invoke(&self, service: &MovieService) -> Result<Value, DbError> {
        Ok(service
            .get_movie_details(self)?
            .map_or(Value::Null, |d| Bson::Document(d).into_relaxed_extjson()))
    }
}

/// Descriptors of every tool, in a stable order.
#[must_use]
pub fn list_tools() -> Vec<Value> {
    vec![
        FindMoviesParams::descriptor(),
        CountMoviesParams::descriptor(),
        TopMoviesParams::descriptor(),
        MovieDetailsParams::descriptor(),
    ]
}

fn run<T: Tool>(service: &MovieService, args: Value) -> Result<Value, ToolError> {
    let params: T = serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
        tool: T::NAME.to_string(),
        message: e.to_string(),
    })?;
    Ok(params.invoke(service)?)
}

/// Runs the named tool. Missing or `null` arguments count as an empty object.
///
/// # Errors
/// Returns `ToolError::UnknownTool`, `ToolError::InvalidArguments`, or the store failure.
pub fn call_tool(service: &MovieService, name: &str, args: Option<Value>) -> Result<Value, ToolError> {
    let args = match args {
        None | Some(Value::Null) => json!({}),
        Some(v) => v,
    };
    match name {
        n if n == FindMoviesParams::NAME => run::<FindMoviesParams>(service, args),
        n if n == CountMoviesParams::NAME => run::<CountMoviesParams>(service, args),
        n if n == TopMoviesParams::NAME => run::<TopMoviesParams>(service, args),
        n if n == MovieDetailsParams::NAME => run::<MovieDetailsParams>(service, args),
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}
