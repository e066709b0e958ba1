use bson::Bson;
use std::io::Write;

use crate::movies::{MovieRecord, MovieService, TopMovie};

use super::command::Command;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Runs a command, writing NDJSON (one record per line) in `Json` mode or compact
/// `key=value` lines in `Human` mode.
///
/// # Errors
/// Propagates store and I/O failures.
pub fn run_with_format<W: Write>(
    service: &MovieService,
    cmd: Command,
    mode: OutputMode,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Command::Find(params) => {
            for movie in service.find_movies(&params)? {
                match mode {
                    OutputMode::Json => writeln!(out, "{}", serde_json::to_string(&movie)?)?,
                    OutputMode::Human => writeln!(out, "{}", describe_movie(&movie))?,
                }
            }
        }
        Command::Count(params) => {
            let n = service.count_movies(&params)?;
            match mode {
                OutputMode::Json => writeln!(out, "{}", serde_json::json!({ "count": n }))?,
                OutputMode::Human => writeln!(out, "count={n}")?,
            }
        }
        Command::Top(params) => {
            for (rank, movie) in service.get_top_movies(&params)?.iter().enumerate() {
                match mode {
                    OutputMode::Json => writeln!(out, "{}", serde_json::to_string(movie)?)?,
                    OutputMode::Human => writeln!(out, "{}. {}", rank + 1, describe_top(movie))?,
                }
            }
        }
        Command::Details(params) => match service.get_movie_details(&params)? {
            Some(doc) => {
                let v = Bson::Document(doc).into_relaxed_extjson();
                match mode {
                    OutputMode::Json => writeln!(out, "{v}")?,
                    OutputMode::Human => writeln!(out, "{}", serde_json::to_string_pretty(&v)?)?,
                }
            }
            None => match mode {
                OutputMode::Json => writeln!(out, "null")?,
                OutputMode::Human => writeln!(out, "not found: {}", params.title)?,
            },
        },
    }
    out.flush()?;
    Ok(())
}

fn rating_text(rating: Option<f64>) -> String {
    rating.map_or_else(|| "-".to_string(), |r| format!("{r:.1}"))
}

fn year_text(year: Option<i32>) -> String {
    year.map_or_else(|| "?".to_string(), |y| y.to_string())
}

fn describe_movie(m: &MovieRecord) -> String {
    format!(
        "title={:?} year={} rating={} genres={} cast={}",
        m.title.as_deref().unwrap_or(""),
        year_text(m.year),
        rating_text(m.rating),
        m.genres.join(","),
        m.cast.join(",")
    )
}

fn describe_top(m: &TopMovie) -> String {
    format!(
        "{} ({}) rating={} genres={}",
        m.title.as_deref().unwrap_or("<untitled>"),
        year_text(m.year),
        rating_text(m.rating),
        m.genres.join(",")
    )
}
