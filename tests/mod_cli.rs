mod common;

use movielite::cli::{Command, OutputMode, run_with_format};
use movielite::movies::{CountMoviesParams, FindMoviesParams, MovieDetailsParams, TopMoviesParams};

fn render(cmd: Command, mode: OutputMode) -> String {
    let mut out = Vec::new();
    run_with_format(&common::service(), cmd, mode, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn find_json_is_one_record_per_line() {
    let out = render(
        Command::Find(FindMoviesParams { actor: Some("Hanks".into()), ..Default::default() }),
        OutputMode::Json,
    );
    let lines: Vec<serde_json::Value> = out.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["title"], "Forrest Gump");
}

#[test]
fn count_and_top_human() {
    let out = render(
        Command::Count(CountMoviesParams { genre: Some("Comedy".into()), ..Default::default() }),
        OutputMode::Human,
    );
    assert_eq!(out, "count=4\n");
    let out = render(
        Command::Top(TopMoviesParams { year: Some(1994), limit: 1, ..Default::default() }),
        OutputMode::Human,
    );
    assert_eq!(out, "1. The Shawshank Redemption (1994) rating=9.3 genres=Crime,Drama\n");
}

#[test]
fn details_found_and_missing() {
    let out = render(
        Command::Details(MovieDetailsParams { title: "Big".into() }),
        OutputMode::Json,
    );
    let doc: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(doc["year"], 1988);
    assert!(doc.get("_id").is_none());
    let out = render(
        Command::Details(MovieDetailsParams { title: "big".into() }),
        OutputMode::Human,
    );
    assert_eq!(out, "not found: big\n");
}
