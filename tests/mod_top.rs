mod common;

use movielite::movies::TopMoviesParams;

#[test]
fn default_top_five() {
    let top = common::service().get_top_movies(&TopMoviesParams::default()).unwrap();
    assert_eq!(top.len(), 5);
    // A non-numeric rating still counts as present and outranks numbers, as on a MongoDB server.
    assert_eq!(top[0].title.as_deref(), Some("Blank Rating"));
    assert_eq!(top[0].rating, None);
    assert_eq!(top[1].title.as_deref(), Some("The Shawshank Redemption"));
    assert_eq!(top[1].rating, Some(9.3));
    assert_eq!(top[1].genres, vec!["Crime", "Drama"]);
}

#[test]
fn unrated_movies_never_appear() {
    let top = common::service()
        .get_top_movies(&TopMoviesParams { genre: Some("Comedy".into()), limit: 0, ..Default::default() })
        .unwrap();
    let titles = common::titles(top.iter().map(|t| &t.title));
    assert_eq!(titles, vec!["Big", "Dumb and Dumber", "The Mask"]);
}

#[test]
fn year_restricts_ranking() {
    let top = common::service()
        .get_top_movies(&TopMoviesParams { year: Some(1994), limit: 2, ..Default::default() })
        .unwrap();
    let titles = common::titles(top.iter().map(|t| &t.title));
    assert_eq!(titles, vec!["The Shawshank Redemption", "Forrest Gump"]);
    assert!(top.iter().all(|t| t.year == Some(1994)));
}

#[test]
fn ratings_are_non_increasing() {
    let top = common::service()
        .get_top_movies(&TopMoviesParams { genre: Some("Drama".into()), limit: 0, ..Default::default() })
        .unwrap();
    let rated: Vec<f64> = top.iter().filter_map(|t| t.rating).collect();
    assert!(rated.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn no_match_is_empty() {
    let top = common::service()
        .get_top_movies(&TopMoviesParams { year: Some(1900), ..Default::default() })
        .unwrap();
    assert!(top.is_empty());
}
