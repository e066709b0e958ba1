mod common;

use movielite::movies::MovieDetailsParams;

fn details(title: &str) -> Option<bson::Document> {
    common::service()
        .get_movie_details(&MovieDetailsParams { title: title.into() })
        .unwrap()
}

#[test]
fn exact_title_returns_full_record_without_id() {
    let doc = details("The Shawshank Redemption").unwrap();
    assert!(!doc.contains_key("_id"));
    assert_eq!(doc.get_i32("year").unwrap(), 1994);
    assert_eq!(doc.get_str("rated").unwrap(), "R");
    assert_eq!(doc.get_document("imdb").unwrap().get_i32("votes").unwrap(), 1_521_105);
}

#[test]
fn match_is_case_sensitive_and_whole() {
    assert!(details("the shawshank redemption").is_none());
    assert!(details("Shawshank").is_none());
    assert!(details("").is_none());
}

#[test]
fn duplicate_titles_return_the_first_in_store_order() {
    let doc = details("Hamlet").unwrap();
    assert_eq!(doc.get_str("edition").unwrap(), "first");
}
