use std::collections::BTreeSet;

use bgg_client::extract::parse_collection;

fn load_sample() -> String {
    std::fs::read_to_string("tests/collection_sample.xml")
        .expect("failed to read collection_sample.xml")
}

fn tags(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn parses_owned_games_in_document_order() {
    let games = parse_collection(&load_sample()).expect("parse failed");
    assert_eq!(games.len(), 3);

    assert_eq!(games[0].id, 822);
    assert_eq!(games[0].name, "Carcassonne");
    assert_eq!(games[0].numplays, 12);
    assert_eq!(games[0].tags, tags(&["own"]));

    assert_eq!(games[1].id, 13);
    assert_eq!(games[1].tags, tags(&["fortrade", "prevowned"]));
    assert_eq!(games[1].numplays, 31);

    assert_eq!(games[2].id, 174430);
    assert_eq!(games[2].tags, tags(&["want", "wanttoplay", "wishlist"]));
    assert_eq!(games[2].numplays, 0);
}

#[test]
fn ids_are_unique_within_one_response() {
    let games = parse_collection(&load_sample()).unwrap();
    let ids: BTreeSet<u32> = games.iter().map(|g| g.id).collect();
    assert_eq!(ids.len(), games.len());
}

#[test]
fn document_without_items_is_an_empty_collection() {
    let games = parse_collection("<items totalitems=\"0\"></items>").unwrap();
    assert!(games.is_empty());
}
