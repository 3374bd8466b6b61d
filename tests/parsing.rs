use std::fs;
use std::path::PathBuf;

use runslate::odds_fetch::parse_odds_json;
use runslate::schedule_fetch::{parse_feed_json, parse_pitcher, parse_schedule_json};
use runslate::teams::{Team, TeamDirectory};
use runslate::totals::collect_game_totals;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_pregame_odds_fixture() {
    let raw = read_fixture("odds_pregame.json");
    let events = parse_odds_json(&raw).expect("fixture should parse");
    assert_eq!(events.len(), 3);

    let dodgers = &events[0];
    assert_eq!(dodgers.home_team, "Los Angeles Dodgers");
    assert_eq!(dodgers.away_team, "New York Yankees");
    assert_eq!(dodgers.bookmakers.len(), 2);

    let totals = dodgers.bookmakers[0]
        .markets
        .iter()
        .find(|m| m.key == "totals")
        .expect("first bookmaker carries a totals market");
    assert_eq!(totals.outcomes.len(), 2);
    assert_eq!(totals.outcomes[0].name, "Over");
    assert_eq!(totals.outcomes[0].price, Some(-110.0));
    assert_eq!(totals.outcomes[0].point, Some(8.5));
}

#[test]
fn consensus_from_fixture_events() {
    let raw = read_fixture("odds_pregame.json");
    let events = parse_odds_json(&raw).expect("fixture should parse");
    let directory = TeamDirectory::standard();

    // Two events reconcile to the Dodgers/Yankees matchup: the first
    // implies exactly its 8.5 line, the second is over-skewed off 9.0.
    let total = collect_game_totals(&directory, &events, Team::Dodgers, Team::Yankees)
        .expect("consensus should exist");
    assert!((total - 8.752173913043478).abs() < 1e-9);

    // The Braves game only appears once.
    let braves = collect_game_totals(&directory, &events, Team::Braves, Team::Marlins)
        .expect("consensus should exist");
    assert!((braves - 8.0).abs() < 1e-12);

    // No event for this matchup at all.
    assert_eq!(
        collect_game_totals(&directory, &events, Team::Cubs, Team::Reds),
        None
    );
}

#[test]
fn parses_schedule_fixture() {
    let raw = read_fixture("schedule.json");
    let games = parse_schedule_json(&raw).expect("fixture should parse");
    assert_eq!(games.len(), 2);

    let preview = &games[0];
    assert_eq!(preview.game_pk, 745804);
    assert_eq!(preview.status.abstract_game_state, "Preview");
    assert_eq!(preview.status.detailed_state, "Scheduled");
    assert_eq!(preview.teams.home.team.name, "Los Angeles Dodgers");
    assert_eq!(preview.teams.away.team.name, "New York Yankees");

    let pitcher = preview
        .teams
        .away
        .probable_pitcher
        .as_ref()
        .and_then(parse_pitcher)
        .expect("hydrated probable pitcher");
    assert_eq!(pitcher.name, "Gerrit Cole");
    assert_eq!(pitcher.era.as_deref(), Some("3.21"));
    assert_eq!(pitcher.wins, Some(9));
    assert_eq!(pitcher.losses, Some(4));

    let live = &games[1];
    assert_eq!(live.game_pk, 745805);
    assert_eq!(live.status.abstract_game_state, "Live");
    assert!(live.teams.home.probable_pitcher.is_none());
}

#[test]
fn schedule_null_is_empty() {
    assert!(
        parse_schedule_json("null")
            .expect("null should parse")
            .is_empty()
    );
    assert!(parse_schedule_json("").expect("empty should parse").is_empty());
    assert!(
        parse_schedule_json(r#"{"dates": []}"#)
            .expect("no dates should parse")
            .is_empty()
    );
}

#[test]
fn parses_game_feed_fixture() {
    let raw = read_fixture("game_feed.json");
    let snapshot = parse_feed_json(&raw).expect("fixture should parse");
    assert_eq!(snapshot.total_runs, 5);
    assert_eq!(snapshot.detailed_state, "In Progress");
    assert_eq!(snapshot.inning, Some(5));
    assert_eq!(snapshot.is_top, Some(true));
}

#[test]
fn feed_null_is_default() {
    let snapshot = parse_feed_json("null").expect("null should parse");
    assert_eq!(snapshot.total_runs, 0);
    assert!(snapshot.detailed_state.is_empty());
    assert!(snapshot.inning.is_none());
    assert!(snapshot.is_top.is_none());
}

#[test]
fn feed_without_linescore_counts_zero_runs() {
    let raw = r#"{"gameData": {"status": {"abstractGameState": "Preview"}}, "liveData": {}}"#;
    let snapshot = parse_feed_json(raw).expect("should parse");
    assert_eq!(snapshot.total_runs, 0);
    assert_eq!(snapshot.detailed_state, "Preview");
}
