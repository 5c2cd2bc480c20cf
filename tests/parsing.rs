use std::fs;
use std::path::PathBuf;

use matchday::football_fetch::{
    group_by_competition, parse_matches_json, parse_standings_json, total_standings,
};
use matchday::news_fetch::parse_news_json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_matches_fixture() {
    let raw = read_fixture("matches.json");
    let resp = parse_matches_json(&raw).expect("fixture should parse");
    assert_eq!(resp.matches.len(), 7);

    let first = &resp.matches[0];
    assert_eq!(first.competition.code, "SA");
    assert_eq!(first.utc_date, "2024-03-16T19:45:00Z");
    assert_eq!(first.home_team.display_name(), "Inter");
    assert_eq!(first.away_team.display_name(), "Napoli");
    assert!(first.score.full_time.home.is_none());

    let finished = &resp.matches[1];
    assert_eq!(finished.status, "FINISHED");
    assert_eq!(finished.score.full_time.home, Some(2));
    assert_eq!(finished.score.full_time.away, Some(1));
}

#[test]
fn grouping_drops_unknown_competitions() {
    let raw = read_fixture("matches.json");
    let resp = parse_matches_json(&raw).expect("fixture should parse");
    let groups = group_by_competition(resp.matches);

    let codes: Vec<&str> = groups.iter().map(|g| g.code.as_str()).collect();
    assert!(!codes.contains(&"XX"), "unrecognized competition should be dropped");

    let pl = groups
        .iter()
        .find(|g| g.code == "PL")
        .expect("PL group should survive");
    assert_eq!(pl.matches.len(), 3);
}

#[test]
fn groups_are_sorted_by_country_then_name() {
    let raw = read_fixture("matches.json");
    let resp = parse_matches_json(&raw).expect("fixture should parse");
    let groups = group_by_competition(resp.matches);

    // England < Germany < Italy, regardless of upstream order.
    let codes: Vec<&str> = groups.iter().map(|g| g.code.as_str()).collect();
    assert_eq!(codes, vec!["PL", "BL1", "SA"]);
}

#[test]
fn standings_keep_only_the_total_table() {
    let raw = read_fixture("standings.json");
    let resp = parse_standings_json(&raw).expect("fixture should parse");
    assert_eq!(resp.standings.len(), 3);

    let tables = total_standings(resp);
    assert_eq!(tables.len(), 1);

    let table = &tables[0];
    assert_eq!(table.standing.kind, "TOTAL");
    let competition = table.competition.as_ref().expect("competition is attached");
    assert_eq!(competition.name, "Premier League");

    let leader = &table.standing.table[0];
    assert_eq!(leader.position, 1);
    assert_eq!(leader.team.name, "Liverpool FC");
    assert_eq!(leader.played_games, 28);
    assert_eq!(leader.points, 64);
    assert_eq!(leader.goal_difference, 39);
}

#[test]
fn parses_news_fixture() {
    let raw = read_fixture("news.json");
    let resp = parse_news_json(&raw).expect("fixture should parse");
    assert_eq!(resp.articles.len(), 2);

    let first = &resp.articles[0];
    assert_eq!(first.source.name, "Football Daily");
    assert_eq!(first.published_at, "2024-03-15T18:30:00Z");
    assert!(first.description.is_some());

    // Absent fields downgrade to defaults instead of failing the page.
    let second = &resp.articles[1];
    assert!(second.description.is_none());
}

#[test]
fn malformed_payloads_are_permanent_errors() {
    let err = parse_matches_json("not json").unwrap_err();
    assert!(!err.is_transient());

    let err = parse_standings_json("{\"standings\": 7}").unwrap_err();
    assert!(!err.is_transient());
}

#[test]
fn empty_objects_decode_to_empty_collections() {
    assert!(parse_matches_json("{}").expect("tolerant decode").matches.is_empty());
    assert!(parse_news_json("{}").expect("tolerant decode").articles.is_empty());
    let resp = parse_standings_json("{}").expect("tolerant decode");
    assert!(resp.standings.is_empty());
    assert!(resp.competition.is_none());
}
