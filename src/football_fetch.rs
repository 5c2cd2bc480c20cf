use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::error::UpstreamError;
use crate::http_client::get_text;
use crate::leagues;

const AUTH_HEADER: &str = "X-Auth-Token";

#[derive(Debug, Clone, Deserialize)]
pub struct MatchesResponse {
    #[serde(default)]
    pub matches: Vec<Match>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Match {
    pub competition: Competition,
    #[serde(rename = "utcDate", default)]
    pub utc_date: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "homeTeam", default)]
    pub home_team: Team,
    #[serde(rename = "awayTeam", default)]
    pub away_team: Team,
    #[serde(default)]
    pub score: Score,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Competition {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub emblem: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "shortName", default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub crest: Option<String>,
}

impl Team {
    pub fn display_name(&self) -> &str {
        self.short_name.as_deref().filter(|s| !s.is_empty()).unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Score {
    #[serde(rename = "fullTime", default)]
    pub full_time: ScorePair,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScorePair {
    #[serde(default)]
    pub home: Option<i64>,
    #[serde(default)]
    pub away: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandingsResponse {
    #[serde(default)]
    pub competition: Option<Competition>,
    #[serde(default)]
    pub standings: Vec<Standing>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Standing {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub table: Vec<TableRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub team: Team,
    #[serde(rename = "playedGames", default)]
    pub played_games: u32,
    #[serde(default)]
    pub won: u32,
    #[serde(default)]
    pub draw: u32,
    #[serde(default)]
    pub lost: u32,
    #[serde(rename = "goalDifference", default)]
    pub goal_difference: i64,
    #[serde(default)]
    pub points: i64,
}

/// Matches for one recognized competition, in upstream order.
#[derive(Debug, Clone)]
pub struct CompetitionGroup {
    pub code: String,
    pub competition: Competition,
    pub matches: Vec<Match>,
}

/// The overall table for a league, paired with the competition it belongs
/// to.
#[derive(Debug, Clone)]
pub struct LeagueTable {
    pub competition: Option<Competition>,
    pub standing: Standing,
}

pub async fn fetch_matches(
    client: &Client,
    config: &Config,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Result<MatchesResponse, UpstreamError> {
    let key = config
        .football_api_key
        .as_deref()
        .ok_or(UpstreamError::MissingKey("FOOTBALL_DATA_API_KEY"))?;
    let url = format!("{}/matches", config.football_api_url);
    let body = get_text(
        client
            .get(&url)
            .header(AUTH_HEADER, key)
            .query(&[
                ("dateFrom", date_from.to_string()),
                ("dateTo", date_to.to_string()),
            ]),
    )
    .await?;
    parse_matches_json(&body)
}

pub async fn fetch_standings(
    client: &Client,
    config: &Config,
    code: &str,
) -> Result<StandingsResponse, UpstreamError> {
    let key = config
        .football_api_key
        .as_deref()
        .ok_or(UpstreamError::MissingKey("FOOTBALL_DATA_API_KEY"))?;
    let url = format!("{}/competitions/{}/standings", config.football_api_url, code);
    let body = get_text(client.get(&url).header(AUTH_HEADER, key)).await?;
    parse_standings_json(&body)
}

pub fn parse_matches_json(raw: &str) -> Result<MatchesResponse, UpstreamError> {
    Ok(serde_json::from_str(raw)?)
}

pub fn parse_standings_json(raw: &str) -> Result<StandingsResponse, UpstreamError> {
    Ok(serde_json::from_str(raw)?)
}

/// Bucket matches by competition code, dropping competitions the catalog
/// does not know, then order the groups by the catalog's (country, name).
pub fn group_by_competition(matches: Vec<Match>) -> Vec<CompetitionGroup> {
    let mut groups: Vec<CompetitionGroup> = Vec::new();
    for m in matches {
        let code = m.competition.code.clone();
        if !leagues::contains(&code) {
            continue;
        }
        match groups.iter().position(|g| g.code == code) {
            Some(idx) => groups[idx].matches.push(m),
            None => groups.push(CompetitionGroup {
                code,
                competition: m.competition.clone(),
                matches: vec![m],
            }),
        }
    }

    groups.sort_by_key(|group| {
        leagues::get(&group.code)
            .map(|league| (league.country, league.name))
            .unwrap_or(("", ""))
    });
    groups
}

/// Keep only the overall table; the provider also sends HOME/AWAY splits.
pub fn total_standings(resp: StandingsResponse) -> Vec<LeagueTable> {
    let competition = resp.competition;
    resp.standings
        .into_iter()
        .filter(|standing| standing.kind == "TOTAL")
        .map(|standing| LeagueTable {
            competition: competition.clone(),
            standing,
        })
        .collect()
}
