//! Shared fixtures for unit tests.

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use crate::api::state::AppState;
use crate::config::AnalysisConfig;
use crate::league::League;
use crate::models::{
    LeagueData, MatchupSide, MatchupSummary, Owner, OwnerId, SeasonId, TeamId, WeeklyMatchupEntry,
};
use crate::storage::payload::LeaguePayloads;
use crate::storage::{load_league, parse_score, StorageConfig};

/// A weekly entry for `side1`'s team. Sides are `(team id, name, score)`.
pub(crate) fn game(
    season: u16,
    week: u32,
    side1: (&str, &str, &str),
    side2: (&str, &str, &str),
) -> WeeklyMatchupEntry {
    let side = |(id, name, score): (&str, &str, &str)| {
        MatchupSide::new(TeamId::parse(id), name, parse_score(score))
    };
    WeeklyMatchupEntry::new(
        SeasonId(season),
        week,
        TeamId::parse(side1.0),
        MatchupSummary {
            team1: side(side1),
            team2: side(side2),
        },
    )
}

/// Owner id generated by [`league`] for a team name.
pub(crate) fn owner_for(team: &str) -> OwnerId {
    OwnerId::new(format!("{} owner", team))
}

/// League holding the given entries, with one owner per distinct team name.
pub(crate) fn league(entries: &[WeeklyMatchupEntry]) -> LeagueData {
    let mut data = LeagueData::default();

    for entry in entries {
        let key = format!(
            "teamId-{}",
            entry
                .team_id
                .as_ref()
                .map(|t| t.to_string())
                .unwrap_or_else(|| entry.own_side().team_name.clone())
        );
        data.matchups
            .entry(entry.season)
            .or_default()
            .entry(entry.week)
            .or_default()
            .insert(key, entry.clone());

        for side in [&entry.matchup.team1, &entry.matchup.team2] {
            if side.team_name.trim().is_empty() {
                continue;
            }
            let id = owner_for(&side.team_name);
            let owner = data
                .owners
                .entry(id.clone())
                .or_insert_with(|| Owner::new(id).with_team_name(side.team_name.clone()));
            if !owner.was_active_in(entry.season) {
                owner.active_seasons.push(entry.season);
            }
        }
    }

    data
}

fn both_sides(
    week: u32,
    a: (u32, &str, &str),
    b: (u32, &str, &str),
) -> Vec<(String, Value)> {
    let entry = |own: (u32, &str, &str), other: (u32, &str, &str)| {
        json!({
            "season": 2006,
            "week": week,
            "teamId": own.0,
            "matchup": {
                "team1Id": own.0, "team1Name": own.1, "team1Score": own.2,
                "team2Id": other.0, "team2Name": other.1, "team2Score": other.2
            },
            "team1Totals": {"totalPoints": own.2, "benchPoints": "20.00"},
            "team1Roster": []
        })
    };
    vec![
        (format!("teamId-{}", a.0), entry(a, b)),
        (format!("teamId-{}", b.0), entry(b, a)),
    ]
}

fn week_value(games: Vec<Vec<(String, Value)>>) -> Value {
    let map: serde_json::Map<String, Value> = games.into_iter().flatten().collect();
    Value::Object(map)
}

/// Raw payloads for the sample league:
///
/// - 2005: standings only (no weekly data, metadata without full detail)
/// - 2006: weeks 13 and 14 with both entries per game, full detail
///
/// Week 13: Hedd Hunters 95.00 - Da Squad 101.50, Desi Pride 88.20 -
/// Cleveland Steamers 88.20. Week 14: Hedd Hunters 104.40 - Desi Pride
/// 66.70, Da Squad 118.70 - Cleveland Steamers 113.00.
pub(crate) fn sample_json() -> (Value, Value, Value, Value) {
    let owners = json!({
        "Dana": {"managerName": "Dana", "teamNames": ["Hedd Hunters"],
                 "activeSeasons": [2005, 2006], "wins": 6, "losses": 9, "ties": 0,
                 "championships": 1},
        "Priya": {"managerName": "Priya", "teamNames": ["Desi Pride"],
                  "activeSeasons": [2005, 2006], "wins": 7, "losses": 7, "ties": 1},
        "Lee": {"managerName": "Lee", "teamNames": ["Big Dogs", "Da Squad"],
                "activeSeasons": [2005, 2006], "wins": 10, "losses": 5, "ties": 0},
        "Sam": {"managerName": "Sam", "teamNames": ["Big Dogs", "Cleveland Steamers"],
                "activeSeasons": [2005, 2006], "wins": 6, "losses": 8, "ties": 1}
    });

    let row = |team: &str, w: u32, l: u32, t: u32, pf: f64, pa: f64, rank: &str| {
        json!({
            "playerDetails": {"managerName": "", "teamName": team},
            "record": {"win": w, "loss": l, "tie": t},
            "points": {"pointsFor": pf, "pointsAgainst": pa},
            "ranks": {"playoffRank": "", "regularSeasonRank": rank},
            "transactions": {"moves": 3, "trades": 0}
        })
    };
    let standings = json!({
        "2005": {
            "Dana": row("Hedd Hunters", 5, 8, 0, 1100.0, 1180.0, "4"),
            "Priya": row("Desi Pride", 7, 6, 0, 1150.0, 1120.0, "2"),
            "Lee": row("Big Dogs", 8, 5, 0, 1200.0, 1100.0, "1"),
            "Sam": row("Cleveland Steamers", 6, 7, 0, 1120.0, 1170.0, "3")
        },
        "2006": {
            "Dana": row("Hedd Hunters", 1, 1, 0, 199.4, 168.2, "2"),
            "Priya": row("Desi Pride", 0, 1, 1, 154.9, 192.6, ""),
            "Lee": row("Da Squad", 2, 0, 0, 220.2, 208.0, "1"),
            "Sam": row("Cleveland Steamers", 0, 1, 1, 201.2, 206.9, "3")
        }
    });

    let seasons = json!({
        "2005": {"regularSeasonEndWeek": 13, "seasonEndWeek": 15, "hasFullHistoricalDetails": false},
        "2006": {"regularSeasonEndWeek": 14, "seasonEndWeek": 16, "hasFullHistoricalDetails": true}
    });

    let matchups_2006 = json!({
        "week13": week_value(vec![
            both_sides(13, (1, "Hedd Hunters", "95.00"), (2, "Da Squad", "101.50")),
            both_sides(13, (3, "Desi Pride", "88.20"), (4, "Cleveland Steamers", "88.20")),
        ]),
        "week14": week_value(vec![
            both_sides(14, (1, "Hedd Hunters", "104.40"), (3, "Desi Pride", "66.70")),
            both_sides(14, (2, "Da Squad", "118.70"), (4, "Cleveland Steamers", "113.00")),
        ]),
    });

    (owners, standings, seasons, matchups_2006)
}

pub(crate) fn sample_payloads() -> LeaguePayloads {
    let (owners, standings, seasons, matchups_2006) = sample_json();
    let mut payloads = LeaguePayloads {
        owners: serde_json::from_value(owners).expect("owners fixture"),
        standings: serde_json::from_value(standings).expect("standings fixture"),
        seasons: serde_json::from_value(seasons).expect("seasons fixture"),
        ..Default::default()
    };
    payloads.matchups.insert(
        "2006".to_string(),
        serde_json::from_value(matchups_2006).expect("matchups fixture"),
    );
    payloads
}

/// The sample league as typed data.
pub(crate) fn sample_league() -> LeagueData {
    sample_payloads().into_league_data()
}

/// Write the sample league into a data directory.
pub(crate) fn write_sample_data_dir(dir: &Path) -> StorageConfig {
    let config = StorageConfig::new(dir.to_path_buf());
    let (owners, standings, seasons, matchups_2006) = sample_json();

    std::fs::create_dir_all(config.matchups_dir()).expect("create matchups dir");
    for (path, value) in [
        (config.owners_path(), owners),
        (config.standings_path(), standings),
        (config.seasons_path(), seasons),
        (config.matchups_path("2006"), matchups_2006),
    ] {
        std::fs::write(&path, serde_json::to_string_pretty(&value).expect("serialize"))
            .expect("write fixture");
    }
    config
}

/// API state over the sample league written into `dir`.
pub(crate) fn sample_state(dir: &Path) -> AppState {
    let storage = write_sample_data_dir(dir);
    let data = load_league(&storage).expect("load sample league");
    AppState::new(storage, League::new(data, AnalysisConfig::default()))
}

pub(crate) async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty())).await
}

pub(crate) async fn post_json(app: Router, uri: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::empty()),
    )
    .await
}

async fn send(app: Router, request: axum::http::Result<Request<Body>>) -> (StatusCode, Value) {
    let resp = app
        .oneshot(request.expect("request"))
        .await
        .expect("response");
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body");
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}
