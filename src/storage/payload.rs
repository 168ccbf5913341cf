//! Raw JSON payload shapes and their conversion into typed models.
//!
//! Payload numbers arrive as numbers or as decimal strings and may be blank.
//! Everything is parsed here, once; unparsable values become `None` rather
//! than propagating NaN into the engine.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{
    parse_rank, LeagueData, MatchupSide, MatchupSummary, Owner, OwnerId, RosterSlot, RosterSpot,
    SeasonId, SeasonMatchups, SeasonMetadata, SeasonStandings, SeasonStandingsEntry, TeamId,
    TeamTotals, WeekEntries, WeeklyMatchupEntry, WinLossRecord,
};
use crate::parse_week_key;

/// A scalar that may be a JSON number, string or boolean.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl RawValue {
    /// Finite numeric value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n).filter(|v| v.is_finite()),
            RawValue::Text(s) => parse_score(s),
            RawValue::Flag(_) => None,
        }
    }

    /// Non-negative whole count, rounded.
    pub fn as_count(&self) -> Option<u32> {
        self.as_f64()
            .filter(|v| *v >= 0.0 && *v <= u32::MAX as f64)
            .map(|v| v.round() as u32)
    }

    /// Text form; numbers are written without a trailing `.0`.
    pub fn as_text(&self) -> String {
        match self {
            RawValue::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
            RawValue::Flag(b) => b.to_string(),
        }
    }
}

fn f64_of(value: &Option<RawValue>) -> Option<f64> {
    value.as_ref().and_then(RawValue::as_f64)
}

fn count_of(value: &Option<RawValue>) -> Option<u32> {
    value.as_ref().and_then(RawValue::as_count)
}

fn text_of(value: &Option<RawValue>) -> String {
    value.as_ref().map(RawValue::as_text).unwrap_or_default()
}

/// Parse a decimal score string. Blank, unparsable and non-finite input
/// yields None.
pub fn parse_score(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ── Owners ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OwnerPayload {
    pub manager_name: Option<String>,
    pub team_names: Vec<String>,
    pub active_seasons: Vec<RawValue>,
    pub wins: Option<RawValue>,
    pub losses: Option<RawValue>,
    pub ties: Option<RawValue>,
    pub points_for: Option<RawValue>,
    pub points_against: Option<RawValue>,
    pub championships: Option<RawValue>,
    pub playoff_appearances: Option<RawValue>,
}

// ── Standings ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerDetailsPayload {
    pub manager_name: Option<String>,
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecordPayload {
    pub win: Option<RawValue>,
    pub loss: Option<RawValue>,
    pub tie: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointsPayload {
    pub points_for: Option<RawValue>,
    pub points_against: Option<RawValue>,
    pub high_points: Option<RawValue>,
    pub low_points: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RanksPayload {
    pub playoff_rank: Option<RawValue>,
    pub regular_season_rank: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransactionsPayload {
    pub moves: Option<RawValue>,
    pub trades: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StandingsPayload {
    pub player_details: PlayerDetailsPayload,
    pub record: RecordPayload,
    pub points: PointsPayload,
    pub ranks: RanksPayload,
    pub transactions: TransactionsPayload,
}

// ── Weekly matchups ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchupPayload {
    pub team1_id: Option<RawValue>,
    pub team1_name: Option<String>,
    pub team1_score: Option<RawValue>,
    pub team2_id: Option<RawValue>,
    pub team2_name: Option<String>,
    pub team2_score: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TotalsPayload {
    pub total_points: Option<RawValue>,
    pub total_projected: Option<RawValue>,
    pub bench_points: Option<RawValue>,
    pub bench_projected: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RosterPayload {
    pub player_id: Option<RawValue>,
    pub player_name: Option<String>,
    pub position: Option<String>,
    pub nfl_team: Option<String>,
    pub points: Option<RawValue>,
    pub slot: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchupEntryPayload {
    pub season: Option<RawValue>,
    pub week: Option<RawValue>,
    pub team_id: Option<RawValue>,
    pub matchup: MatchupPayload,
    pub team1_totals: TotalsPayload,
    pub team1_roster: Vec<RosterPayload>,
}

/// One season's weekly file: week key → team key → entry.
pub type SeasonMatchupsPayload = BTreeMap<String, BTreeMap<String, MatchupEntryPayload>>;

// ── Season metadata ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeasonMetadataPayload {
    pub regular_season_end_week: Option<RawValue>,
    pub season_end_week: Option<RawValue>,
    pub has_full_historical_details: Option<bool>,
}

/// All raw payloads, as handed over by the loading layer.
#[derive(Debug, Clone, Default)]
pub struct LeaguePayloads {
    pub owners: BTreeMap<String, OwnerPayload>,
    pub standings: BTreeMap<String, BTreeMap<String, StandingsPayload>>,
    pub matchups: BTreeMap<String, SeasonMatchupsPayload>,
    pub seasons: BTreeMap<String, SeasonMetadataPayload>,
}

impl LeaguePayloads {
    /// Convert every payload into typed models, skipping what cannot be keyed.
    pub fn into_league_data(self) -> LeagueData {
        let data = LeagueData {
            owners: convert_owners(self.owners),
            standings: convert_standings(self.standings),
            matchups: self
                .matchups
                .into_iter()
                .filter_map(|(key, weeks)| {
                    let season = parse_season_key(&key, "matchups")?;
                    Some((season, convert_season_matchups(season, weeks)))
                })
                .collect(),
            metadata: convert_metadata(self.seasons),
        };

        debug!(
            "Converted payloads: {} owners, {} standings seasons, {} matchup seasons, {} metadata seasons",
            data.owners.len(),
            data.standings.len(),
            data.matchups.len(),
            data.metadata.len()
        );
        data
    }
}

fn parse_season_key(key: &str, what: &str) -> Option<SeasonId> {
    match key.parse::<SeasonId>() {
        Ok(season) => Some(season),
        Err(_) => {
            warn!("Skipping {} entry with non-numeric season key '{}'", what, key);
            None
        }
    }
}

/// The roster's career record. Absent when none of wins, losses or ties
/// is given.
fn roster_record(raw: &OwnerPayload) -> Option<WinLossRecord> {
    let (wins, losses, ties) = (count_of(&raw.wins), count_of(&raw.losses), count_of(&raw.ties));
    if wins.is_none() && losses.is_none() && ties.is_none() {
        return None;
    }
    Some(WinLossRecord::new(
        wins.unwrap_or(0),
        losses.unwrap_or(0),
        ties.unwrap_or(0),
    ))
}

/// Convert the owner roster.
pub fn convert_owners(payload: BTreeMap<String, OwnerPayload>) -> BTreeMap<OwnerId, Owner> {
    payload
        .into_iter()
        .filter_map(|(key, raw)| {
            if key.trim().is_empty() {
                warn!("Skipping owner with blank id");
                return None;
            }
            let id = OwnerId::new(key.trim());
            let active_seasons = raw
                .active_seasons
                .iter()
                .filter_map(|s| s.as_text().parse::<SeasonId>().ok())
                .collect();
            let record = roster_record(&raw);

            let owner = Owner {
                manager_name: raw
                    .manager_name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| id.as_str().to_string()),
                team_names: raw.team_names,
                active_seasons,
                record,
                points_for: f64_of(&raw.points_for),
                points_against: f64_of(&raw.points_against),
                championships: count_of(&raw.championships).unwrap_or(0),
                playoff_appearances: count_of(&raw.playoff_appearances).unwrap_or(0),
                id: id.clone(),
            };
            Some((id, owner))
        })
        .collect()
}

/// Convert season standings.
pub fn convert_standings(
    payload: BTreeMap<String, BTreeMap<String, StandingsPayload>>,
) -> BTreeMap<SeasonId, SeasonStandings> {
    payload
        .into_iter()
        .filter_map(|(key, owners)| {
            let season = parse_season_key(&key, "standings")?;
            let entries = owners
                .into_iter()
                .filter(|(owner_key, _)| !owner_key.trim().is_empty())
                .map(|(owner_key, raw)| {
                    let owner_id = OwnerId::new(owner_key.trim());
                    let entry = SeasonStandingsEntry {
                        team_name: raw.player_details.team_name.unwrap_or_default(),
                        manager_name: raw
                            .player_details
                            .manager_name
                            .filter(|n| !n.trim().is_empty())
                            .unwrap_or_else(|| owner_id.as_str().to_string()),
                        record: WinLossRecord::new(
                            count_of(&raw.record.win).unwrap_or(0),
                            count_of(&raw.record.loss).unwrap_or(0),
                            count_of(&raw.record.tie).unwrap_or(0),
                        ),
                        points_for: f64_of(&raw.points.points_for).unwrap_or(0.0),
                        points_against: f64_of(&raw.points.points_against).unwrap_or(0.0),
                        high_points: count_of(&raw.points.high_points),
                        low_points: count_of(&raw.points.low_points),
                        playoff_rank: parse_rank(&text_of(&raw.ranks.playoff_rank)),
                        regular_season_rank: parse_rank(&text_of(&raw.ranks.regular_season_rank)),
                        moves: count_of(&raw.transactions.moves).unwrap_or(0),
                        trades: count_of(&raw.transactions.trades).unwrap_or(0),
                        owner_id: owner_id.clone(),
                    };
                    (owner_id, entry)
                })
                .collect();
            Some((season, entries))
        })
        .collect()
}

fn convert_side(id: &Option<RawValue>, name: &Option<String>, score: &Option<RawValue>) -> MatchupSide {
    MatchupSide::new(
        id.as_ref().and_then(|v| TeamId::parse(&v.as_text())),
        name.clone().unwrap_or_default(),
        f64_of(score),
    )
}

fn convert_roster_spot(raw: RosterPayload) -> RosterSpot {
    let slot = match raw.slot.as_deref().map(str::trim) {
        Some(s) if s.eq_ignore_ascii_case("starter") => RosterSlot::Starter,
        Some(s) if s.eq_ignore_ascii_case("bench") => RosterSlot::Bench,
        _ => RosterSlot::Other,
    };
    RosterSpot {
        player_id: text_of(&raw.player_id),
        player_name: raw.player_name.unwrap_or_default(),
        position: raw.position.unwrap_or_default(),
        nfl_team: raw.nfl_team.unwrap_or_default(),
        points: f64_of(&raw.points),
        slot,
    }
}

/// Convert one season's weekly matchup file.
pub fn convert_season_matchups(season: SeasonId, payload: SeasonMatchupsPayload) -> SeasonMatchups {
    let mut weeks = SeasonMatchups::new();

    for (week_key, teams) in payload {
        let Some(week) = parse_week_key(&week_key) else {
            warn!("Season {}: skipping unrecognized week key '{}'", season, week_key);
            continue;
        };

        let entries: WeekEntries = teams
            .into_iter()
            .map(|(team_key, raw)| {
                let m = &raw.matchup;
                let matchup = MatchupSummary {
                    team1: convert_side(&m.team1_id, &m.team1_name, &m.team1_score),
                    team2: convert_side(&m.team2_id, &m.team2_name, &m.team2_score),
                };
                let team_id = raw
                    .team_id
                    .as_ref()
                    .and_then(|v| TeamId::parse(&v.as_text()))
                    .or_else(|| team_key.strip_prefix("teamId-").and_then(TeamId::parse));

                let mut entry = WeeklyMatchupEntry::new(season, week, team_id, matchup);
                entry.totals = TeamTotals {
                    total_points: f64_of(&raw.team1_totals.total_points),
                    total_projected: f64_of(&raw.team1_totals.total_projected),
                    bench_points: f64_of(&raw.team1_totals.bench_points),
                    bench_projected: f64_of(&raw.team1_totals.bench_projected),
                };
                entry.roster = raw.team1_roster.into_iter().map(convert_roster_spot).collect();
                (team_key, entry)
            })
            .collect();

        weeks.entry(week).or_default().extend(entries);
    }

    weeks
}

/// Convert season metadata.
pub fn convert_metadata(
    payload: BTreeMap<String, SeasonMetadataPayload>,
) -> BTreeMap<SeasonId, SeasonMetadata> {
    payload
        .into_iter()
        .filter_map(|(key, raw)| {
            let season = parse_season_key(&key, "season metadata")?;
            let Some(regular_end) = count_of(&raw.regular_season_end_week) else {
                warn!("Season {}: metadata has no regularSeasonEndWeek, skipping", season);
                return None;
            };
            let season_end = count_of(&raw.season_end_week).unwrap_or(regular_end);
            Some((
                season,
                SeasonMetadata::new(
                    regular_end,
                    season_end,
                    raw.has_full_historical_details.unwrap_or(false),
                ),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("104.40"), Some(104.4));
        assert_eq!(parse_score(" 66.7 "), Some(66.7));
        assert_eq!(parse_score(""), None);
        assert_eq!(parse_score("--"), None);
        assert_eq!(parse_score("NaN"), None);
        assert_eq!(parse_score("inf"), None);
    }

    #[test]
    fn test_raw_value_accepts_numbers_and_strings() {
        let values: Vec<RawValue> = serde_json::from_value(json!([7, "7.5", "", true])).unwrap();
        assert_eq!(values[0].as_f64(), Some(7.0));
        assert_eq!(values[1].as_f64(), Some(7.5));
        assert_eq!(values[2].as_f64(), None);
        assert_eq!(values[3].as_f64(), None);
        assert_eq!(values[0].as_text(), "7");
        assert_eq!(values[1].as_count(), Some(8));
    }

    #[test]
    fn test_convert_owners() {
        let payload: BTreeMap<String, OwnerPayload> = serde_json::from_value(json!({
            "Dana": {
                "managerName": "Dana",
                "teamNames": ["Hedd Hunters"],
                "activeSeasons": [2006, "2007"],
                "wins": 20, "losses": "6", "ties": 0,
                "championships": 1
            },
            "Kim": { "teamNames": ["New Blood"] },
            " ": { "teamNames": ["Ghost"] }
        }))
        .unwrap();

        let owners = convert_owners(payload);
        assert_eq!(owners.len(), 2);
        assert_eq!(owners[&OwnerId::from("Kim")].record, None);
        let dana = &owners[&OwnerId::from("Dana")];
        assert_eq!(dana.active_seasons, vec![SeasonId(2006), SeasonId(2007)]);
        assert_eq!(dana.record, Some(WinLossRecord::new(20, 6, 0)));
        assert_eq!(dana.championships, 1);
        assert_eq!(dana.points_for, None);
    }

    #[test]
    fn test_convert_standings_parses_ranks_and_points() {
        let payload = serde_json::from_value(json!({
            "2006": {
                "Dana": {
                    "playerDetails": {"managerName": "Dana", "teamName": "Hedd Hunters"},
                    "record": {"win": 9, "loss": 4, "tie": 0},
                    "points": {"pointsFor": "1450.20", "pointsAgainst": 1301.7, "highPoints": 3},
                    "ranks": {"playoffRank": "1", "regularSeasonRank": ""},
                    "transactions": {"moves": 14, "trades": 2}
                }
            },
            "bogus": {}
        }))
        .unwrap();

        let standings = convert_standings(payload);
        assert_eq!(standings.len(), 1);
        let entry = &standings[&SeasonId(2006)][&OwnerId::from("Dana")];
        assert_eq!(entry.team_name, "Hedd Hunters");
        assert_eq!(entry.record, WinLossRecord::new(9, 4, 0));
        assert!((entry.points_for - 1450.2).abs() < 1e-9);
        assert_eq!(entry.high_points, Some(3));
        assert_eq!(entry.low_points, None);
        assert_eq!(entry.playoff_rank, Some(1));
        assert_eq!(entry.regular_season_rank, None);
        assert_eq!(entry.moves, 14);
    }

    #[test]
    fn test_convert_season_matchups() {
        let payload: SeasonMatchupsPayload = serde_json::from_value(json!({
            "week14": {
                "teamId-3": {
                    "season": 2006, "week": 14, "teamId": 3,
                    "matchup": {
                        "team1Id": 3, "team1Name": "Hedd Hunters", "team1Score": "104.40",
                        "team2Id": 7, "team2Name": "Desi Pride", "team2Score": "66.70"
                    },
                    "team1Totals": {"totalPoints": "104.40", "benchPoints": "31.5"},
                    "team1Roster": [
                        {"playerId": 1, "playerName": "QB One", "position": "QB",
                         "nflTeam": "KC", "points": "22.1", "slot": "starter"}
                    ]
                }
            },
            "playoffs": {}
        }))
        .unwrap();

        let weeks = convert_season_matchups(SeasonId(2006), payload);
        assert_eq!(weeks.len(), 1);
        let entry = &weeks[&14]["teamId-3"];
        assert_eq!(entry.team_id, TeamId::parse("3"));
        assert_eq!(entry.matchup.team1.score, Some(104.4));
        assert_eq!(entry.matchup.team2.team_id, TeamId::parse("7"));
        assert_eq!(entry.totals.bench_points, Some(31.5));
        assert_eq!(entry.roster[0].slot, RosterSlot::Starter);
        assert_eq!(entry.roster[0].player_id, "1");
    }

    #[test]
    fn test_team_id_falls_back_to_key() {
        let payload: SeasonMatchupsPayload = serde_json::from_value(json!({
            "week1": { "teamId-5": { "matchup": {"team1Name": "A", "team2Name": "B"} } }
        }))
        .unwrap();
        let weeks = convert_season_matchups(SeasonId(2010), payload);
        assert_eq!(weeks[&1]["teamId-5"].team_id, TeamId::parse("5"));
    }

    #[test]
    fn test_convert_metadata() {
        let payload = serde_json::from_value(json!({
            "2006": {"regularSeasonEndWeek": 13, "seasonEndWeek": 16, "hasFullHistoricalDetails": true},
            "2007": {"seasonEndWeek": 16}
        }))
        .unwrap();

        let meta = convert_metadata(payload);
        assert_eq!(meta.len(), 1);
        assert_eq!(meta[&SeasonId(2006)], SeasonMetadata::new(13, 16, true));
    }
}
