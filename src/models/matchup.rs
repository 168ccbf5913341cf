//! Weekly matchup entries: one team's view of one week's game.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{SeasonId, TeamId};
use crate::identity::normalize_team_name;

/// One side of a matchup summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupSide {
    pub team_id: Option<TeamId>,
    pub team_name: String,
    /// Parsed score; None when the payload value was blank or unparsable
    pub score: Option<f64>,
}

impl MatchupSide {
    pub fn new(team_id: Option<TeamId>, team_name: impl Into<String>, score: Option<f64>) -> Self {
        Self {
            team_id,
            team_name: team_name.into(),
            score,
        }
    }

}

/// Both sides of a game as reported in a weekly entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupSummary {
    pub team1: MatchupSide,
    pub team2: MatchupSide,
}

fn sorted_pair<T: Ord>(a: T, b: T) -> (T, T) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Identities shared by the two entries describing the same game.
///
/// The team-id pair is set only when both sides carry an id. The name pair
/// is set whenever both sides have a usable name, so a mirrored entry that
/// lost one id still pairs up with its twin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameKey {
    ids: Option<(TeamId, TeamId)>,
    names: Option<(String, String)>,
}

impl MatchupSummary {
    /// Order-independent identity of this game.
    pub fn game_key(&self) -> GameKey {
        let ids = match (&self.team1.team_id, &self.team2.team_id) {
            (Some(a), Some(b)) => Some(sorted_pair(a.clone(), b.clone())),
            _ => None,
        };
        let a = normalize_team_name(&self.team1.team_name);
        let b = normalize_team_name(&self.team2.team_name);
        let names = (!a.is_empty() && !b.is_empty()).then(|| sorted_pair(a, b));
        GameKey { ids, names }
    }
}

/// Games already counted within one week.
#[derive(Debug, Default)]
pub struct SeenGames {
    ids: HashSet<(TeamId, TeamId)>,
    names: HashSet<(String, String)>,
}

impl SeenGames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a game. Returns false when its id pair or its name pair was
    /// already seen this week.
    pub fn insert(&mut self, key: GameKey) -> bool {
        let seen = key.ids.as_ref().is_some_and(|ids| self.ids.contains(ids))
            || key.names.as_ref().is_some_and(|names| self.names.contains(names));
        if let Some(ids) = key.ids {
            self.ids.insert(ids);
        }
        if let Some(names) = key.names {
            self.names.insert(names);
        }
        !seen
    }
}

/// The entry team's weekly totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamTotals {
    pub total_points: Option<f64>,
    pub total_projected: Option<f64>,
    pub bench_points: Option<f64>,
    pub bench_projected: Option<f64>,
}

/// Lineup slot of a rostered player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterSlot {
    Starter,
    Bench,
    #[serde(other)]
    Other,
}

/// A rostered player for the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSpot {
    pub player_id: String,
    pub player_name: String,
    pub position: String,
    pub nfl_team: String,
    pub points: Option<f64>,
    pub slot: RosterSlot,
}

/// One team's view of one week's game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMatchupEntry {
    pub season: SeasonId,
    pub week: u32,
    /// The team this entry describes
    pub team_id: Option<TeamId>,
    pub matchup: MatchupSummary,
    pub totals: TeamTotals,
    pub roster: Vec<RosterSpot>,
}

impl WeeklyMatchupEntry {
    /// Create an entry with empty totals and roster.
    pub fn new(season: SeasonId, week: u32, team_id: Option<TeamId>, matchup: MatchupSummary) -> Self {
        Self {
            season,
            week,
            team_id,
            matchup,
            totals: TeamTotals::default(),
            roster: Vec::new(),
        }
    }

    /// The matchup side describing this entry's own team.
    pub fn own_side(&self) -> &MatchupSide {
        match (&self.team_id, &self.matchup.team2.team_id) {
            (Some(own), Some(team2)) if own == team2 => &self.matchup.team2,
            _ => &self.matchup.team1,
        }
    }
}
