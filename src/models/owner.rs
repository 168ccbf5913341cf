//! League owners and their career-wide identity.

use serde::{Deserialize, Serialize};

use super::{OwnerId, SeasonId, WinLossRecord};

/// An owner: the stable identity behind every team name they ever used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    /// Unique identifier (manager name)
    pub id: OwnerId,

    /// Display name of the manager
    pub manager_name: String,

    /// Every team display name this owner has used
    pub team_names: Vec<String>,

    /// Seasons this owner was in the league
    pub active_seasons: Vec<SeasonId>,

    /// Precomputed career record, when the roster payload carries one
    pub record: Option<WinLossRecord>,

    pub points_for: Option<f64>,
    pub points_against: Option<f64>,
    pub championships: u32,
    pub playoff_appearances: u32,
}

impl Owner {
    /// Create an owner with no history.
    pub fn new(id: OwnerId) -> Self {
        let manager_name = id.as_str().to_string();
        Self {
            id,
            manager_name,
            team_names: Vec::new(),
            active_seasons: Vec::new(),
            record: None,
            points_for: None,
            points_against: None,
            championships: 0,
            playoff_appearances: 0,
        }
    }

    /// Add a team name to this owner.
    pub fn with_team_name(mut self, name: impl Into<String>) -> Self {
        self.team_names.push(name.into());
        self
    }

    /// Add an active season.
    pub fn with_season(mut self, season: SeasonId) -> Self {
        self.active_seasons.push(season);
        self
    }

    /// Check whether the owner was active in a season.
    pub fn was_active_in(&self, season: SeasonId) -> bool {
        self.active_seasons.contains(&season)
    }
}
