//! Derived statistics models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Outcome, OwnerId, SeasonId, WinLossRecord};

/// Which source a season's totals came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalsSource {
    /// Replayed weekly matchups
    Weekly,
    /// Season-end standings record
    Standings,
    /// Neither source had the owner
    Empty,
}

/// One owner's reconciled totals for one season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OwnerSeasonTotals {
    pub record: WinLossRecord,
    pub points_for: f64,
    pub points_against: f64,

    /// Weeks with the league's highest counted score
    pub weekly_highs: u32,

    /// Weeks with the league's lowest counted score
    pub weekly_lows: u32,

    pub source: TotalsSource,
}

impl OwnerSeasonTotals {
    /// Zero totals attributed to the given source.
    pub fn empty(source: TotalsSource) -> Self {
        Self {
            record: WinLossRecord::default(),
            points_for: 0.0,
            points_against: 0.0,
            weekly_highs: 0,
            weekly_lows: 0,
            source,
        }
    }
}

/// Per-owner totals for one season from a single source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonTotals {
    pub season: SeasonId,

    /// True iff at least one weekly game was counted
    pub has_regular_season_history: bool,

    pub totals_by_owner: BTreeMap<OwnerId, OwnerSeasonTotals>,
}

impl SeasonTotals {
    pub fn new(season: SeasonId) -> Self {
        Self {
            season,
            has_regular_season_history: false,
            totals_by_owner: BTreeMap::new(),
        }
    }

    pub fn get(&self, owner: &OwnerId) -> Option<&OwnerSeasonTotals> {
        self.totals_by_owner.get(owner)
    }
}

/// A scheduled game after deduplication and owner resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGame {
    pub season: SeasonId,
    pub week: u32,
    pub owner: OwnerId,
    pub opponent: OwnerId,
    pub score: f64,
    pub opponent_score: f64,
    /// Outcome from `owner`'s perspective
    pub outcome: Outcome,
}

/// One row of the all-time records table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllTimeRecordRow {
    pub owner: OwnerId,
    pub seasons_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub win_pct: f64,
    pub points_for: f64,
    pub points_against: f64,
}

impl AllTimeRecordRow {
    pub fn record(&self) -> WinLossRecord {
        WinLossRecord::new(self.wins, self.losses, self.ties)
    }
}

/// Career scoring consistency for one owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyRow {
    pub owner: OwnerId,
    pub seasons_included: u32,
    pub average_season_iqr: f64,
    pub average_ppg_std_dev: f64,
}

/// A value with its competition rank (1 = best).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedValue {
    pub owner: OwnerId,
    pub value: f64,
    pub rank: u32,
}

/// Actual versus Pythagorean expected wins for one owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LuckRow {
    pub owner: OwnerId,
    pub record: WinLossRecord,
    pub points_for: f64,
    pub points_against: f64,
    pub expected_wins: f64,

    /// Actual wins minus expected wins
    pub luck: f64,

    /// Rank by expected wins
    pub expected_rank: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_time_row_record() {
        let row = AllTimeRecordRow {
            owner: OwnerId::from("Dana"),
            seasons_played: 2,
            wins: 15,
            losses: 11,
            ties: 1,
            win_pct: 0.574,
            points_for: 2900.0,
            points_against: 2800.0,
        };
        assert_eq!(row.record(), WinLossRecord::new(15, 11, 1));
    }

    #[test]
    fn test_season_totals_serialization() {
        let mut totals = SeasonTotals::new(SeasonId(2006));
        totals.has_regular_season_history = true;
        totals.totals_by_owner.insert(
            OwnerId::from("Dana"),
            OwnerSeasonTotals::empty(TotalsSource::Weekly),
        );

        let json = serde_json::to_value(&totals).unwrap();
        assert_eq!(json["season"], 2006);
        assert_eq!(json["totals_by_owner"]["Dana"]["source"], "weekly");
    }
}
