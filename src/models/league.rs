//! The in-memory league history all derived statistics are computed from.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use super::{Owner, OwnerId, SeasonId, SeasonMetadata, SeasonStandingsEntry, WeeklyMatchupEntry};

/// Entries for one week, keyed by the payload's team key (`teamId-<id>`).
pub type WeekEntries = BTreeMap<String, WeeklyMatchupEntry>;

/// Standings for one season, keyed by owner.
pub type SeasonStandings = BTreeMap<OwnerId, SeasonStandingsEntry>;

/// Weekly entries for one season, keyed by week number.
pub type SeasonMatchups = BTreeMap<u32, WeekEntries>;

/// The four source collections, read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct LeagueData {
    pub owners: BTreeMap<OwnerId, Owner>,
    pub standings: BTreeMap<SeasonId, SeasonStandings>,
    pub matchups: BTreeMap<SeasonId, SeasonMatchups>,
    pub metadata: BTreeMap<SeasonId, SeasonMetadata>,
}

impl LeagueData {
    /// Every season present in standings or weekly data.
    pub fn season_ids(&self) -> BTreeSet<SeasonId> {
        self.standings
            .keys()
            .chain(self.matchups.keys())
            .copied()
            .collect()
    }

    /// Whether any weekly entry exists for the season.
    pub fn has_weekly_data(&self, season: SeasonId) -> bool {
        self.matchups
            .get(&season)
            .map(|weeks| weeks.values().any(|entries| !entries.is_empty()))
            .unwrap_or(false)
    }

    /// Entries for one week in payload key order.
    pub fn week_entries(
        &self,
        season: SeasonId,
        week: u32,
    ) -> impl Iterator<Item = &WeeklyMatchupEntry> + '_ {
        self.matchups
            .get(&season)
            .and_then(|weeks| weeks.get(&week))
            .into_iter()
            .flat_map(|entries| entries.values())
    }

    /// Week numbers inside `weeks` that have entries for the season,
    /// ascending. Only weeks present in the data are visited.
    pub fn weeks_with_data(&self, season: SeasonId, weeks: RangeInclusive<u32>) -> Vec<u32> {
        if weeks.is_empty() {
            return Vec::new();
        }
        self.matchups
            .get(&season)
            .map(|season_weeks| {
                season_weeks
                    .range(weeks)
                    .filter(|(_, entries)| !entries.is_empty())
                    .map(|(week, _)| *week)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Seasons an owner took part in: the roster's active seasons, or, when
    /// the roster has none for them, the seasons they appear in standings.
    pub fn active_seasons(&self, owner: &OwnerId) -> Vec<SeasonId> {
        if let Some(o) = self.owners.get(owner) {
            if !o.active_seasons.is_empty() {
                let mut seasons = o.active_seasons.clone();
                seasons.sort();
                seasons.dedup();
                return seasons;
            }
        }

        self.standings
            .iter()
            .filter(|(_, entries)| entries.contains_key(owner))
            .map(|(season, _)| *season)
            .collect()
    }

    /// Every owner known to the roster or any season's standings.
    pub fn owner_ids(&self) -> BTreeSet<OwnerId> {
        self.owners
            .keys()
            .cloned()
            .chain(self.standings.values().flat_map(|s| s.keys().cloned()))
            .collect()
    }
}
