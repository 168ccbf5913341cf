//! Owner identity resolution.
//!
//! Team display names change from season to season and are chosen freely
//! by owners, so the same name can belong to different owners in different
//! years. A [`TeamOwnerIndex`] maps normalized names to owners and
//! quarantines any name seen with more than one owner. Two flavors exist:
//!
//! - a career index built from the owner roster, used as a fallback;
//! - a season index built from one season's standings, preferred because it
//!   is exact for that year.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::models::{Owner, OwnerId, SeasonId, SeasonStandingsEntry};

/// Normalize a team display name for use as a map key.
pub fn normalize_team_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalized team name → owner map, plus the names that are ambiguous.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamOwnerIndex {
    owner_by_team: BTreeMap<String, OwnerId>,
    ambiguous_teams: BTreeSet<String>,
}

impl TeamOwnerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the career-wide fallback index from owner rosters.
    pub fn from_owners<'a>(owners: impl IntoIterator<Item = &'a Owner>) -> Self {
        let mut index = Self::new();
        for owner in owners {
            for name in &owner.team_names {
                index.insert(name, &owner.id);
            }
        }
        debug!(
            "Built career team index: {} names, {} ambiguous",
            index.owner_by_team.len(),
            index.ambiguous_teams.len()
        );
        index
    }

    /// Build a season-scoped index from that season's standings.
    pub fn from_standings<'a>(entries: impl IntoIterator<Item = &'a SeasonStandingsEntry>) -> Self {
        let mut index = Self::new();
        for entry in entries {
            index.insert(&entry.team_name, &entry.owner_id);
        }
        index
    }

    /// Record one (team name, owner) pair.
    pub fn insert(&mut self, team_name: &str, owner: &OwnerId) {
        let key = normalize_team_name(team_name);
        if key.is_empty() || self.ambiguous_teams.contains(&key) {
            return;
        }

        match self.owner_by_team.get(&key) {
            Some(existing) if existing != owner => {
                debug!(
                    "Team name '{}' used by both {} and {}; marking ambiguous",
                    key, existing, owner
                );
                self.owner_by_team.remove(&key);
                self.ambiguous_teams.insert(key);
            }
            Some(_) => {}
            None => {
                self.owner_by_team.insert(key, owner.clone());
            }
        }
    }

    /// Look up an already-normalized name.
    pub fn get(&self, normalized: &str) -> Option<&OwnerId> {
        self.owner_by_team.get(normalized)
    }

    pub fn is_ambiguous(&self, normalized: &str) -> bool {
        self.ambiguous_teams.contains(normalized)
    }

    pub fn owner_by_team(&self) -> &BTreeMap<String, OwnerId> {
        &self.owner_by_team
    }

    pub fn ambiguous_teams(&self) -> &BTreeSet<String> {
        &self.ambiguous_teams
    }

    pub fn is_empty(&self) -> bool {
        self.owner_by_team.is_empty() && self.ambiguous_teams.is_empty()
    }
}

/// The indices consulted when resolving one season's team names.
#[derive(Debug, Clone, Copy)]
pub struct OwnerIndices<'a> {
    /// Season-scoped index, when the season has standings
    pub season: Option<&'a TeamOwnerIndex>,
    /// Career-wide fallback index
    pub career: &'a TeamOwnerIndex,
}

impl<'a> OwnerIndices<'a> {
    pub fn new(season: Option<&'a TeamOwnerIndex>, career: &'a TeamOwnerIndex) -> Self {
        Self { season, career }
    }
}

/// Resolve a team display name to an owner.
///
/// The season index wins when it knows the name. A name ambiguous in the
/// index that would answer never resolves. Failures are reported once per
/// `season|week|reason|name`.
pub fn resolve_owner(
    season: SeasonId,
    week: u32,
    team_name: &str,
    indices: OwnerIndices<'_>,
    diagnostics: &Diagnostics,
) -> Option<OwnerId> {
    let key = normalize_team_name(team_name);
    if key.is_empty() {
        diagnostics.report(Diagnostic::BlankTeamName { season, week });
        return None;
    }

    if let Some(season_index) = indices.season {
        if season_index.is_ambiguous(&key) {
            diagnostics.report(Diagnostic::AmbiguousTeamMapping { season, week, name: key });
            return None;
        }
        if let Some(owner) = season_index.get(&key) {
            return Some(owner.clone());
        }
    }

    if indices.career.is_ambiguous(&key) {
        diagnostics.report(Diagnostic::AmbiguousTeamMapping { season, week, name: key });
        return None;
    }

    match indices.career.get(&key) {
        Some(owner) => Some(owner.clone()),
        None => {
            diagnostics.report(Diagnostic::UnresolvedOwner { season, week, name: key });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WinLossRecord;
    use pretty_assertions::assert_eq;

    fn owner(name: &str, teams: &[&str]) -> Owner {
        teams
            .iter()
            .fold(Owner::new(OwnerId::from(name)), |o, t| o.with_team_name(*t))
    }

    fn entry(owner: &str, team: &str) -> SeasonStandingsEntry {
        SeasonStandingsEntry::new(
            OwnerId::from(owner),
            team,
            WinLossRecord::default(),
            0.0,
            0.0,
        )
    }

    #[test]
    fn test_normalize_team_name() {
        assert_eq!(normalize_team_name("  Hedd Hunters "), "hedd hunters");
        assert_eq!(normalize_team_name("DA SQUAD"), "da squad");
        assert_eq!(normalize_team_name("   "), "");
    }

    #[test]
    fn test_career_index_maps_every_name() {
        let owners = vec![
            owner("Dana", &["Hedd Hunters", "Hedd Hunters II"]),
            owner("Lee", &["Da Squad"]),
        ];
        let index = TeamOwnerIndex::from_owners(&owners);

        assert_eq!(index.get("hedd hunters"), Some(&OwnerId::from("Dana")));
        assert_eq!(index.get("hedd hunters ii"), Some(&OwnerId::from("Dana")));
        assert_eq!(index.get("da squad"), Some(&OwnerId::from("Lee")));
        assert!(index.ambiguous_teams().is_empty());
    }

    #[test]
    fn test_same_owner_repeating_name_is_not_ambiguous() {
        let owners = vec![owner("Dana", &["Big Dogs", "big dogs "])];
        let index = TeamOwnerIndex::from_owners(&owners);
        assert_eq!(index.get("big dogs"), Some(&OwnerId::from("Dana")));
        assert!(!index.is_ambiguous("big dogs"));
    }

    #[test]
    fn test_ambiguous_name_is_quarantined() {
        let owners = vec![
            owner("Dana", &["Big Dogs"]),
            owner("Lee", &["Big Dogs", "Da Squad"]),
            owner("Sam", &["BIG DOGS"]),
        ];
        let index = TeamOwnerIndex::from_owners(&owners);

        assert_eq!(index.get("big dogs"), None);
        assert!(index.is_ambiguous("big dogs"));
        assert_eq!(
            index.ambiguous_teams().iter().cloned().collect::<Vec<_>>(),
            vec!["big dogs".to_string()]
        );

        let diagnostics = Diagnostics::default();
        let resolved = resolve_owner(
            SeasonId(2006),
            3,
            "Big Dogs",
            OwnerIndices::new(None, &index),
            &diagnostics,
        );
        assert_eq!(resolved, None);
        assert_eq!(
            diagnostics.emitted(),
            vec![Diagnostic::AmbiguousTeamMapping {
                season: SeasonId(2006),
                week: 3,
                name: "big dogs".to_string(),
            }]
        );
    }

    #[test]
    fn test_season_index_overrides_career_ambiguity() {
        let owners = vec![owner("Dana", &["Big Dogs"]), owner("Lee", &["Big Dogs"])];
        let career = TeamOwnerIndex::from_owners(&owners);
        let standings = vec![entry("Lee", "Big Dogs"), entry("Dana", "Hedd Hunters")];
        let season = TeamOwnerIndex::from_standings(&standings);

        let diagnostics = Diagnostics::default();
        let resolved = resolve_owner(
            SeasonId(2009),
            1,
            "big dogs",
            OwnerIndices::new(Some(&season), &career),
            &diagnostics,
        );
        assert_eq!(resolved, Some(OwnerId::from("Lee")));
        assert!(diagnostics.emitted().is_empty());
    }

    #[test]
    fn test_season_index_falls_back_to_career() {
        let career = TeamOwnerIndex::from_owners(&[owner("Sam", &["Cleveland Steamers"])]);
        let season = TeamOwnerIndex::from_standings(&[entry("Dana", "Hedd Hunters")]);

        let diagnostics = Diagnostics::default();
        let resolved = resolve_owner(
            SeasonId(2006),
            14,
            "Cleveland Steamers",
            OwnerIndices::new(Some(&season), &career),
            &diagnostics,
        );
        assert_eq!(resolved, Some(OwnerId::from("Sam")));
    }

    #[test]
    fn test_blank_and_unresolved_names_log_once() {
        let career = TeamOwnerIndex::new();
        let diagnostics = Diagnostics::default();
        let indices = OwnerIndices::new(None, &career);

        for _ in 0..3 {
            assert_eq!(resolve_owner(SeasonId(2006), 2, "  ", indices, &diagnostics), None);
            assert_eq!(
                resolve_owner(SeasonId(2006), 2, "Mystery Team", indices, &diagnostics),
                None
            );
        }

        assert_eq!(diagnostics.emitted().len(), 2);
        assert_eq!(diagnostics.emitted()[0].reason(), "blank_team_name");
        assert_eq!(diagnostics.emitted()[1].reason(), "unresolved_owner");
    }

    #[test]
    fn test_blank_names_are_not_indexed() {
        let index = TeamOwnerIndex::from_standings(&[entry("Dana", "   ")]);
        assert!(index.is_empty());
    }
}
