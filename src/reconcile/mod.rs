//! Regular-season record reconciliation.
//!
//! Two sources describe each season's records:
//! - season-end standings (official, but only totals);
//! - weekly matchup entries, which can be replayed game by game.
//!
//! When weekly history exists for a season it is authoritative, even when
//! it is incomplete. Standings are the fallback. Disagreement is reported,
//! never corrected.

pub mod all_time;
pub mod games;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::identity::OwnerIndices;
use crate::models::{
    LeagueData, Outcome, OwnerId, OwnerSeasonTotals, SeasonId, SeasonTotals, TotalsSource,
};
use games::resolve_week_games;

/// Replay a season's regular-season weeks into per-owner totals.
///
/// `has_regular_season_history` is true iff at least one game was counted.
pub fn derive_season_totals(
    data: &LeagueData,
    season: SeasonId,
    indices: OwnerIndices<'_>,
    diagnostics: &Diagnostics,
    epsilon: f64,
) -> SeasonTotals {
    let mut result = SeasonTotals::new(season);

    let Some(meta) = data.metadata.get(&season) else {
        diagnostics.report(Diagnostic::MissingSeasonMetadata { season });
        return result;
    };
    if !data.has_weekly_data(season) {
        diagnostics.report(Diagnostic::MissingWeeklyData { season });
        return result;
    }

    for week in data.weeks_with_data(season, meta.regular_season_weeks()) {
        let games = resolve_week_games(data, season, week, indices, diagnostics, epsilon);
        if games.is_empty() {
            continue;
        }

        let mut week_scores: Vec<(OwnerId, f64)> = Vec::with_capacity(games.len() * 2);
        for game in &games {
            apply_game(&mut result, &game.owner, game.score, game.opponent_score, game.outcome);
            apply_game(
                &mut result,
                &game.opponent,
                game.opponent_score,
                game.score,
                game.outcome.flipped(),
            );
            week_scores.push((game.owner.clone(), game.score));
            week_scores.push((game.opponent.clone(), game.opponent_score));
        }
        record_weekly_extremes(&mut result, &week_scores, epsilon);
        result.has_regular_season_history = true;
    }

    debug!(
        "Season {}: weekly replay produced totals for {} owners",
        season,
        result.totals_by_owner.len()
    );
    result
}

fn apply_game(totals: &mut SeasonTotals, owner: &OwnerId, score: f64, against: f64, outcome: Outcome) {
    let entry = totals
        .totals_by_owner
        .entry(owner.clone())
        .or_insert_with(|| OwnerSeasonTotals::empty(TotalsSource::Weekly));
    entry.record.record(outcome);
    entry.points_for += score;
    entry.points_against += against;
}

fn record_weekly_extremes(totals: &mut SeasonTotals, scores: &[(OwnerId, f64)], epsilon: f64) {
    let high = scores.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);
    let low = scores.iter().map(|(_, s)| *s).fold(f64::INFINITY, f64::min);

    for (owner, score) in scores {
        if let Some(entry) = totals.totals_by_owner.get_mut(owner) {
            if (score - high).abs() <= epsilon {
                entry.weekly_highs += 1;
            }
            if (score - low).abs() <= epsilon {
                entry.weekly_lows += 1;
            }
        }
    }
}

/// Totals read directly from a season's standings.
pub fn fallback_season_totals(data: &LeagueData, season: SeasonId) -> SeasonTotals {
    let mut result = SeasonTotals::new(season);
    if let Some(entries) = data.standings.get(&season) {
        for (owner, entry) in entries {
            result.totals_by_owner.insert(
                owner.clone(),
                OwnerSeasonTotals {
                    record: entry.record,
                    points_for: entry.points_for,
                    points_against: entry.points_against,
                    weekly_highs: entry.high_points.unwrap_or(0),
                    weekly_lows: entry.low_points.unwrap_or(0),
                    source: TotalsSource::Standings,
                },
            );
        }
    }
    result
}

/// Whether a season's weekly history can be trusted as complete.
pub fn is_season_complete(data: &LeagueData, season: SeasonId) -> bool {
    data.metadata
        .get(&season)
        .is_some_and(|m| m.has_full_historical_details)
        && data.has_weekly_data(season)
}

/// Whether every season the owner was active in has complete weekly history.
pub fn owner_history_complete(data: &LeagueData, owner: &OwnerId) -> bool {
    let seasons = data.active_seasons(owner);
    !seasons.is_empty() && seasons.iter().all(|s| is_season_complete(data, *s))
}

/// Both sources for one season, plus the composition rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledSeason {
    pub season: SeasonId,
    pub weekly: SeasonTotals,
    pub fallback: SeasonTotals,
}

impl ReconciledSeason {
    /// The weekly entry when weekly history exists and has the owner,
    /// otherwise the standings entry, otherwise zero.
    pub fn owner_totals(&self, owner: &OwnerId) -> OwnerSeasonTotals {
        if self.weekly.has_regular_season_history {
            if let Some(totals) = self.weekly.get(owner) {
                return *totals;
            }
        }
        self.fallback
            .get(owner)
            .copied()
            .unwrap_or_else(|| OwnerSeasonTotals::empty(TotalsSource::Empty))
    }

    /// Owners present in either source.
    pub fn owners(&self) -> BTreeSet<OwnerId> {
        self.weekly
            .totals_by_owner
            .keys()
            .chain(self.fallback.totals_by_owner.keys())
            .cloned()
            .collect()
    }

    /// Final per-owner totals for the season.
    pub fn composed(&self) -> SeasonTotals {
        let totals_by_owner: BTreeMap<OwnerId, OwnerSeasonTotals> = self
            .owners()
            .into_iter()
            .map(|owner| {
                let totals = self.owner_totals(&owner);
                (owner, totals)
            })
            .collect();

        SeasonTotals {
            season: self.season,
            has_regular_season_history: self.weekly.has_regular_season_history,
            totals_by_owner,
        }
    }
}

/// Derive both sources for a season and report weekly/standings
/// disagreement for owners whose whole history is complete.
pub fn reconcile_season(
    data: &LeagueData,
    season: SeasonId,
    indices: OwnerIndices<'_>,
    diagnostics: &Diagnostics,
    epsilon: f64,
) -> ReconciledSeason {
    let weekly = derive_season_totals(data, season, indices, diagnostics, epsilon);
    let fallback = fallback_season_totals(data, season);

    if weekly.has_regular_season_history {
        for (owner, derived) in &weekly.totals_by_owner {
            let Some(reference) = fallback.get(owner) else {
                continue;
            };
            if derived.record != reference.record && owner_history_complete(data, owner) {
                diagnostics.report(Diagnostic::WinsMismatch {
                    scope: format!("season {}", season),
                    owner: owner.clone(),
                    derived: derived.record,
                    reference: reference.record,
                });
            }
        }
    }

    ReconciledSeason {
        season,
        weekly,
        fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::TeamOwnerIndex;
    use crate::models::{SeasonMetadata, WinLossRecord, SCORE_EPSILON};
    use crate::test_support::{game, league, owner_for, sample_league};
    use pretty_assertions::assert_eq;

    fn reconcile(data: &LeagueData, season: u16, diagnostics: &Diagnostics) -> ReconciledSeason {
        let career = TeamOwnerIndex::from_owners(data.owners.values());
        let season_index = data
            .standings
            .get(&SeasonId(season))
            .map(|s| TeamOwnerIndex::from_standings(s.values()));
        reconcile_season(
            data,
            SeasonId(season),
            OwnerIndices::new(season_index.as_ref(), &career),
            diagnostics,
            SCORE_EPSILON,
        )
    }

    #[test]
    fn test_weekly_replay_of_sample_season() {
        let data = sample_league();
        let diagnostics = Diagnostics::default();
        let season = reconcile(&data, 2006, &diagnostics);

        assert!(season.weekly.has_regular_season_history);
        let lee = season.weekly.get(&OwnerId::from("Lee")).unwrap();
        assert_eq!(lee.record, WinLossRecord::new(2, 0, 0));
        assert!((lee.points_for - 220.2).abs() < 1e-9);
        assert!((lee.points_against - 208.0).abs() < 1e-9);
        assert_eq!(lee.weekly_highs, 2);
        assert_eq!(lee.source, TotalsSource::Weekly);

        let priya = season.weekly.get(&OwnerId::from("Priya")).unwrap();
        assert_eq!(priya.record, WinLossRecord::new(0, 1, 1));
        // Shared low in week 13 (88.20 tie), outright low in week 14
        assert_eq!(priya.weekly_lows, 2);

        let sam = season.weekly.get(&OwnerId::from("Sam")).unwrap();
        assert_eq!(sam.record, WinLossRecord::new(0, 1, 1));

        assert!(diagnostics.emitted().is_empty());
    }

    #[test]
    fn test_fallback_when_no_weekly_history() {
        let data = sample_league();
        let diagnostics = Diagnostics::default();
        let season = reconcile(&data, 2005, &diagnostics);

        assert!(!season.weekly.has_regular_season_history);
        let composed = season.composed();
        assert!(!composed.has_regular_season_history);

        for (owner, entry) in &data.standings[&SeasonId(2005)] {
            let totals = composed.get(owner).unwrap();
            assert_eq!(totals.record, entry.record);
            assert_eq!(totals.source, TotalsSource::Standings);
        }

        let emitted = diagnostics.emitted();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].reason(), "missing_weekly_data");
    }

    #[test]
    fn test_missing_metadata_falls_back() {
        let mut data = sample_league();
        data.metadata.remove(&SeasonId(2006));
        let diagnostics = Diagnostics::default();
        let season = reconcile(&data, 2006, &diagnostics);

        assert!(!season.weekly.has_regular_season_history);
        assert_eq!(
            season.owner_totals(&OwnerId::from("Lee")).source,
            TotalsSource::Standings
        );
        assert_eq!(diagnostics.emitted()[0].reason(), "missing_season_metadata");
    }

    #[test]
    fn test_weekly_wins_over_standings_and_mismatch_is_logged_once() {
        let mut data = sample_league();
        // Every season of Lee's complete so the check applies
        for owner in data.owners.values_mut() {
            owner.active_seasons = vec![SeasonId(2006)];
        }
        data.standings
            .get_mut(&SeasonId(2006))
            .unwrap()
            .get_mut(&OwnerId::from("Lee"))
            .unwrap()
            .record = WinLossRecord::new(1, 1, 0);

        let diagnostics = Diagnostics::default();
        let first = reconcile(&data, 2006, &diagnostics);
        let _second = reconcile(&data, 2006, &diagnostics);

        assert_eq!(
            first.owner_totals(&OwnerId::from("Lee")).record,
            WinLossRecord::new(2, 0, 0)
        );
        assert_eq!(
            diagnostics.emitted(),
            vec![Diagnostic::WinsMismatch {
                scope: "season 2006".to_string(),
                owner: OwnerId::from("Lee"),
                derived: WinLossRecord::new(2, 0, 0),
                reference: WinLossRecord::new(1, 1, 0),
            }]
        );
    }

    #[test]
    fn test_no_mismatch_when_history_incomplete() {
        let mut data = sample_league();
        data.standings
            .get_mut(&SeasonId(2006))
            .unwrap()
            .get_mut(&OwnerId::from("Lee"))
            .unwrap()
            .record = WinLossRecord::new(1, 1, 0);

        // Lee was also active in 2005, which has no weekly data
        let diagnostics = Diagnostics::default();
        reconcile(&data, 2006, &diagnostics);
        assert!(diagnostics.emitted().is_empty());
    }

    #[test]
    fn test_owner_missing_from_weekly_uses_standings() {
        let mut data = sample_league();
        data.standings.get_mut(&SeasonId(2006)).unwrap().insert(
            OwnerId::from("Newbie"),
            crate::models::SeasonStandingsEntry::new(
                OwnerId::from("Newbie"),
                "Late Joiners",
                WinLossRecord::new(3, 10, 0),
                900.0,
                1200.0,
            ),
        );
        let diagnostics = Diagnostics::default();
        let season = reconcile(&data, 2006, &diagnostics);

        let newbie = season.owner_totals(&OwnerId::from("Newbie"));
        assert_eq!(newbie.record, WinLossRecord::new(3, 10, 0));
        assert_eq!(newbie.source, TotalsSource::Standings);

        let nobody = season.owner_totals(&OwnerId::from("Nobody"));
        assert_eq!(nobody.record, WinLossRecord::default());
        assert_eq!(nobody.source, TotalsSource::Empty);
    }

    #[test]
    fn test_epsilon_tie_in_weekly_replay() {
        let mut data = league(&[game(
            2010,
            1,
            ("1", "Alpha", "100.0000004"),
            ("2", "Beta", "100.0"),
        )]);
        data.metadata.insert(SeasonId(2010), SeasonMetadata::new(13, 16, true));
        let diagnostics = Diagnostics::default();
        let season = reconcile(&data, 2010, &diagnostics);

        assert_eq!(
            season.weekly.get(&owner_for("Alpha")).unwrap().record,
            WinLossRecord::new(0, 0, 1)
        );
        assert_eq!(
            season.weekly.get(&owner_for("Beta")).unwrap().record,
            WinLossRecord::new(0, 0, 1)
        );
    }

    #[test]
    fn test_playoff_weeks_are_not_counted() {
        let mut data = league(&[
            game(2010, 13, ("1", "Alpha", "100"), ("2", "Beta", "90")),
            game(2010, 15, ("1", "Alpha", "80"), ("2", "Beta", "90")),
        ]);
        data.metadata.insert(SeasonId(2010), SeasonMetadata::new(13, 16, true));
        let diagnostics = Diagnostics::default();
        let season = reconcile(&data, 2010, &diagnostics);

        assert_eq!(
            season.weekly.get(&owner_for("Alpha")).unwrap().record,
            WinLossRecord::new(1, 0, 0)
        );
    }

    #[test]
    fn test_oversized_end_week_only_visits_weeks_with_data() {
        let mut data = league(&[
            game(2010, 1, ("1", "Alpha", "100"), ("2", "Beta", "90")),
            game(2010, 40, ("1", "Alpha", "80"), ("2", "Beta", "90")),
        ]);
        data.metadata
            .insert(SeasonId(2010), SeasonMetadata::new(300_000_000, 300_000_000, true));
        let diagnostics = Diagnostics::default();
        let season = reconcile(&data, 2010, &diagnostics);

        assert_eq!(
            season.weekly.get(&owner_for("Alpha")).unwrap().record,
            WinLossRecord::new(1, 1, 0)
        );
    }
}
