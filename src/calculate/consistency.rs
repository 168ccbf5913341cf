//! Scoring consistency: spread of an owner's weekly scores.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::identity::{resolve_owner, OwnerIndices, TeamOwnerIndex};
use crate::models::{ConsistencyRow, LeagueData, OwnerId, SeasonId};

/// Linear-interpolated percentile of sorted values, `p` in `[0, 1]`.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let weight = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * weight)
}

/// Q3 minus Q1.
pub fn interquartile_range(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(percentile(&sorted, 0.75)? - percentile(&sorted, 0.25)?)
}

pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt())
}

/// Regular-season weekly scores per owner, one per owner per week.
///
/// Scores come from the matchup sides, the same values all-play compares,
/// so an entry's totals block never changes the result. Seasons without
/// metadata yield nothing.
pub fn weekly_scores_by_owner(
    data: &LeagueData,
    season: SeasonId,
    indices: OwnerIndices<'_>,
    diagnostics: &Diagnostics,
) -> BTreeMap<OwnerId, Vec<f64>> {
    let mut scores: BTreeMap<OwnerId, Vec<f64>> = BTreeMap::new();
    let Some(meta) = data.metadata.get(&season) else {
        diagnostics.report(Diagnostic::MissingSeasonMetadata { season });
        return scores;
    };

    for week in data.weeks_with_data(season, meta.regular_season_weeks()) {
        let mut seen: HashSet<OwnerId> = HashSet::new();
        for entry in data.week_entries(season, week) {
            for side in [&entry.matchup.team1, &entry.matchup.team2] {
                let Some(score) = side.score.filter(|s| s.is_finite()) else {
                    continue;
                };
                let Some(owner) = resolve_owner(season, week, &side.team_name, indices, diagnostics)
                else {
                    continue;
                };
                if seen.insert(owner.clone()) {
                    scores.entry(owner).or_default().push(score);
                }
            }
        }
    }

    scores
}

#[derive(Debug, Default)]
struct SpreadAccumulator {
    seasons: u32,
    iqr_sum: f64,
    std_dev_sum: f64,
}

/// Average per-season IQR and standard deviation of weekly scores for every
/// owner with scores, most consistent (lowest deviation) first.
pub fn build_career_consistency_index(
    data: &LeagueData,
    career: &TeamOwnerIndex,
    season_indices: &BTreeMap<SeasonId, TeamOwnerIndex>,
    diagnostics: &Diagnostics,
) -> Vec<ConsistencyRow> {
    let mut spreads: BTreeMap<OwnerId, SpreadAccumulator> = BTreeMap::new();

    for &season in data.matchups.keys() {
        let indices = OwnerIndices::new(season_indices.get(&season), career);
        for (owner, scores) in weekly_scores_by_owner(data, season, indices, diagnostics) {
            let (Some(iqr), Some(std_dev)) = (interquartile_range(&scores), population_std_dev(&scores))
            else {
                continue;
            };
            let acc = spreads.entry(owner).or_default();
            acc.seasons += 1;
            acc.iqr_sum += iqr;
            acc.std_dev_sum += std_dev;
        }
    }

    debug!("Consistency index covers {} owners", spreads.len());

    let mut rows: Vec<ConsistencyRow> = spreads
        .into_iter()
        .map(|(owner, acc)| ConsistencyRow {
            owner,
            seasons_included: acc.seasons,
            average_season_iqr: acc.iqr_sum / acc.seasons as f64,
            average_ppg_std_dev: acc.std_dev_sum / acc.seasons as f64,
        })
        .collect();
    rows.sort_by(|a, b| {
        a.average_ppg_std_dev
            .total_cmp(&b.average_ppg_std_dev)
            .then_with(|| a.owner.cmp(&b.owner))
    });
    rows
}
