//! Statistics calculation engine.
//!
//! Computes derived metrics from reconciled season totals:
//! - Pythagorean expected wins and luck
//! - Competition ranks
//! - Scoring consistency (see [`consistency`])

pub mod consistency;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{LuckRow, OwnerId, RankedValue, SeasonTotals, TotalsSource, WinLossRecord};

pub use consistency::{
    build_career_consistency_index, interquartile_range, percentile, population_std_dev,
    weekly_scores_by_owner,
};

/// Exponent fitted for fantasy football scoring.
pub const DEFAULT_PYTHAGOREAN_EXPONENT: f64 = 2.37;

/// Expected wins over `games` from points for and against.
///
/// Returns 0 when there are no games, both totals are non-positive, or
/// either total is not finite. Negative totals are clamped to zero.
pub fn calculate_expected_wins(points_for: f64, points_against: f64, games: u32, exponent: f64) -> f64 {
    if games == 0 || !points_for.is_finite() || !points_against.is_finite() {
        return 0.0;
    }
    if points_for <= 0.0 && points_against <= 0.0 {
        return 0.0;
    }

    let pf = points_for.max(0.0).powf(exponent);
    let pa = points_against.max(0.0).powf(exponent);
    let denominator = pf + pa;
    if denominator == 0.0 {
        return 0.0;
    }

    games as f64 * pf / denominator
}

/// Rank values from highest to lowest using standard competition ranking.
///
/// Values within `epsilon` of their neighbour share a rank and the next
/// distinct value resumes at its position (1, 2, 2, 4). Owners sharing a
/// rank are listed by id.
pub fn build_ranks(values: &[(OwnerId, f64)], epsilon: f64) -> Vec<RankedValue> {
    let mut sorted: Vec<&(OwnerId, f64)> = values.iter().collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut ranked: Vec<RankedValue> = Vec::with_capacity(sorted.len());
    for (idx, (owner, value)) in sorted.into_iter().enumerate() {
        let rank = match ranked.last() {
            Some(prev) if (prev.value - value).abs() <= epsilon => prev.rank,
            _ => idx as u32 + 1,
        };
        ranked.push(RankedValue {
            owner: owner.clone(),
            value: *value,
            rank,
        });
    }

    ranked.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.owner.cmp(&b.owner)));
    ranked
}

/// Actual versus expected wins for every owner with games in a season.
pub fn build_luck_table(totals: &SeasonTotals, exponent: f64, epsilon: f64) -> Vec<LuckRow> {
    let rows = totals
        .totals_by_owner
        .iter()
        .filter(|(_, t)| t.source != TotalsSource::Empty && !t.record.is_empty())
        .map(|(owner, t)| {
            let expected_wins =
                calculate_expected_wins(t.points_for, t.points_against, t.record.total_games(), exponent);
            LuckRow {
                owner: owner.clone(),
                record: t.record,
                points_for: t.points_for,
                points_against: t.points_against,
                expected_wins,
                luck: t.record.wins as f64 - expected_wins,
                expected_rank: 0,
            }
        })
        .collect();

    rank_luck_rows(rows, epsilon)
}

/// Sum per-season luck tables into career rows.
pub fn combine_luck_tables<'a>(
    tables: impl IntoIterator<Item = &'a [LuckRow]>,
    epsilon: f64,
) -> Vec<LuckRow> {
    let mut careers: BTreeMap<OwnerId, LuckRow> = BTreeMap::new();
    for row in tables.into_iter().flatten() {
        let acc = careers.entry(row.owner.clone()).or_insert_with(|| LuckRow {
            owner: row.owner.clone(),
            record: WinLossRecord::default(),
            points_for: 0.0,
            points_against: 0.0,
            expected_wins: 0.0,
            luck: 0.0,
            expected_rank: 0,
        });
        acc.record += row.record;
        acc.points_for += row.points_for;
        acc.points_against += row.points_against;
        acc.expected_wins += row.expected_wins;
        acc.luck += row.luck;
    }

    rank_luck_rows(careers.into_values().collect(), epsilon)
}

/// Assign expected-wins ranks and order by luck, luckiest first.
fn rank_luck_rows(mut rows: Vec<LuckRow>, epsilon: f64) -> Vec<LuckRow> {
    let expected: Vec<(OwnerId, f64)> = rows
        .iter()
        .map(|r| (r.owner.clone(), r.expected_wins))
        .collect();
    let ranks: BTreeMap<OwnerId, u32> = build_ranks(&expected, epsilon)
        .into_iter()
        .map(|r| (r.owner, r.rank))
        .collect();

    for row in &mut rows {
        row.expected_rank = ranks.get(&row.owner).copied().unwrap_or(0);
    }
    rows.sort_by(|a, b| match b.luck.total_cmp(&a.luck) {
        Ordering::Equal => a.owner.cmp(&b.owner),
        other => other,
    });
    rows
}
