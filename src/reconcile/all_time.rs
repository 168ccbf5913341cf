//! Career records across every season.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use super::{owner_history_complete, ReconciledSeason};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::models::{AllTimeRecordRow, LeagueData, OwnerId, TotalsSource, WinLossRecord};

#[derive(Debug, Default)]
struct CareerAccumulator {
    record: WinLossRecord,
    points_for: f64,
    points_against: f64,
    seasons_played: u32,
}

/// Sum each owner's composed season totals into a career row.
///
/// Every owner known to the roster or any standings gets a row. The result
/// is cross-checked against the roster's precomputed career record, when it
/// has one, for owners whose every active season has complete weekly history.
pub fn aggregate_all_time<'a>(
    data: &LeagueData,
    seasons: impl IntoIterator<Item = &'a ReconciledSeason>,
    diagnostics: &Diagnostics,
) -> Vec<AllTimeRecordRow> {
    let mut careers: BTreeMap<OwnerId, CareerAccumulator> = data
        .owner_ids()
        .into_iter()
        .map(|id| (id, CareerAccumulator::default()))
        .collect();

    let mut season_count = 0;
    for season in seasons {
        season_count += 1;
        for owner in season.owners() {
            let totals = season.owner_totals(&owner);
            if totals.source == TotalsSource::Empty {
                continue;
            }
            let acc = careers.entry(owner).or_default();
            acc.record += totals.record;
            acc.points_for += totals.points_for;
            acc.points_against += totals.points_against;
            acc.seasons_played += 1;
        }
    }

    for (id, owner) in &data.owners {
        let (Some(acc), Some(reference)) = (careers.get(id), owner.record) else {
            continue;
        };
        if acc.record != reference && owner_history_complete(data, id) {
            diagnostics.report(Diagnostic::WinsMismatch {
                scope: "career".to_string(),
                owner: id.clone(),
                derived: acc.record,
                reference,
            });
        }
    }

    debug!(
        "Aggregated {} seasons into {} career records",
        season_count,
        careers.len()
    );

    let mut rows: Vec<AllTimeRecordRow> = careers
        .into_iter()
        .map(|(owner, acc)| AllTimeRecordRow {
            owner,
            seasons_played: acc.seasons_played,
            wins: acc.record.wins,
            losses: acc.record.losses,
            ties: acc.record.ties,
            win_pct: acc.record.win_pct(),
            points_for: acc.points_for,
            points_against: acc.points_against,
        })
        .collect();
    rows.sort_by(compare_rows);
    rows
}

/// Wins desc, losses asc, ties desc, name asc.
pub fn compare_rows(a: &AllTimeRecordRow, b: &AllTimeRecordRow) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then(a.losses.cmp(&b.losses))
        .then(b.ties.cmp(&a.ties))
        .then_with(|| a.owner.cmp(&b.owner))
}
