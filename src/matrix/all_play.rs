//! All-play records: every team against every other team, every week.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::{MatrixBuilder, RecordMatrix};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::identity::{normalize_team_name, resolve_owner, OwnerIndices, TeamOwnerIndex};
use crate::models::{compare_scores, LeagueData, SeasonId};

/// One collected score for a week.
struct WeekScore {
    key: String,
    label: String,
    score: f64,
}

/// Compare every ordered pair of distinct scores and count the week.
fn play_week(builder: &mut MatrixBuilder, season: SeasonId, week: u32, scores: &[WeekScore], epsilon: f64) {
    if scores.is_empty() {
        return;
    }
    builder.count_week(season, week);

    let indices: Vec<usize> = scores
        .iter()
        .map(|s| builder.add_team(&s.key, &s.label))
        .collect();

    for (i, a) in scores.iter().enumerate() {
        for (j, b) in scores.iter().enumerate() {
            if i != j {
                builder.record(indices[i], indices[j], compare_scores(a.score, b.score, epsilon));
            }
        }
    }
}

fn push_first(scores: &mut Vec<WeekScore>, key: String, label: &str, score: f64) {
    if scores.iter().any(|s| s.key == key) {
        return;
    }
    scores.push(WeekScore {
        key,
        label: label.trim().to_string(),
        score,
    });
}

/// All-play matrix for one season's regular-season weeks, keyed by
/// normalized team name.
///
/// Both sides of every entry contribute a score; the first score seen for
/// a team in a week is used. Returns `None` without metadata or when no
/// week has a score.
pub fn build_season_all_play(
    data: &LeagueData,
    season: SeasonId,
    diagnostics: &Diagnostics,
    epsilon: f64,
) -> Option<RecordMatrix> {
    let Some(meta) = data.metadata.get(&season) else {
        diagnostics.report(Diagnostic::MissingSeasonMetadata { season });
        return None;
    };

    let mut builder = MatrixBuilder::new();
    for week in data.weeks_with_data(season, meta.regular_season_weeks()) {
        let mut scores = Vec::new();
        for entry in data.week_entries(season, week) {
            for side in [&entry.matchup.team1, &entry.matchup.team2] {
                let key = normalize_team_name(&side.team_name);
                if key.is_empty() {
                    diagnostics.report(Diagnostic::BlankTeamName { season, week });
                    continue;
                }
                if let Some(score) = side.score.filter(|s| s.is_finite()) {
                    push_first(&mut scores, key, &side.team_name, score);
                }
            }
        }
        play_week(&mut builder, season, week, &scores, epsilon);
    }

    builder.finish()
}

/// All-play matrix across every season with weekly data, keyed by owner.
///
/// Team names are resolved through each season's standings index, falling
/// back to the career index. Labels read `"Name (N)"` where N is the number
/// of seasons the owner contributed scores to. Seasons without metadata are
/// skipped.
pub fn build_career_all_play(
    data: &LeagueData,
    career: &TeamOwnerIndex,
    season_indices: &BTreeMap<SeasonId, TeamOwnerIndex>,
    diagnostics: &Diagnostics,
    epsilon: f64,
) -> Option<RecordMatrix> {
    let mut builder = MatrixBuilder::new();
    let mut seasons_by_owner: BTreeMap<String, BTreeSet<SeasonId>> = BTreeMap::new();

    for &season in data.matchups.keys() {
        let Some(meta) = data.metadata.get(&season) else {
            diagnostics.report(Diagnostic::MissingSeasonMetadata { season });
            continue;
        };
        let indices = OwnerIndices::new(season_indices.get(&season), career);

        for week in data.weeks_with_data(season, meta.regular_season_weeks()) {
            let mut scores = Vec::new();
            for entry in data.week_entries(season, week) {
                for side in [&entry.matchup.team1, &entry.matchup.team2] {
                    let Some(score) = side.score.filter(|s| s.is_finite()) else {
                        continue;
                    };
                    let Some(owner) = resolve_owner(season, week, &side.team_name, indices, diagnostics)
                    else {
                        continue;
                    };
                    push_first(&mut scores, owner.to_string(), owner.as_str(), score);
                }
            }
            for s in &scores {
                seasons_by_owner.entry(s.key.clone()).or_default().insert(season);
            }
            play_week(&mut builder, season, week, &scores, epsilon);
        }
    }

    for (owner, seasons) in &seasons_by_owner {
        builder.set_label(owner, format!("{} ({})", owner, seasons.len()));
    }

    debug!("Career all-play covers {} owners", seasons_by_owner.len());
    builder.finish()
}
