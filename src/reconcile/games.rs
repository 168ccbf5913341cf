//! Scheduled games: deduplication and owner resolution.

use crate::diagnostics::Diagnostics;
use crate::identity::{resolve_owner, OwnerIndices};
use crate::models::{compare_scores, LeagueData, ResolvedGame, SeasonId, SeenGames};

/// Resolve one week's scheduled games.
///
/// The two entries describing a game share a team-id pair or a team-name
/// pair (see [`GameKey`](crate::models::GameKey)) and only the first is used. Games are skipped when either side does not
/// resolve, both sides resolve to the same owner, or either score is missing.
/// Each game is returned once, from its first-listed team's perspective.
pub fn resolve_week_games(
    data: &LeagueData,
    season: SeasonId,
    week: u32,
    indices: OwnerIndices<'_>,
    diagnostics: &Diagnostics,
    epsilon: f64,
) -> Vec<ResolvedGame> {
    let mut seen = SeenGames::new();
    let mut games = Vec::new();

    for entry in data.week_entries(season, week) {
        if !seen.insert(entry.matchup.game_key()) {
            continue;
        }

        let side1 = &entry.matchup.team1;
        let side2 = &entry.matchup.team2;

        let owner1 = resolve_owner(season, week, &side1.team_name, indices, diagnostics);
        let owner2 = resolve_owner(season, week, &side2.team_name, indices, diagnostics);
        let (Some(owner), Some(opponent)) = (owner1, owner2) else {
            continue;
        };
        if owner == opponent {
            continue;
        }

        let (Some(score), Some(opponent_score)) = (
            side1.score.filter(|s| s.is_finite()),
            side2.score.filter(|s| s.is_finite()),
        ) else {
            continue;
        };

        games.push(ResolvedGame {
            season,
            week,
            outcome: compare_scores(score, opponent_score, epsilon),
            owner,
            opponent,
            score,
            opponent_score,
        });
    }

    games
}

/// The deduplicated, resolved game log for a season.
pub fn season_games(
    data: &LeagueData,
    season: SeasonId,
    indices: OwnerIndices<'_>,
    diagnostics: &Diagnostics,
    epsilon: f64,
    include_playoffs: bool,
) -> Vec<ResolvedGame> {
    scheduled_weeks(data, season, include_playoffs)
        .into_iter()
        .flat_map(|week| resolve_week_games(data, season, week, indices, diagnostics, epsilon))
        .collect()
}

/// Weeks with data scanned for head-to-head records and the season game log.
///
/// With metadata: week 1 through the season end (or the regular-season end
/// when playoffs are excluded). Without metadata: every week with data.
pub fn scheduled_weeks(data: &LeagueData, season: SeasonId, include_playoffs: bool) -> Vec<u32> {
    let weeks = match data.metadata.get(&season) {
        Some(meta) if include_playoffs => meta.season_weeks(),
        Some(meta) => meta.regular_season_weeks(),
        None => 1..=u32::MAX,
    };
    data.weeks_with_data(season, weeks)
}
