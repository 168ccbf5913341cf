//! Head-to-head records from scheduled games.

use super::{MatrixBuilder, RecordMatrix};
use crate::diagnostics::Diagnostics;
use crate::identity::OwnerIndices;
use crate::models::{LeagueData, OwnerId, ResolvedGame, SeasonId};
use crate::reconcile::games::season_games;

/// Build a head-to-head matrix keyed by owner from resolved games.
///
/// Games must already be deduplicated. Each one credits both sides.
pub fn build_head_to_head<'a, F>(
    games: impl IntoIterator<Item = &'a ResolvedGame>,
    label: F,
) -> Option<RecordMatrix>
where
    F: Fn(&OwnerId) -> String,
{
    let mut builder = MatrixBuilder::new();
    for game in games {
        if game.owner == game.opponent {
            continue;
        }
        let a = builder.add_team(game.owner.as_str(), &label(&game.owner));
        let b = builder.add_team(game.opponent.as_str(), &label(&game.opponent));
        builder.record_game(a, b, game.outcome);
        builder.count_week(game.season, game.week);
    }
    builder.finish()
}

/// One season's head-to-head matrix. Owners are labelled with the team
/// name they used that season, when standings have one.
pub fn build_season_head_to_head(
    data: &LeagueData,
    season: SeasonId,
    indices: OwnerIndices<'_>,
    diagnostics: &Diagnostics,
    epsilon: f64,
    include_playoffs: bool,
) -> Option<RecordMatrix> {
    let games = season_games(data, season, indices, diagnostics, epsilon, include_playoffs);
    let standings = data.standings.get(&season);

    build_head_to_head(&games, |owner| {
        standings
            .and_then(|s| s.get(owner))
            .map(|e| e.team_name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| owner.to_string())
    })
}

/// Career head-to-head matrix over every season's game log, labelled by
/// owner id.
pub fn build_career_head_to_head<'a>(
    games: impl IntoIterator<Item = &'a ResolvedGame>,
) -> Option<RecordMatrix> {
    build_head_to_head(games, |owner| owner.to_string())
}
