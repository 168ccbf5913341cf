//! The league engine: source data plus memoized derived statistics.
//!
//! Every query reads the current sources through a [`Memo`] that declares
//! which sources it depends on. Replacing a source bumps its version, so the
//! next query that depends on it recomputes in full while unrelated cached
//! values are kept.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::cache::{Memo, Source, SourceVersions};
use crate::calculate::{
    build_career_consistency_index, build_luck_table, build_ranks, calculate_expected_wins,
    combine_luck_tables,
};
use crate::config::AnalysisConfig;
use crate::diagnostics::{DiagnosticSink, Diagnostics};
use crate::identity::{self, OwnerIndices, TeamOwnerIndex};
use crate::matrix::{
    build_career_all_play, build_career_head_to_head, build_season_all_play,
    build_season_head_to_head, MatrixScope, RecordMatrix,
};
use crate::models::{
    AllTimeRecordRow, ConsistencyRow, LeagueData, LuckRow, Owner, OwnerId, RankedValue,
    ResolvedGame, SeasonId, SeasonMatchups, SeasonMetadata, SeasonStandings,
    SeasonStandingsEntry, SeasonTotals,
};
use crate::reconcile::{all_time::aggregate_all_time, games::season_games, reconcile_season, ReconciledSeason};

const OWNERS: &[Source] = &[Source::Owners];
const STANDINGS: &[Source] = &[Source::Standings];
const WEEKLY: &[Source] = &[Source::Matchups, Source::Metadata];

/// Availability of one season's data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub season: SeasonId,
    pub metadata: Option<SeasonMetadata>,
    pub has_standings: bool,
    pub has_weekly_data: bool,
}

/// League history engine.
pub struct League {
    data: LeagueData,
    versions: SourceVersions,
    analysis: AnalysisConfig,
    diagnostics: Diagnostics,

    career_index: Memo<(), TeamOwnerIndex>,
    season_indices: Memo<(), BTreeMap<SeasonId, TeamOwnerIndex>>,
    reconciled: Memo<SeasonId, ReconciledSeason>,
    games: Memo<SeasonId, Vec<ResolvedGame>>,
    standings: Memo<SeasonId, Vec<SeasonStandingsEntry>>,
    season_all_play: Memo<SeasonId, Option<RecordMatrix>>,
    career_all_play: Memo<(), Option<RecordMatrix>>,
    head_to_head: Memo<MatrixScope, Option<RecordMatrix>>,
    all_time: Memo<(), Vec<AllTimeRecordRow>>,
    luck: Memo<MatrixScope, Vec<LuckRow>>,
    consistency: Memo<(), Vec<ConsistencyRow>>,
}

impl League {
    /// Create an engine that reports diagnostics through `tracing`.
    pub fn new(data: LeagueData, analysis: AnalysisConfig) -> Self {
        Self::with_diagnostics(data, analysis, Diagnostics::default())
    }

    /// Create an engine that reports diagnostics to `sink`.
    pub fn with_sink(data: LeagueData, analysis: AnalysisConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self::with_diagnostics(data, analysis, Diagnostics::new(sink))
    }

    fn with_diagnostics(data: LeagueData, analysis: AnalysisConfig, diagnostics: Diagnostics) -> Self {
        Self {
            data,
            versions: SourceVersions::default(),
            analysis,
            diagnostics,
            career_index: Memo::new("career_index", OWNERS),
            season_indices: Memo::new("season_indices", STANDINGS),
            reconciled: Memo::new("reconciled_season", Source::ALL),
            games: Memo::new("season_games", Source::ALL),
            standings: Memo::new("season_standings", STANDINGS),
            season_all_play: Memo::new("season_all_play", WEEKLY),
            career_all_play: Memo::new("career_all_play", Source::ALL),
            head_to_head: Memo::new("head_to_head", Source::ALL),
            all_time: Memo::new("all_time_records", Source::ALL),
            luck: Memo::new("luck", Source::ALL),
            consistency: Memo::new("consistency", Source::ALL),
        }
    }

    pub fn data(&self) -> &LeagueData {
        &self.data
    }

    pub fn analysis(&self) -> AnalysisConfig {
        self.analysis
    }

    pub fn versions(&self) -> SourceVersions {
        self.versions
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Replace every source collection.
    pub fn replace_data(&mut self, data: LeagueData) {
        self.data = data;
        for source in Source::ALL {
            self.versions.bump(*source);
        }
        info!(
            "League data replaced: {} owners, {} seasons",
            self.data.owners.len(),
            self.data.season_ids().len()
        );
    }

    pub fn set_owners(&mut self, owners: BTreeMap<OwnerId, Owner>) {
        self.data.owners = owners;
        self.versions.bump(Source::Owners);
    }

    pub fn set_standings(&mut self, standings: BTreeMap<SeasonId, SeasonStandings>) {
        self.data.standings = standings;
        self.versions.bump(Source::Standings);
    }

    pub fn set_matchups(&mut self, matchups: BTreeMap<SeasonId, SeasonMatchups>) {
        self.data.matchups = matchups;
        self.versions.bump(Source::Matchups);
    }

    pub fn set_metadata(&mut self, metadata: BTreeMap<SeasonId, SeasonMetadata>) {
        self.data.metadata = metadata;
        self.versions.bump(Source::Metadata);
    }

    /// Whether any source mentions the season.
    pub fn has_season(&self, season: SeasonId) -> bool {
        self.data.metadata.contains_key(&season) || self.data.season_ids().contains(&season)
    }

    /// Every season any source mentions, oldest first.
    pub fn seasons(&self) -> Vec<SeasonSummary> {
        let mut ids = self.data.season_ids();
        ids.extend(self.data.metadata.keys().copied());

        ids.into_iter()
            .map(|season| SeasonSummary {
                season,
                metadata: self.data.metadata.get(&season).copied(),
                has_standings: self.data.standings.contains_key(&season),
                has_weekly_data: self.data.has_weekly_data(season),
            })
            .collect()
    }

    /// Career-wide team name index built from the owner roster.
    pub fn career_index(&self) -> Arc<TeamOwnerIndex> {
        self.career_index.get_or_compute((), &self.versions, || {
            TeamOwnerIndex::from_owners(self.data.owners.values())
        })
    }

    /// Season-scoped indices for every season with standings.
    pub fn season_indices(&self) -> Arc<BTreeMap<SeasonId, TeamOwnerIndex>> {
        self.season_indices.get_or_compute((), &self.versions, || {
            self.data
                .standings
                .iter()
                .map(|(season, entries)| (*season, TeamOwnerIndex::from_standings(entries.values())))
                .collect()
        })
    }

    /// Resolve a team display name to its owner for a season.
    pub fn resolve_owner(&self, season: SeasonId, week: u32, team_name: &str) -> Option<OwnerId> {
        let career = self.career_index();
        let seasons = self.season_indices();
        identity::resolve_owner(
            season,
            week,
            team_name,
            OwnerIndices::new(seasons.get(&season), &career),
            &self.diagnostics,
        )
    }

    /// Weekly and standings totals for a season, with mismatches reported.
    pub fn reconciled_season(&self, season: SeasonId) -> Arc<ReconciledSeason> {
        self.reconciled.get_or_compute(season, &self.versions, || {
            let career = self.career_index();
            let seasons = self.season_indices();
            reconcile_season(
                &self.data,
                season,
                OwnerIndices::new(seasons.get(&season), &career),
                &self.diagnostics,
                self.analysis.score_epsilon,
            )
        })
    }

    /// Final per-owner totals for a season.
    pub fn season_totals(&self, season: SeasonId) -> SeasonTotals {
        self.reconciled_season(season).composed()
    }

    /// Resolved game log for a season.
    pub fn season_games(&self, season: SeasonId) -> Arc<Vec<ResolvedGame>> {
        self.games.get_or_compute(season, &self.versions, || {
            let career = self.career_index();
            let seasons = self.season_indices();
            season_games(
                &self.data,
                season,
                OwnerIndices::new(seasons.get(&season), &career),
                &self.diagnostics,
                self.analysis.score_epsilon,
                self.analysis.head_to_head_includes_playoffs,
            )
        })
    }

    /// Standings ordered by regular-season rank (unranked last), then wins
    /// desc, then owner.
    pub fn season_standings(&self, season: SeasonId) -> Arc<Vec<SeasonStandingsEntry>> {
        self.standings.get_or_compute(season, &self.versions, || {
            let mut rows: Vec<SeasonStandingsEntry> = self
                .data
                .standings
                .get(&season)
                .map(|s| s.values().cloned().collect())
                .unwrap_or_default();
            rows.sort_by(compare_standings);
            rows
        })
    }

    pub fn all_play_matrix(&self, scope: MatrixScope) -> Arc<Option<RecordMatrix>> {
        let epsilon = self.analysis.score_epsilon;
        match scope {
            MatrixScope::Season(season) => {
                self.season_all_play.get_or_compute(season, &self.versions, || {
                    build_season_all_play(&self.data, season, &self.diagnostics, epsilon)
                })
            }
            MatrixScope::Career => self.career_all_play.get_or_compute((), &self.versions, || {
                build_career_all_play(
                    &self.data,
                    &self.career_index(),
                    &self.season_indices(),
                    &self.diagnostics,
                    epsilon,
                )
            }),
        }
    }

    pub fn head_to_head_matrix(&self, scope: MatrixScope) -> Arc<Option<RecordMatrix>> {
        self.head_to_head.get_or_compute(scope, &self.versions, || match scope {
            MatrixScope::Season(season) => {
                let career = self.career_index();
                let seasons = self.season_indices();
                build_season_head_to_head(
                    &self.data,
                    season,
                    OwnerIndices::new(seasons.get(&season), &career),
                    &self.diagnostics,
                    self.analysis.score_epsilon,
                    self.analysis.head_to_head_includes_playoffs,
                )
            }
            MatrixScope::Career => {
                let logs: Vec<Arc<Vec<ResolvedGame>>> = self
                    .data
                    .season_ids()
                    .into_iter()
                    .map(|season| self.season_games(season))
                    .collect();
                build_career_head_to_head(logs.iter().flat_map(|games| games.iter()))
            }
        })
    }

    /// Career records table across every season.
    pub fn all_time_records(&self) -> Arc<Vec<AllTimeRecordRow>> {
        self.all_time.get_or_compute((), &self.versions, || {
            let seasons: Vec<Arc<ReconciledSeason>> = self
                .data
                .season_ids()
                .into_iter()
                .map(|season| self.reconciled_season(season))
                .collect();
            aggregate_all_time(&self.data, seasons.iter().map(|s| s.as_ref()), &self.diagnostics)
        })
    }

    /// Expected wins and luck for one season, or summed over a career.
    pub fn luck_table(&self, scope: MatrixScope) -> Arc<Vec<LuckRow>> {
        let epsilon = self.analysis.score_epsilon;
        self.luck.get_or_compute(scope, &self.versions, || match scope {
            MatrixScope::Season(season) => build_luck_table(
                &self.season_totals(season),
                self.analysis.pythagorean_exponent,
                epsilon,
            ),
            MatrixScope::Career => {
                let tables: Vec<Arc<Vec<LuckRow>>> = self
                    .data
                    .season_ids()
                    .into_iter()
                    .map(|season| self.luck_table(MatrixScope::Season(season)))
                    .collect();
                combine_luck_tables(tables.iter().map(|t| t.as_slice()), epsilon)
            }
        })
    }

    pub fn career_luck(&self) -> Arc<Vec<LuckRow>> {
        self.luck_table(MatrixScope::Career)
    }

    pub fn career_consistency_index(&self) -> Arc<Vec<ConsistencyRow>> {
        self.consistency.get_or_compute((), &self.versions, || {
            build_career_consistency_index(
                &self.data,
                &self.career_index(),
                &self.season_indices(),
                &self.diagnostics,
            )
        })
    }

    /// Expected wins with the configured exponent.
    pub fn calculate_expected_wins(&self, points_for: f64, points_against: f64, games: u32) -> f64 {
        calculate_expected_wins(points_for, points_against, games, self.analysis.pythagorean_exponent)
    }

    /// Competition ranks with the configured epsilon.
    pub fn build_ranks(&self, values: &[(OwnerId, f64)]) -> Vec<RankedValue> {
        build_ranks(values, self.analysis.score_epsilon)
    }
}

impl std::fmt::Debug for League {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("League")
            .field("owners", &self.data.owners.len())
            .field("seasons", &self.data.season_ids().len())
            .field("versions", &self.versions)
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

fn compare_standings(a: &SeasonStandingsEntry, b: &SeasonStandingsEntry) -> Ordering {
    let rank = match (a.regular_season_rank, b.regular_season_rank) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    rank.then(b.record.wins.cmp(&a.record.wins))
        .then_with(|| a.owner_id.cmp(&b.owner_id))
}
