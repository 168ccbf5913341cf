//! Pairwise record matrices.
//!
//! Both the all-play and head-to-head views are square tables of
//! [`PairRecord`]s: cell `(row, col)` is the row team's record against the
//! column team. Teams are ordered by total wins, best first.

pub mod all_play;
pub mod head_to_head;

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::identity::normalize_team_name;
use crate::models::{Outcome, PairRecord, SeasonId, WinLossRecord};

pub use all_play::{build_career_all_play, build_season_all_play};
pub use head_to_head::{build_career_head_to_head, build_head_to_head, build_season_head_to_head};

/// Which slice of history a matrix covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixScope {
    Season(SeasonId),
    Career,
}

/// A finished record matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordMatrix {
    /// Display labels, in row/column order
    teams: Vec<String>,

    /// Stable keys behind each label (normalized team name or owner id)
    keys: Vec<String>,

    records: Vec<Vec<PairRecord>>,

    /// Row totals against every column
    totals: Vec<WinLossRecord>,

    /// Weeks that contributed at least one result
    weeks_count: u32,

    #[serde(skip)]
    lookup: HashMap<String, usize>,
}

impl RecordMatrix {
    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn weeks_count(&self) -> u32 {
        self.weeks_count
    }

    /// Row index for a key, label, or label without its `" (N)"` suffix.
    /// Matching ignores case and surrounding whitespace.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(&normalize_team_name(name)).copied()
    }

    /// Record of `row` against `col`. The diagonal is always empty.
    pub fn record(&self, row: usize, col: usize) -> PairRecord {
        self.records
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or_default()
    }

    /// Record of one team against another, looked up by name.
    pub fn record_between(&self, team: &str, opponent: &str) -> Option<PairRecord> {
        Some(self.record(self.index_of(team)?, self.index_of(opponent)?))
    }

    pub fn total_record(&self, row: usize) -> WinLossRecord {
        self.totals.get(row).copied().unwrap_or_default()
    }
}

/// Strip a trailing `" (N)"` season count from a label.
pub fn strip_season_count(label: &str) -> &str {
    let trimmed = label.trim_end();
    let Some(body) = trimmed.strip_suffix(')') else {
        return trimmed;
    };
    match body.rfind(" (") {
        Some(pos) if body[pos + 2..].chars().all(|c| c.is_ascii_digit()) && pos + 2 < body.len() => {
            &body[..pos]
        }
        _ => trimmed,
    }
}

/// Accumulates results before the team order is known.
#[derive(Debug, Default)]
pub struct MatrixBuilder {
    keys: Vec<String>,
    labels: Vec<String>,
    index: HashMap<String, usize>,
    cells: BTreeMap<(usize, usize), PairRecord>,
    weeks: HashSet<(SeasonId, u32)>,
}

impl MatrixBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a team and return its builder index. The first label given
    /// for a key is kept.
    pub fn add_team(&mut self, key: &str, label: &str) -> usize {
        if let Some(&idx) = self.index.get(key) {
            return idx;
        }
        let idx = self.keys.len();
        self.keys.push(key.to_string());
        self.labels.push(label.to_string());
        self.index.insert(key.to_string(), idx);
        idx
    }

    /// Replace a registered team's label.
    pub fn set_label(&mut self, key: &str, label: String) {
        if let Some(&idx) = self.index.get(key) {
            self.labels[idx] = label;
        }
    }

    /// Record one outcome for `row` against `col` only.
    pub fn record(&mut self, row: usize, col: usize, outcome: Outcome) {
        if row == col {
            return;
        }
        self.cells.entry((row, col)).or_default().record(outcome);
    }

    /// Record a game for both sides.
    pub fn record_game(&mut self, a: usize, b: usize, outcome: Outcome) {
        if a == b {
            return;
        }
        self.record(a, b, outcome);
        self.record(b, a, outcome.flipped());
    }

    /// Count a week as contributing. Repeats are ignored.
    pub fn count_week(&mut self, season: SeasonId, week: u32) {
        self.weeks.insert((season, week));
    }

    /// Order teams and build the matrix. `None` when no week contributed.
    pub fn finish(self) -> Option<RecordMatrix> {
        if self.keys.is_empty() || self.weeks.is_empty() {
            return None;
        }

        let n = self.keys.len();
        let mut totals = vec![WinLossRecord::default(); n];
        for (&(row, _), rec) in &self.cells {
            totals[row] += *rec;
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            totals[b]
                .wins
                .cmp(&totals[a].wins)
                .then_with(|| self.labels[a].cmp(&self.labels[b]))
                .then_with(|| self.keys[a].cmp(&self.keys[b]))
        });

        let mut records = vec![vec![PairRecord::default(); n]; n];
        for (&(row, col), rec) in &self.cells {
            let new_row = order.iter().position(|&i| i == row);
            let new_col = order.iter().position(|&i| i == col);
            if let (Some(r), Some(c)) = (new_row, new_col) {
                records[r][c] = *rec;
            }
        }

        let teams: Vec<String> = order.iter().map(|&i| self.labels[i].clone()).collect();
        let keys: Vec<String> = order.iter().map(|&i| self.keys[i].clone()).collect();
        let totals: Vec<WinLossRecord> = order.iter().map(|&i| totals[i]).collect();

        let mut lookup = HashMap::new();
        for (idx, (key, label)) in keys.iter().zip(&teams).enumerate() {
            for name in [key.as_str(), label.as_str(), strip_season_count(label)] {
                lookup.entry(normalize_team_name(name)).or_insert(idx);
            }
        }

        Some(RecordMatrix {
            teams,
            keys,
            records,
            totals,
            weeks_count: self.weeks.len() as u32,
            lookup,
        })
    }
}
