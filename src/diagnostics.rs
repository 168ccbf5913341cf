//! Data-quality diagnostics.
//!
//! Nothing in the engine fails on bad source data. Entries that cannot be
//! used are skipped and reported here instead. Each diagnostic is emitted at
//! most once per engine lifetime, keyed by `season|week|reason|name`, so
//! recomputing a derived value does not repeat its warnings.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::models::{OwnerId, SeasonId, WinLossRecord};

/// A data-quality problem found while computing derived statistics.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("season {season} week {week}: entry has no usable team name")]
    BlankTeamName { season: SeasonId, week: u32 },

    #[error("season {season} week {week}: team name '{name}' maps to more than one owner")]
    AmbiguousTeamMapping {
        season: SeasonId,
        week: u32,
        name: String,
    },

    #[error("season {season} week {week}: no owner found for team '{name}'")]
    UnresolvedOwner {
        season: SeasonId,
        week: u32,
        name: String,
    },

    #[error("{owner} ({scope}): weekly results give {derived}, reference record is {reference}")]
    WinsMismatch {
        scope: String,
        owner: OwnerId,
        derived: WinLossRecord,
        reference: WinLossRecord,
    },

    #[error("season {season}: no season metadata")]
    MissingSeasonMetadata { season: SeasonId },

    #[error("season {season}: no weekly matchup data")]
    MissingWeeklyData { season: SeasonId },
}

impl Diagnostic {
    /// Short machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Diagnostic::BlankTeamName { .. } => "blank_team_name",
            Diagnostic::AmbiguousTeamMapping { .. } => "ambiguous_team_mapping",
            Diagnostic::UnresolvedOwner { .. } => "unresolved_owner",
            Diagnostic::WinsMismatch { .. } => "wins_mismatch",
            Diagnostic::MissingSeasonMetadata { .. } => "missing_season_metadata",
            Diagnostic::MissingWeeklyData { .. } => "missing_weekly_data",
        }
    }

    /// Deduplication key: `season|week|reason|name`.
    pub fn dedup_key(&self) -> String {
        let (season, week, name) = match self {
            Diagnostic::BlankTeamName { season, week } => {
                (season.to_string(), week.to_string(), String::new())
            }
            Diagnostic::AmbiguousTeamMapping { season, week, name }
            | Diagnostic::UnresolvedOwner { season, week, name } => {
                (season.to_string(), week.to_string(), name.clone())
            }
            Diagnostic::WinsMismatch { scope, owner, .. } => {
                (scope.clone(), "-".to_string(), owner.to_string())
            }
            Diagnostic::MissingSeasonMetadata { season }
            | Diagnostic::MissingWeeklyData { season } => {
                (season.to_string(), "-".to_string(), String::new())
            }
        };
        format!("{}|{}|{}|{}", season, week, self.reason(), name)
    }
}

/// Destination for diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Sink that logs through `tracing`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        warn!(reason = diagnostic.reason(), "{}", diagnostic);
    }
}

/// Deduplicating front for a [`DiagnosticSink`].
pub struct Diagnostics {
    sink: Arc<dyn DiagnosticSink>,
    seen: Mutex<HashSet<String>>,
    emitted: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            sink,
            seen: Mutex::new(HashSet::new()),
            emitted: Mutex::new(Vec::new()),
        }
    }

    /// Report a diagnostic. Returns true if it was emitted, false if an
    /// identical one was already reported.
    pub fn report(&self, diagnostic: Diagnostic) -> bool {
        if !lock(&self.seen).insert(diagnostic.dedup_key()) {
            return false;
        }

        self.sink.emit(&diagnostic);
        lock(&self.emitted).push(diagnostic);
        true
    }

    /// Every diagnostic emitted so far, in emission order.
    pub fn emitted(&self) -> Vec<Diagnostic> {
        lock(&self.emitted).clone()
    }

    /// Count of emitted diagnostics per reason.
    pub fn summary(&self) -> Vec<(&'static str, usize)> {
        let mut counts: Vec<(&'static str, usize)> = Vec::new();
        for d in lock(&self.emitted).iter() {
            match counts.iter_mut().find(|(r, _)| *r == d.reason()) {
                Some((_, n)) => *n += 1,
                None => counts.push((d.reason(), 1)),
            }
        }
        counts.sort();
        counts
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("emitted", &lock(&self.emitted).len())
            .finish()
    }
}

// A poisoned lock only means another thread panicked mid-report; the set is
// still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSink {
        count: AtomicUsize,
    }

    impl DiagnosticSink for CountingSink {
        fn emit(&self, _diagnostic: &Diagnostic) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn unresolved(name: &str) -> Diagnostic {
        Diagnostic::UnresolvedOwner {
            season: SeasonId(2006),
            week: 14,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_dedup_key_format() {
        assert_eq!(
            unresolved("big dogs").dedup_key(),
            "2006|14|unresolved_owner|big dogs"
        );
        assert_eq!(
            Diagnostic::MissingWeeklyData {
                season: SeasonId(2003)
            }
            .dedup_key(),
            "2003|-|missing_weekly_data|"
        );
    }

    #[test]
    fn test_report_deduplicates() {
        let sink = Arc::new(CountingSink::default());
        let diagnostics = Diagnostics::new(sink.clone());

        assert!(diagnostics.report(unresolved("big dogs")));
        assert!(!diagnostics.report(unresolved("big dogs")));
        assert!(diagnostics.report(unresolved("da squad")));

        assert_eq!(sink.count.load(Ordering::SeqCst), 2);
        assert_eq!(diagnostics.emitted().len(), 2);
    }

    #[test]
    fn test_summary_counts_by_reason() {
        let diagnostics = Diagnostics::new(Arc::new(CountingSink::default()));
        diagnostics.report(unresolved("a"));
        diagnostics.report(unresolved("b"));
        diagnostics.report(Diagnostic::BlankTeamName {
            season: SeasonId(2006),
            week: 2,
        });

        assert_eq!(
            diagnostics.summary(),
            vec![("blank_team_name", 1), ("unresolved_owner", 2)]
        );
    }

    #[test]
    fn test_display() {
        let d = Diagnostic::WinsMismatch {
            scope: "season 2006".to_string(),
            owner: OwnerId::from("Dana"),
            derived: WinLossRecord::new(9, 4, 0),
            reference: WinLossRecord::new(8, 5, 0),
        };
        assert_eq!(
            d.to_string(),
            "Dana (season 2006): weekly results give 9-4-0, reference record is 8-5-0"
        );
    }

    #[test]
    fn test_serialization_tagged() {
        let json = serde_json::to_value(unresolved("x")).unwrap();
        assert_eq!(json["kind"], "unresolved_owner");
        assert_eq!(json["season"], 2006);
    }
}
