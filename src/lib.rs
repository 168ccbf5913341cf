//! # League Ledger
//!
//! Reconciled records and derived statistics for a long-running fantasy
//! football league.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (owners, standings, weekly matchups)
//! - **identity**: Team display name to owner resolution
//! - **reconcile**: Weekly replay versus season standings, all-time records
//! - **matrix**: All-play and head-to-head record matrices
//! - **calculate**: Pythagorean expectation, luck, scoring consistency
//! - **league**: The memoizing engine tying the above together
//! - **storage**: Filesystem loading of JSON payloads
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod cache;
pub mod calculate;
pub mod config;
pub mod diagnostics;
pub mod identity;
pub mod league;
pub mod matrix;
pub mod models;
pub mod reconcile;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

pub use league::League;
pub use models::*;

/// Parse a payload week key (e.g., "week14", "Week 3", "7").
pub fn parse_week_key(s: &str) -> Option<u32> {
    let s = s.trim();
    let num_str = match s.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("week") => &s[4..],
        _ => s,
    };

    let week: u32 = num_str.trim().parse().ok()?;
    (week > 0).then_some(week)
}
