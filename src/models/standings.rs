//! End-of-season standings entries.

use serde::{Deserialize, Serialize};

use super::{OwnerId, WinLossRecord};

/// One owner's end-of-season record for one season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonStandingsEntry {
    /// Owner this entry belongs to (the key in the season map)
    pub owner_id: OwnerId,

    /// Team display name used that season
    pub team_name: String,

    pub manager_name: String,

    /// Official win/loss/tie record
    pub record: WinLossRecord,

    pub points_for: f64,
    pub points_against: f64,

    /// Weeks the owner posted the league's highest score
    pub high_points: Option<u32>,

    /// Weeks the owner posted the league's lowest score
    pub low_points: Option<u32>,

    /// Final playoff rank (blank in the payload means None)
    pub playoff_rank: Option<u32>,

    /// Final regular-season rank
    pub regular_season_rank: Option<u32>,

    pub moves: u32,
    pub trades: u32,
}

impl SeasonStandingsEntry {
    /// Create a standings entry with a record and points, other fields empty.
    pub fn new(
        owner_id: OwnerId,
        team_name: impl Into<String>,
        record: WinLossRecord,
        points_for: f64,
        points_against: f64,
    ) -> Self {
        let manager_name = owner_id.as_str().to_string();
        Self {
            owner_id,
            team_name: team_name.into(),
            manager_name,
            record,
            points_for,
            points_against,
            high_points: None,
            low_points: None,
            playoff_rank: None,
            regular_season_rank: None,
            moves: 0,
            trades: 0,
        }
    }
}

/// Parse a rank string the way a lenient integer parser would: optional
/// leading whitespace and sign, then the leading run of digits. Blank,
/// non-numeric and non-positive ranks yield None.
pub fn parse_rank(raw: &str) -> Option<u32> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() || negative {
        return None;
    }

    match digits.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(rank) => Some(rank),
    }
}
