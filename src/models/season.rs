//! Season metadata.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Schedule shape and data availability for one season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonMetadata {
    /// Last week of the regular season
    pub regular_season_end_week: u32,

    /// Last week of the season, playoffs included
    pub season_end_week: u32,

    /// Whether complete weekly detail exists for the season
    pub has_full_historical_details: bool,
}

impl SeasonMetadata {
    pub fn new(regular_season_end_week: u32, season_end_week: u32, has_full_historical_details: bool) -> Self {
        Self {
            regular_season_end_week,
            season_end_week: season_end_week.max(regular_season_end_week),
            has_full_historical_details,
        }
    }

    /// Regular-season week numbers.
    pub fn regular_season_weeks(&self) -> RangeInclusive<u32> {
        1..=self.regular_season_end_week
    }

    /// Every week of the season, playoffs included.
    pub fn season_weeks(&self) -> RangeInclusive<u32> {
        1..=self.season_end_week
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_ranges() {
        let meta = SeasonMetadata::new(14, 16, true);
        assert_eq!(meta.regular_season_weeks(), 1..=14);
        assert_eq!(meta.season_weeks(), 1..=16);
    }

    #[test]
    fn test_season_end_never_before_regular_end() {
        let meta = SeasonMetadata::new(14, 10, false);
        assert_eq!(meta.season_end_week, 14);
    }
}
