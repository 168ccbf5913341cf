//! Filesystem loading of league payloads.
//!
//! Expected layout under the data directory:
//! - `owners.json` — owner roster
//! - `standings.json` — season → owner → standings entry
//! - `seasons.json` — season → metadata
//! - `matchups/<season>.json` — week key → team key → weekly entry
//!
//! Missing files load as empty collections. Malformed JSON is an error.

pub mod payload;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::LeagueData;
use payload::LeaguePayloads;

pub use payload::parse_score;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn owners_path(&self) -> PathBuf {
        self.data_dir.join("owners.json")
    }

    pub fn standings_path(&self) -> PathBuf {
        self.data_dir.join("standings.json")
    }

    pub fn seasons_path(&self) -> PathBuf {
        self.data_dir.join("seasons.json")
    }

    pub fn matchups_dir(&self) -> PathBuf {
        self.data_dir.join("matchups")
    }

    pub fn matchups_path(&self, season: &str) -> PathBuf {
        self.matchups_dir().join(format!("{}.json", season))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Read and deserialize a JSON file; a missing file is `Ok(None)`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    if !path.exists() {
        debug!("No file at {:?}", path);
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Read every raw payload from the data directory.
pub fn read_payloads(config: &StorageConfig) -> Result<LeaguePayloads, StorageError> {
    if !config.data_dir.is_dir() {
        return Err(StorageError::PathNotFound(config.data_dir.clone()));
    }

    let mut payloads = LeaguePayloads {
        owners: read_json(&config.owners_path())?.unwrap_or_default(),
        standings: read_json(&config.standings_path())?.unwrap_or_default(),
        seasons: read_json(&config.seasons_path())?.unwrap_or_default(),
        ..Default::default()
    };

    let matchups_dir = config.matchups_dir();
    if matchups_dir.is_dir() {
        let mut paths: Vec<PathBuf> = fs::read_dir(&matchups_dir)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            let Some(season) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
            else {
                warn!("Skipping matchup file with unreadable name: {:?}", path);
                continue;
            };
            if let Some(weeks) = read_json(&path)? {
                payloads.matchups.insert(season, weeks);
            }
        }
    } else {
        warn!("No matchups directory at {:?}; weekly data unavailable", matchups_dir);
    }

    Ok(payloads)
}

/// Load the league history from the data directory.
pub fn load_league(config: &StorageConfig) -> Result<LeagueData, StorageError> {
    let data = read_payloads(config)?.into_league_data();
    info!(
        "Loaded league data from {:?}: {} owners, {} seasons",
        config.data_dir,
        data.owners.len(),
        data.season_ids().len()
    );
    Ok(data)
}
