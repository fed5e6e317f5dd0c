//! Per-variant high score persistence
//!
//! One best score per game variant, stored as a flat JSON table keyed by
//! `highscore-<variant id>`. Persistence is best-effort: a missing or
//! corrupt file loads as empty, and a failed save logs a warning without
//! ever stalling the simulation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::sim::Variant;

/// Read/write access to the per-variant best score.
pub trait HighScoreStore {
    /// Best score on record for a variant, if any.
    fn get(&self, variant: Variant) -> Option<u64>;

    /// Record a new best. Called on every improvement during a run, so the
    /// latest value survives even if the process dies mid-game.
    fn set(&mut self, variant: Variant, score: u64);
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryHighScores {
    table: HashMap<Variant, u64>,
}

impl HighScoreStore for MemoryHighScores {
    fn get(&self, variant: Variant) -> Option<u64> {
        self.table.get(&variant).copied()
    }

    fn set(&mut self, variant: Variant, score: u64) {
        self.table.insert(variant, score);
    }
}

/// File-backed store, one JSON object for all variants.
#[derive(Debug)]
pub struct JsonHighScores {
    path: PathBuf,
    table: HashMap<String, u64>,
}

impl JsonHighScores {
    fn storage_key(variant: Variant) -> String {
        format!("highscore-{}", variant.id())
    }

    /// Load from `path`. Missing or unreadable data starts an empty table.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let table = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(table) => {
                    log::info!("loaded high scores from {}", path.display());
                    table
                }
                Err(err) => {
                    log::warn!("corrupt high score file {}: {err}", path.display());
                    HashMap::new()
                }
            },
            Err(_) => {
                log::info!("no high score file at {}, starting fresh", path.display());
                HashMap::new()
            }
        };
        Self { path, table }
    }

    /// Write-then-rename so a crash mid-save cannot corrupt the table.
    fn save(&self) {
        if let Err(err) = self.try_save() {
            log::warn!("failed to save high scores to {}: {err}", self.path.display());
        }
    }

    fn try_save(&self) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.table)
            .map_err(std::io::Error::other)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl HighScoreStore for JsonHighScores {
    fn get(&self, variant: Variant) -> Option<u64> {
        self.table.get(&Self::storage_key(variant)).copied()
    }

    fn set(&mut self, variant: Variant, score: u64) {
        self.table.insert(Self::storage_key(variant), score);
        self.save();
    }
}

/// Default storage location, next to the executable's working directory.
pub fn default_path() -> PathBuf {
    Path::new("retro-arena-scores.json").to_path_buf()
}
