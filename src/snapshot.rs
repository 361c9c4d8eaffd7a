use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::world::{World, WorldSnapshot};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct SnapshotFile<'a> {
    generated_at: String,
    #[serde(flatten)]
    world: &'a WorldSnapshot,
}

/// Writes a JSON view of the world every `interval` ticks. An interval of
/// zero disables writing.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval,
        }
    }

    pub fn maybe_write(
        &self,
        world: &World,
        scenario_name: &str,
    ) -> Result<Option<PathBuf>, SnapshotError> {
        let tick = world.tick_count();
        if self.interval == 0 || tick % self.interval != 0 {
            return Ok(None);
        }
        self.write(world, scenario_name).map(Some)
    }

    pub fn write(&self, world: &World, scenario_name: &str) -> Result<PathBuf, SnapshotError> {
        let dir = self.dir.join(scenario_name);
        fs::create_dir_all(&dir)?;
        let file_path = dir.join(format!("tick_{:06}.json", world.tick_count()));
        let snapshot = world.snapshot(scenario_name);
        let file = SnapshotFile {
            generated_at: chrono::Utc::now().to_rfc3339(),
            world: &snapshot,
        };
        fs::write(&file_path, serde_json::to_string_pretty(&file)?)?;
        Ok(file_path)
    }
}
