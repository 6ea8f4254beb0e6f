use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::world::World;

/// Dumps the world as pretty JSON every `interval_ticks` ticks, one file per
/// tick under `<dir>/<scenario>/run_NNN/`. Each reset starts a new run
/// directory since the tick counter restarts. An interval of zero disables it.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_ticks: u64,
    run: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval_ticks: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_ticks,
            run: 0,
        }
    }

    pub fn run(&self) -> u64 {
        self.run
    }

    pub fn next_run(&mut self) {
        self.run += 1;
    }

    pub fn maybe_write(&self, world: &World, scenario: &str) -> Result<Option<PathBuf>> {
        let tick = world.state().elapsed_seconds;
        if self.interval_ticks == 0 || tick == 0 || tick % self.interval_ticks != 0 {
            return Ok(None);
        }

        let dir = self.dir.join(scenario).join(format!("run_{:03}", self.run));
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
        let path = dir.join(format!("tick_{tick:06}.json"));
        let json = serde_json::to_string_pretty(&world.snapshot(scenario))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        tracing::debug!(path = %path.display(), "wrote snapshot");
        Ok(Some(path))
    }
}
