use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::{
    follow::DEFAULT_RECENTER_ZOOM,
    geo::Coordinate,
    spawn::{SpawnPlanner, DEFAULT_MAX_RADIUS_DEG, DEFAULT_MIN_RADIUS_DEG},
    world::{MonsterPopulation, MonsterTemplate},
};

pub const SECONDS_PER_TICK: f64 = 1.0;

fn default_name() -> String {
    "default".to_string()
}

fn default_seed() -> u64 {
    7
}

fn default_tick_period_ms() -> u64 {
    1000
}

fn default_wave_size() -> i32 {
    3
}

fn default_wave_interval_seconds() -> u64 {
    10
}

fn default_min_radius_deg() -> f64 {
    DEFAULT_MIN_RADIUS_DEG
}

fn default_max_radius_deg() -> f64 {
    DEFAULT_MAX_RADIUS_DEG
}

fn default_warning_radius_m() -> f64 {
    67.0
}

fn default_lethal_radius_m() -> f64 {
    5.0
}

fn default_status_interval_seconds() -> u64 {
    5
}

fn default_zoom() -> f32 {
    DEFAULT_RECENTER_ZOOM
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Wall-clock pacing of the live session. One tick is always one
    /// simulated second, whatever the pacing.
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,
    /// Tick budget for headless runs.
    #[serde(default)]
    pub ticks: Option<u64>,
    /// Fixed player position for headless runs.
    #[serde(default)]
    pub player: Option<Coordinate>,
    #[serde(default)]
    pub waves: WaveConfig,
    #[serde(default)]
    pub spawn: SpawnConfig,
    #[serde(default)]
    pub monster: MonsterTemplate,
    #[serde(default)]
    pub threat: ThreatConfig,
    #[serde(default = "default_status_interval_seconds")]
    pub status_interval_seconds: u64,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub snapshot_interval_ticks: u64,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaveConfig {
    #[serde(default = "default_wave_size")]
    pub size: i32,
    #[serde(default = "default_wave_interval_seconds")]
    pub interval_seconds: u64,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            size: default_wave_size(),
            interval_seconds: default_wave_interval_seconds(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpawnConfig {
    #[serde(default = "default_min_radius_deg")]
    pub min_radius_deg: f64,
    #[serde(default = "default_max_radius_deg")]
    pub max_radius_deg: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            min_radius_deg: default_min_radius_deg(),
            max_radius_deg: default_max_radius_deg(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreatConfig {
    #[serde(default = "default_warning_radius_m")]
    pub warning_radius_m: f64,
    #[serde(default = "default_lethal_radius_m")]
    pub lethal_radius_m: f64,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self {
            warning_radius_m: default_warning_radius_m(),
            lethal_radius_m: default_lethal_radius_m(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_zoom")]
    pub zoom: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom: default_zoom(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            seed: default_seed(),
            tick_period_ms: default_tick_period_ms(),
            ticks: None,
            player: None,
            waves: WaveConfig::default(),
            spawn: SpawnConfig::default(),
            monster: MonsterTemplate::default(),
            threat: ThreatConfig::default(),
            status_interval_seconds: default_status_interval_seconds(),
            camera: CameraConfig::default(),
            snapshot_interval_ticks: 0,
            logging: LoggingConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: GameConfig =
            serde_yaml::from_str(text).context("Failed to parse game config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.tick_period_ms > 0, "tick_period_ms must be positive");
        ensure!(
            self.waves.size >= 0,
            "waves.size must not be negative (got {})",
            self.waves.size
        );
        ensure!(
            self.waves.interval_seconds > 0,
            "waves.interval_seconds must be positive"
        );
        ensure!(
            self.status_interval_seconds > 0,
            "status_interval_seconds must be positive"
        );
        ensure!(
            self.spawn.min_radius_deg >= 0.0 && self.spawn.max_radius_deg > 0.0,
            "spawn radii must be non-negative and max_radius_deg positive"
        );
        ensure!(
            self.spawn.min_radius_deg <= self.spawn.max_radius_deg,
            "spawn.min_radius_deg ({}) exceeds spawn.max_radius_deg ({})",
            self.spawn.min_radius_deg,
            self.spawn.max_radius_deg
        );
        ensure!(
            self.monster.speed_mps > 0.0,
            "monster.speed_mps must be positive"
        );
        ensure!(
            self.threat.lethal_radius_m >= 0.0 && self.threat.warning_radius_m >= 0.0,
            "threat radii must not be negative"
        );
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Simulated seconds per tick. Fixed, so elapsed time, wave cadence and
    /// movement stay in the same unit when the pacing changes.
    pub fn dt_seconds(&self) -> f64 {
        SECONDS_PER_TICK
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(600)
    }

    pub fn build_population(&self) -> MonsterPopulation {
        MonsterPopulation::new(
            SpawnPlanner::new(self.spawn.min_radius_deg, self.spawn.max_radius_deg),
            self.monster.clone(),
        )
    }
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<GameConfig> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        GameConfig::from_yaml_str(&data)
            .with_context(|| format!("Invalid config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_rules() {
        let config = GameConfig::default();
        assert_eq!(config.tick_period(), Duration::from_secs(1));
        assert_eq!(config.dt_seconds(), 1.0);
        assert_eq!(config.waves.size, 3);
        assert_eq!(config.waves.interval_seconds, 10);
        assert_eq!(config.threat.warning_radius_m, 67.0);
        assert_eq!(config.threat.lethal_radius_m, 5.0);
        assert_eq!(config.status_interval_seconds, 5);
        assert_eq!(config.monster.speed_mps, 10.0);
        assert_eq!(config.camera.zoom, 18.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn pacing_does_not_change_simulated_step() {
        let config = GameConfig::from_yaml_str("tick_period_ms: 250\n").unwrap();
        assert_eq!(config.tick_period(), Duration::from_millis(250));
        assert_eq!(config.dt_seconds(), 1.0);
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = GameConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config.name, "default");
        assert_eq!(config.spawn.min_radius_deg, 0.002);
        assert_eq!(config.monster.kind, "monster_anim");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = GameConfig::from_yaml_str(
            "name: park\nwaves:\n  interval_seconds: 20\nmonster:\n  speed_mps: 4.5\n",
        )
        .unwrap();
        assert_eq!(config.name, "park");
        assert_eq!(config.waves.size, 3);
        assert_eq!(config.waves.interval_seconds, 20);
        assert_eq!(config.monster.speed_mps, 4.5);
        assert_eq!(config.monster.name, "Monster");
    }

    #[test]
    fn rejects_inverted_spawn_ring() {
        let err = GameConfig::from_yaml_str(
            "spawn:\n  min_radius_deg: 0.01\n  max_radius_deg: 0.001\n",
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("exceeds"));
    }

    #[test]
    fn rejects_negative_wave_and_zero_interval() {
        assert!(GameConfig::from_yaml_str("waves:\n  size: -2\n").is_err());
        assert!(GameConfig::from_yaml_str("status_interval_seconds: 0\n").is_err());
    }
}
