use std::path::PathBuf;

use anyhow::Result;

use crate::{
    config::GameConfig,
    geo::Coordinate,
    rng::{RngManager, SystemRng},
    snapshot::SnapshotWriter,
    state::GameState,
    systems::{ContactSystem, ProximitySystem, PursuitSystem, WaveSystem},
    world::{MonsterPopulation, World, WorldSnapshot},
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub dt_seconds: f64,
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
}

impl EngineSettings {
    pub fn from_config(config: &GameConfig, snapshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            scenario_name: config.name.clone(),
            seed: config.seed,
            dt_seconds: config.dt_seconds(),
            snapshot_interval_ticks: config.snapshot_interval_ticks,
            snapshot_dir: snapshot_dir.into(),
        }
    }
}

pub struct EngineBuilder {
    settings: EngineSettings,
    population: MonsterPopulation,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            population: MonsterPopulation::default(),
            systems: Vec::new(),
        }
    }

    pub fn with_population(mut self, population: MonsterPopulation) -> Self {
        self.population = population;
        self
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn push_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_ticks,
            ),
            world: World::new(self.population),
            settings: self.settings,
        }
    }
}

/// Outcome of one scheduler firing.
#[derive(Debug, Clone)]
pub struct TickSummary {
    pub state: GameState,
    pub monster_count: usize,
    /// The timer must not be re-armed after this tick.
    pub game_over: bool,
}

/// Owns the world and runs the tick pipeline over it.
///
/// Systems only run on ticks where a player position is known. Time still
/// advances on ticks without one.
pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
    world: World,
    settings: EngineSettings,
}

impl Engine {
    /// The standard pipeline: waves, pursuit, proximity, contact.
    pub fn from_config(config: &GameConfig, snapshot_dir: impl Into<PathBuf>) -> Self {
        EngineBuilder::new(EngineSettings::from_config(config, snapshot_dir))
            .with_population(config.build_population())
            .with_system(WaveSystem::new(
                config.waves.size,
                config.waves.interval_seconds,
            ))
            .with_system(PursuitSystem::new())
            .with_system(ProximitySystem::new(
                config.threat.warning_radius_m,
                config.status_interval_seconds,
            ))
            .with_system(ContactSystem::new(config.threat.lethal_radius_m))
            .build()
    }

    /// Returns `None` without touching anything once the game is over.
    pub fn tick(&mut self, player: Option<Coordinate>) -> Result<Option<TickSummary>> {
        if self.world.state.is_game_over {
            return Ok(None);
        }

        self.world.state.elapsed_seconds += 1;
        let elapsed_seconds = self.world.state.elapsed_seconds;

        match player {
            Some(player) => {
                for system in &mut self.systems {
                    let mut rng_stream = self.rng.stream(system.name());
                    let ctx = SystemContext {
                        elapsed_seconds,
                        dt_seconds: self.settings.dt_seconds,
                        player,
                        scenario_name: &self.settings.scenario_name,
                    };
                    system.run(&ctx, &mut self.world, &mut rng_stream)?;
                }
            }
            None => {
                self.world.state.status_message = None;
                tracing::debug!(elapsed_seconds, "no player fix, simulation idle this tick");
            }
        }

        // Snapshot IO failures are logged, never fatal.
        if let Err(err) = self
            .snapshot_writer
            .maybe_write(&self.world, &self.settings.scenario_name)
        {
            tracing::warn!(elapsed_seconds, error = %format!("{err:#}"), "snapshot write failed");
        }

        Ok(Some(TickSummary {
            state: self.world.state.clone(),
            monster_count: self.world.population.len(),
            game_over: self.world.state.is_game_over,
        }))
    }

    /// Runs up to `ticks` ticks, asking `position` for the player fix before
    /// each one. Stops early on game over and returns the ticks executed.
    pub fn run_with_hook<P, F>(&mut self, ticks: u64, mut position: P, mut hook: F) -> Result<u64>
    where
        P: FnMut(u64) -> Option<Coordinate>,
        F: FnMut(WorldSnapshot),
    {
        let mut executed = 0;
        for _ in 0..ticks {
            let player = position(self.world.state.elapsed_seconds + 1);
            let Some(summary) = self.tick(player)? else {
                break;
            };
            executed += 1;
            hook(self.snapshot());
            if summary.game_over {
                break;
            }
        }
        Ok(executed)
    }

    pub fn run<P>(&mut self, ticks: u64, position: P) -> Result<u64>
    where
        P: FnMut(u64) -> Option<Coordinate>,
    {
        self.run_with_hook(ticks, position, |_| {})
    }

    /// Clears every monster and starts over from a fresh state. The only way
    /// out of game over.
    pub fn reset(&mut self) {
        self.world.reset();
        self.snapshot_writer.next_run();
        tracing::info!(
            scenario = %self.settings.scenario_name,
            run = self.snapshot_writer.run(),
            "game reset"
        );
    }

    pub fn state(&self) -> &GameState {
        &self.world.state
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot(&self.settings.scenario_name)
    }

    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }
}

pub struct SystemContext<'a> {
    pub elapsed_seconds: u64,
    pub dt_seconds: f64,
    pub player: Coordinate,
    pub scenario_name: &'a str,
}

pub trait System: Send {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}
