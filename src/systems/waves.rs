use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

/// Spawns the opening wave on the first tick with a player fix, then another
/// wave every `interval_seconds`. Both can fire on the same tick.
pub struct WaveSystem {
    wave_size: i32,
    interval_seconds: u64,
}

impl WaveSystem {
    pub fn new(wave_size: i32, interval_seconds: u64) -> Self {
        Self {
            wave_size,
            interval_seconds,
        }
    }
}

impl Default for WaveSystem {
    fn default() -> Self {
        Self::new(3, 10)
    }
}

impl System for WaveSystem {
    fn name(&self) -> &str {
        "waves"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        if !world.state.monsters_spawned {
            world.population.spawn_wave(ctx.player, self.wave_size, rng)?;
            world.state.monsters_spawned = true;
            tracing::info!(
                elapsed_seconds = ctx.elapsed_seconds,
                size = self.wave_size,
                "initial wave spawned"
            );
        }

        if self.interval_seconds > 0 && ctx.elapsed_seconds % self.interval_seconds == 0 {
            world.population.spawn_wave(ctx.player, self.wave_size, rng)?;
            tracing::info!(
                elapsed_seconds = ctx.elapsed_seconds,
                population = world.population.len(),
                "wave spawned"
            );
        }
        Ok(())
    }
}
