use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

/// Ends the game when any monster reaches the lethal radius. Runs last so a
/// wave spawned this tick has already moved.
pub struct ContactSystem {
    lethal_radius_m: f64,
}

impl ContactSystem {
    pub fn new(lethal_radius_m: f64) -> Self {
        Self { lethal_radius_m }
    }
}

impl Default for ContactSystem {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl System for ContactSystem {
    fn name(&self) -> &str {
        "contact"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        if world.population.is_any_within(ctx.player, self.lethal_radius_m) {
            world.state.is_game_over = true;
            tracing::info!(
                scenario = ctx.scenario_name,
                elapsed_seconds = ctx.elapsed_seconds,
                survived = %world.state.formatted_time(),
                "game over"
            );
        }
        Ok(())
    }
}
