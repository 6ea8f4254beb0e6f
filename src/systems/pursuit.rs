use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

/// Moves every monster straight at the player.
pub struct PursuitSystem;

impl PursuitSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PursuitSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for PursuitSystem {
    fn name(&self) -> &str {
        "pursuit"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        world.population.advance(ctx.player, ctx.dt_seconds);
        Ok(())
    }
}
