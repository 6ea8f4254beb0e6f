use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    status,
    world::World,
};

/// Raises the warning flag and produces the periodic status message.
pub struct ProximitySystem {
    warning_radius_m: f64,
    status_interval_seconds: u64,
}

impl ProximitySystem {
    pub fn new(warning_radius_m: f64, status_interval_seconds: u64) -> Self {
        Self {
            warning_radius_m,
            status_interval_seconds,
        }
    }
}

impl Default for ProximitySystem {
    fn default() -> Self {
        Self::new(67.0, 5)
    }
}

impl System for ProximitySystem {
    fn name(&self) -> &str {
        "proximity"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let show_warning = world
            .population
            .is_any_within(ctx.player, self.warning_radius_m);
        if show_warning && !world.state.show_warning {
            tracing::info!(elapsed_seconds = ctx.elapsed_seconds, "monster within warning radius");
        }
        world.state.show_warning = show_warning;

        world.state.status_message = if self.status_interval_seconds > 0
            && ctx.elapsed_seconds % self.status_interval_seconds == 0
        {
            Some(status::status_message(&world.population, ctx.player))
        } else {
            None
        };
        Ok(())
    }
}
