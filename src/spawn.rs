//! Spawn placement inside an annulus around a reference point.

use std::f64::consts::TAU;

use rand::Rng;

use crate::geo::Coordinate;

pub const DEFAULT_MIN_RADIUS_DEG: f64 = 0.002;
pub const DEFAULT_MAX_RADIUS_DEG: f64 = 0.004;

/// Radii are expressed in degrees of arc, not meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlanner {
    min_radius: f64,
    max_radius: f64,
}

impl SpawnPlanner {
    /// Callers guarantee `0 <= min_radius <= max_radius` and `max_radius > 0`;
    /// the config layer validates both.
    pub fn new(min_radius: f64, max_radius: f64) -> Self {
        Self {
            min_radius,
            max_radius,
        }
    }

    pub fn min_radius(&self) -> f64 {
        self.min_radius
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Picks a point with uniform area density over the annulus.
    ///
    /// The longitude offset is stretched by `1 / cos(latitude)` so the ring
    /// stays roughly circular away from the equator.
    pub fn calculate_spawn_position<R: Rng>(
        &self,
        center: Coordinate,
        rng: &mut R,
    ) -> Coordinate {
        let theta = rng.gen_range(0.0..TAU);
        let min_sq = self.min_radius * self.min_radius;
        let max_sq = self.max_radius * self.max_radius;
        let radius = loop {
            let r_sq = rng.gen_range(min_sq..=max_sq);
            if r_sq > 0.0 {
                break r_sq.sqrt();
            }
        };

        let offset_lat = radius * theta.cos();
        let offset_lon = radius * theta.sin() / center.latitude.to_radians().cos();
        Coordinate::new(center.latitude + offset_lat, center.longitude + offset_lon)
    }
}

impl Default for SpawnPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_RADIUS_DEG, DEFAULT_MAX_RADIUS_DEG)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn degree_radius(center: Coordinate, point: Coordinate) -> f64 {
        let d_lat = point.latitude - center.latitude;
        let d_lon = (point.longitude - center.longitude) * center.latitude.to_radians().cos();
        (d_lat * d_lat + d_lon * d_lon).sqrt()
    }

    #[test]
    fn spawns_inside_annulus_at_various_latitudes() {
        let planner = SpawnPlanner::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let centers = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(52.2297, 21.0122),
            Coordinate::new(-33.8688, 151.2093),
            Coordinate::new(51.5074, -0.1278),
        ];
        for center in centers {
            for _ in 0..100 {
                let spawn = planner.calculate_spawn_position(center, &mut rng);
                let r = degree_radius(center, spawn);
                assert!(
                    r >= DEFAULT_MIN_RADIUS_DEG - 1e-12 && r <= DEFAULT_MAX_RADIUS_DEG + 1e-12,
                    "radius {r} outside annulus around {center}"
                );
                assert_ne!(spawn, center);
            }
        }
    }

    #[test]
    fn zero_inner_radius_never_returns_center() {
        let planner = SpawnPlanner::new(0.0, 0.001);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let center = Coordinate::new(10.0, 10.0);
        for _ in 0..500 {
            assert_ne!(planner.calculate_spawn_position(center, &mut rng), center);
        }
    }

    #[test]
    fn repeated_draws_differ() {
        let planner = SpawnPlanner::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let center = Coordinate::new(52.2297, 21.0122);
        let a = planner.calculate_spawn_position(center, &mut rng);
        let b = planner.calculate_spawn_position(center, &mut rng);
        assert_ne!(a, b);
    }
}
