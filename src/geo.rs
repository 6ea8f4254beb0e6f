//! Small-area geodesy helpers for coordinates in decimal degrees.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Great-circle distance in meters (haversine).
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Initial compass bearing from `a` toward `b`, in `[0, 360)`.
pub fn bearing(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let y = d_lon.sin() * lat_b.cos();
    let x = lat_a.cos() * lat_b.sin() - lat_a.sin() * lat_b.cos() * d_lon.cos();
    normalize_bearing(y.atan2(x).to_degrees())
}

fn normalize_bearing(bearing: f64) -> f64 {
    ((bearing % 360.0) + 360.0) % 360.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinal {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Cardinal {
    const SECTORS: [Cardinal; 8] = [
        Cardinal::North,
        Cardinal::NorthEast,
        Cardinal::East,
        Cardinal::SouthEast,
        Cardinal::South,
        Cardinal::SouthWest,
        Cardinal::West,
        Cardinal::NorthWest,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Cardinal::North => "North",
            Cardinal::NorthEast => "North-East",
            Cardinal::East => "East",
            Cardinal::SouthEast => "South-East",
            Cardinal::South => "South",
            Cardinal::SouthWest => "South-West",
            Cardinal::West => "West",
            Cardinal::NorthWest => "North-West",
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies a bearing into one of eight 45-degree sectors.
///
/// Sectors are half-open and centred on the compass points, so North covers
/// `[337.5, 360) ∪ [0, 22.5)`. Any finite input is wrapped into `[0, 360)`
/// first, which makes `-45.0` classify as North-West.
pub fn bearing_to_cardinal(bearing: f64) -> Cardinal {
    let normalized = normalize_bearing(bearing);
    let sector = ((normalized + 22.5) / 45.0).floor() as usize % 8;
    Cardinal::SECTORS[sector]
}

/// Human readable distance: whole meters below one kilometer, otherwise
/// kilometers with one decimal rounded half-to-even on the tenths.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        return format!("{} meters", meters.trunc() as i64);
    }
    let tenths = (meters / 100.0).round_ties_even() as i64;
    format!("{}.{} km", tenths / 10, tenths % 10)
}

/// Moves `from` toward `target` by `meters`, interpolating linearly in
/// degree space.
///
/// The fraction is not clamped: asking for more than the remaining distance
/// carries the point past the target along the same line.
pub fn move_toward(from: Coordinate, target: Coordinate, meters: f64) -> Coordinate {
    let total = distance(from, target);
    if total == 0.0 {
        return from;
    }
    let fraction = meters / total;
    Coordinate {
        latitude: from.latitude + (target.latitude - from.latitude) * fraction,
        longitude: from.longitude + (target.longitude - from.longitude) * fraction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WARSAW: Coordinate = Coordinate::new(52.2297, 21.0122);
    const LONDON: Coordinate = Coordinate::new(51.5074, -0.1278);

    #[test]
    fn distance_is_zero_for_same_point_and_symmetric() {
        assert_eq!(distance(WARSAW, WARSAW), 0.0);
        assert_eq!(distance(WARSAW, LONDON), distance(LONDON, WARSAW));
    }

    #[test]
    fn distance_matches_known_city_pair() {
        let km = distance(WARSAW, LONDON) / 1000.0;
        assert!((km - 1447.0).abs() < 10.0, "got {km} km");
    }

    #[test]
    fn bearing_points_along_axes() {
        let origin = Coordinate::new(0.0, 0.0);
        assert!((bearing(origin, Coordinate::new(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((bearing(origin, Coordinate::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((bearing(origin, Coordinate::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((bearing(origin, Coordinate::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
        assert_eq!(bearing(WARSAW, WARSAW), 0.0);
    }

    #[test]
    fn cardinal_sectors() {
        let cases = [
            (0.0, Cardinal::North),
            (10.0, Cardinal::North),
            (22.5, Cardinal::NorthEast),
            (45.0, Cardinal::NorthEast),
            (90.0, Cardinal::East),
            (135.0, Cardinal::SouthEast),
            (180.0, Cardinal::South),
            (225.0, Cardinal::SouthWest),
            (270.0, Cardinal::West),
            (315.0, Cardinal::NorthWest),
            (337.5, Cardinal::North),
            (350.0, Cardinal::North),
            (360.0, Cardinal::North),
        ];
        for (input, expected) in cases {
            assert_eq!(bearing_to_cardinal(input), expected, "bearing {input}");
        }
    }

    #[test]
    fn cardinal_wraps_out_of_range_input() {
        assert_eq!(bearing_to_cardinal(-45.0), Cardinal::NorthWest);
        assert_eq!(bearing_to_cardinal(-90.0), Cardinal::West);
        assert_eq!(bearing_to_cardinal(-720.0), Cardinal::North);
        assert_eq!(bearing_to_cardinal(405.0), Cardinal::NorthEast);
        assert_eq!(Cardinal::NorthWest.to_string(), "North-West");
    }

    #[test]
    fn format_distance_meters_truncate() {
        assert_eq!(format_distance(0.0), "0 meters");
        assert_eq!(format_distance(500.0), "500 meters");
        assert_eq!(format_distance(567.8), "567 meters");
        assert_eq!(format_distance(999.0), "999 meters");
        assert_eq!(format_distance(999.9), "999 meters");
    }

    #[test]
    fn format_distance_kilometers_round_half_even() {
        assert_eq!(format_distance(1000.0), "1.0 km");
        assert_eq!(format_distance(2500.0), "2.5 km");
        assert_eq!(format_distance(1550.0), "1.6 km");
        assert_eq!(format_distance(1450.0), "1.4 km");
        assert_eq!(format_distance(10_000.0), "10.0 km");
    }

    #[test]
    fn move_toward_same_point_is_identity() {
        assert_eq!(move_toward(WARSAW, WARSAW, 25.0), WARSAW);
    }

    #[test]
    fn move_toward_reduces_distance_by_step() {
        let start = Coordinate::new(52.2327, 21.0122);
        let before = distance(start, WARSAW);
        let moved = move_toward(start, WARSAW, 10.0);
        let after = distance(moved, WARSAW);
        assert!((before - after - 10.0).abs() < 0.01, "moved {}", before - after);
    }

    #[test]
    fn move_toward_overshoots_when_step_exceeds_distance() {
        let from = Coordinate::new(0.0, 0.0);
        let target = Coordinate::new(0.0, 0.001);
        let step = distance(from, target) * 2.0;
        let moved = move_toward(from, target, step);
        assert!((moved.longitude - 0.002).abs() < 1e-12);
        assert!(moved.latitude.abs() < 1e-12);
    }
}
