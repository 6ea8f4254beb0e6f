//! Proximity summary shown to the player every few seconds.

use std::fmt;

use crate::{
    geo::{self, Cardinal, Coordinate},
    world::MonsterPopulation,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusReport {
    Clear,
    Threats {
        count: usize,
        nearest_distance_m: f64,
        direction: Cardinal,
    },
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusReport::Clear => f.write_str("No monsters detected nearby. Stay safe!"),
            StatusReport::Threats {
                count,
                nearest_distance_m,
                direction,
            } => {
                let noun = if *count == 1 { "monster" } else { "monsters" };
                write!(
                    f,
                    "{count} {noun} approaching! Nearest one is {} away to the {direction}.",
                    geo::format_distance(*nearest_distance_m)
                )
            }
        }
    }
}

pub fn assess(population: &MonsterPopulation, player: Coordinate) -> StatusReport {
    match population.nearest(player) {
        Some((monster, distance)) => StatusReport::Threats {
            count: population.len(),
            nearest_distance_m: distance,
            direction: geo::bearing_to_cardinal(geo::bearing(player, monster.position)),
        },
        None => StatusReport::Clear,
    }
}

pub fn status_message(population: &MonsterPopulation, player: Coordinate) -> String {
    assess(population, player).to_string()
}
