pub mod config;
pub mod engine;
pub mod follow;
pub mod geo;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod status;
pub mod systems;
pub mod telemetry;
pub mod web;
pub mod world;

pub use config::{ConfigLoader, GameConfig};
pub use engine::{Engine, EngineBuilder, EngineSettings, TickSummary};
pub use geo::Coordinate;
pub use state::GameState;
pub use world::{Monster, MonsterId, MonsterPopulation, World};
