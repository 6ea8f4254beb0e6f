mod contact;
mod proximity;
mod pursuit;
mod waves;

pub use contact::ContactSystem;
pub use proximity::ProximitySystem;
pub use pursuit::PursuitSystem;
pub use waves::WaveSystem;
