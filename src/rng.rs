use std::collections::HashMap;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Hands out one reproducible random stream per named system.
///
/// Streams are derived lazily from the master generator in first-use order,
/// so two managers with the same seed and the same pipeline produce the same
/// spawn positions.
pub struct RngManager {
    master: ChaCha8Rng,
    streams: HashMap<String, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master: ChaCha8Rng::seed_from_u64(seed),
            streams: HashMap::new(),
        }
    }

    pub fn stream(&mut self, name: &str) -> SystemRng<'_> {
        let master = &mut self.master;
        let entry = self
            .streams
            .entry(name.to_string())
            .or_insert_with(|| ChaCha8Rng::seed_from_u64(master.next_u64()));
        SystemRng { inner: entry }
    }
}

pub struct SystemRng<'a> {
    inner: &'a mut ChaCha8Rng,
}

impl<'a> RngCore for SystemRng<'a> {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
