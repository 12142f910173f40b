//! Uniform `[0.0, 1.0)` draws for probabilistic rules

use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed draws in `[0.0, 1.0)`
///
/// Implementations must tolerate concurrent callers; pods are evaluated in
/// parallel with no ordering guarantee between draws.
pub trait ChanceSource: Send + Sync + std::fmt::Debug {
    fn draw(&self) -> f64;
}

/// Shared handle rules hold on to
pub type SharedChanceSource = Arc<dyn ChanceSource>;

/// Thread-local OS-seeded generator
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl ChanceSource for ThreadRngSource {
    fn draw(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic generator seeded once, for reproducible runs
#[derive(Debug)]
pub struct SeededSource {
    rng: Mutex<StdRng>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ChanceSource for SeededSource {
    fn draw(&self) -> f64 {
        self.rng.lock().gen::<f64>()
    }
}

/// Always returns the same draw
#[derive(Debug, Clone, Copy)]
pub struct FixedSource(f64);

impl FixedSource {
    /// Clamped into `[0.0, 1.0)`
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0 - f64::EPSILON))
    }
}

impl ChanceSource for FixedSource {
    fn draw(&self) -> f64 {
        self.0
    }
}

/// Thread-local generator behind a shared handle
pub fn default_source() -> SharedChanceSource {
    Arc::new(ThreadRngSource)
}
