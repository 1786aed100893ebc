// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Process-wide random source.
//!
//! One generator is created at startup and handed to whatever needs
//! randomness. Each caller takes the lock once for its whole draw
//! sequence, so concurrent melodies never interleave draws.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

/// Shared, seedable random generator
#[derive(Debug, Clone)]
pub struct SharedRng {
    inner: Arc<Mutex<StdRng>>,
    seed: Option<u64>,
}

impl SharedRng {
    /// Deterministic generator. Same seed, same stream.
    pub fn seeded(seed: u64) -> Self {
        debug!(seed, "seeding random generator");
        Self {
            inner: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
            seed: Some(seed),
        }
    }

    /// Generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StdRng::from_entropy())),
            seed: None,
        }
    }

    /// Seeded when a seed is given, entropy otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Seed this generator was created with, if deterministic
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Run `f` with exclusive access to the generator
    pub fn with<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("random generator lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        f(&mut *guard)
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
