//! Random roll sources for probabilistic outcomes.
//!
//! The engine never owns randomness: callers thread a [`RollSource`] through
//! every tick so test harnesses can swap in fixed seeds or scripted sequences.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use salvo_core::error::{EngineError, Result};

/// A stream of uniform draws in `[0, 1)`.
pub trait RollSource {
    /// Next draw. An error is fatal for the current tick.
    fn next_roll(&mut self) -> Result<f64>;

    /// Number of draws consumed so far.
    fn drawn(&self) -> u64;
}

/// ChaCha8-backed stream. Same seed = same sequence.
#[derive(Debug, Clone)]
pub struct SeededRolls {
    rng: ChaCha8Rng,
    drawn: u64,
}

impl SeededRolls {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            drawn: 0,
        }
    }
}

impl RollSource for SeededRolls {
    fn next_roll(&mut self) -> Result<f64> {
        self.drawn += 1;
        Ok(self.rng.gen::<f64>())
    }

    fn drawn(&self) -> u64 {
        self.drawn
    }
}

/// Replays a fixed list of rolls, then reports exhaustion.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    rolls: VecDeque<f64>,
    drawn: u64,
}

impl ScriptedRolls {
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            drawn: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl RollSource for ScriptedRolls {
    fn next_roll(&mut self) -> Result<f64> {
        let value = self
            .rolls
            .pop_front()
            .ok_or(EngineError::RollsExhausted { drawn: self.drawn })?;
        if !(0.0..1.0).contains(&value) {
            return Err(EngineError::InvalidRoll { value });
        }
        self.drawn += 1;
        Ok(value)
    }

    fn drawn(&self) -> u64 {
        self.drawn
    }
}
