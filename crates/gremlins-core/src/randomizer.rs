#![forbid(unsafe_code)]

//! Randomization sources.
//!
//! Gremlins only ever ask for one distribution: a natural number drawn
//! uniformly from `0..=max`. What a negative `max` means is part of each
//! implementation's contract; both bundled implementations reject it with
//! [`GremlinError::InvalidRange`].

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{GremlinError, Result};

/// A source of uniformly distributed naturals.
pub trait Randomizer {
    /// Draw an integer from `0..=max`.
    fn natural(&mut self, max: i64) -> Result<u64>;
}

impl<R: Randomizer + ?Sized> Randomizer for Box<R> {
    fn natural(&mut self, max: i64) -> Result<u64> {
        (**self).natural(max)
    }
}

fn check_max(max: i64) -> Result<u64> {
    u64::try_from(max).map_err(|_| GremlinError::InvalidRange { min: 0, max })
}

/// The default randomizer: a small, fast PRNG.
///
/// Seeded construction gives reproducible runs; [`SeededRandomizer::from_entropy`]
/// does not.
#[derive(Debug, Clone)]
pub struct SeededRandomizer {
    rng: SmallRng,
    seed: Option<u64>,
}

impl SeededRandomizer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
            seed: None,
        }
    }

    /// The seed this randomizer was created with, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for SeededRandomizer {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl Randomizer for SeededRandomizer {
    fn natural(&mut self, max: i64) -> Result<u64> {
        let max = check_max(max)?;
        Ok(self.rng.random_range(0..=max))
    }
}

#[derive(Debug, Default)]
struct SequenceState {
    values: Vec<u64>,
    cursor: usize,
    requested: Vec<i64>,
}

/// Replays a fixed list of naturals, cycling when it runs out.
///
/// Values are returned as scripted, even when they exceed the requested
/// bound, so callers can exercise their own range handling. Clones share the
/// same cursor and history, which lets a test keep a handle after moving the
/// randomizer into a gremlin.
#[derive(Debug, Clone, Default)]
pub struct SequenceRandomizer {
    state: Rc<RefCell<SequenceState>>,
}

impl SequenceRandomizer {
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            state: Rc::new(RefCell::new(SequenceState {
                values: values.into_iter().collect(),
                ..SequenceState::default()
            })),
        }
    }

    /// Every `max` passed to [`Randomizer::natural`] so far, in call order.
    pub fn requested(&self) -> Vec<i64> {
        self.state.borrow().requested.clone()
    }
}

impl Randomizer for SequenceRandomizer {
    fn natural(&mut self, max: i64) -> Result<u64> {
        let mut state = self.state.borrow_mut();
        state.requested.push(max);
        check_max(max)?;
        if state.values.is_empty() {
            return Err(GremlinError::strategy("randomizer", "sequence is empty"));
        }
        let value = state.values[state.cursor % state.values.len()];
        state.cursor += 1;
        Ok(value)
    }
}
