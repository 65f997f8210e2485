//! Injectable randomness
//!
//! Gameplay draws random numbers in exactly two places: picking an
//! escalation feature and the lateral kick of a relaunch. Both go through
//! `Dice` so tests can script outcomes.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::escalation::Feature;

/// Random decisions the game makes
pub trait Dice {
    /// Uniformly pick one of the five escalation features
    fn pick_feature(&mut self) -> Feature;

    /// Uniform value in `[-range, range]`
    fn lateral(&mut self, range: f32) -> f32;
}

/// Dice backed by a seeded PCG generator
#[derive(Debug, Clone)]
pub struct RngDice<R = Pcg32> {
    rng: R,
}

impl RngDice<Pcg32> {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RngDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Dice for RngDice<R> {
    fn pick_feature(&mut self) -> Feature {
        Feature::ALL[self.rng.random_range(0..Feature::ALL.len())]
    }

    fn lateral(&mut self, range: f32) -> f32 {
        if range <= 0.0 {
            return 0.0;
        }
        self.rng.random_range(-range..=range)
    }
}

/// Dice that replay queued outcomes. Empty queues fall back to the first
/// feature and a straight launch.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    features: VecDeque<Feature>,
    laterals: VecDeque<f32>,
}

impl ScriptedDice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_features(features: impl IntoIterator<Item = Feature>) -> Self {
        Self {
            features: features.into_iter().collect(),
            laterals: VecDeque::new(),
        }
    }

    pub fn push_feature(&mut self, feature: Feature) {
        self.features.push_back(feature);
    }

    pub fn push_lateral(&mut self, lateral: f32) {
        self.laterals.push_back(lateral);
    }
}

impl Dice for ScriptedDice {
    fn pick_feature(&mut self) -> Feature {
        self.features.pop_front().unwrap_or(Feature::ALL[0])
    }

    fn lateral(&mut self, range: f32) -> f32 {
        self.laterals
            .pop_front()
            .unwrap_or(0.0)
            .clamp(-range, range)
    }
}
