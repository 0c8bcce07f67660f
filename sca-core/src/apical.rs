//! Stochastic apical dominance.
//!
//! A branch point that already spawned shoots is less likely to spawn
//! another. The strength of that effect can decay linearly to zero over
//! a fixed number of generations.

use rand::Rng;

use crate::{config::ApicalConfig, types::SimRng};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApicalControl {
    strength: f64,
    falloff: f64,
    step: f64,
    steps_left: u32,
}

impl ApicalControl {
    pub fn new(cfg: &ApicalConfig) -> Self {
        let step = if cfg.timing > 0 {
            cfg.strength / cfg.timing as f64
        } else {
            0.0
        };
        Self {
            strength: cfg.strength,
            falloff: cfg.falloff,
            step,
            steps_left: cfg.timing,
        }
    }

    #[inline]
    pub fn strength(&self) -> f64 {
        self.strength
    }

    #[inline]
    pub fn steps_left(&self) -> u32 {
        self.steps_left
    }

    /// Decides whether a shoot from a point with `apical_factor` prior
    /// shoots is vetoed.
    ///
    /// Draws from `rng` only when the outcome is actually random.
    pub fn shoot_suppressed(&self, apical_factor: u32, rng: &mut SimRng) -> bool {
        if self.strength <= 0.0 {
            return false;
        }
        let p = 1.0 - apical_factor as f64 * self.strength;
        if p <= 0.0 {
            return true;
        }
        let p = p.powf(self.falloff);
        rng.random::<f64>() > p
    }

    /// One generation of decay. Does nothing once the schedule is spent.
    pub fn decay(&mut self) {
        if self.steps_left == 0 {
            return;
        }
        self.steps_left -= 1;
        self.strength = (self.strength - self.step).max(0.0);
    }
}
