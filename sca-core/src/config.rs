use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Apical dominance parameters.
///
/// `strength` is subtracted (times the number of shoots already spawned)
/// from the probability that a branch point grows again. `timing` is the
/// number of generations over which `strength` decays linearly to zero;
/// `0` keeps it constant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApicalConfig {
    pub strength: f64,
    pub falloff: f64,
    pub timing: u32,
}

impl Default for ApicalConfig {
    fn default() -> Self {
        Self {
            strength: 0.0,
            falloff: 1.0,
            timing: 0,
        }
    }
}

/// Global parameters of a growth run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Number of endpoints sampled from the volume before growing.
    pub endpoints: usize,
    /// Length of every new branch segment.
    pub step_len: f64,
    /// Maximum number of generations.
    pub max_iterations: u32,
    pub kill_distance: f64,
    /// `<= 0` means unbounded, see [`Config::effective_influence`].
    pub influence_radius: f64,
    pub seed: u64,
    /// Added to the vertical (z) component of each growth step.
    pub tropism: f64,
    pub apical: ApicalConfig,
    /// Consecutive failed sampling attempts tolerated before giving up.
    pub max_sample_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: 100,
            step_len: 0.3,
            max_iterations: 2000,
            kill_distance: 5.0,
            influence_radius: 15.0,
            seed: 42,
            tropism: 0.0,
            apical: ApicalConfig::default(),
            max_sample_attempts: 100_000,
        }
    }
}

impl Config {
    /// The influence radius actually used for range checks.
    pub fn effective_influence(&self) -> f64 {
        if self.influence_radius > 0.0 {
            self.influence_radius
        } else {
            f64::INFINITY
        }
    }

    /// Checks every field eagerly.
    pub fn validate(&self) -> Result<()> {
        fn finite(field: &'static str, v: f64) -> Result<()> {
            if v.is_finite() {
                Ok(())
            } else {
                Err(Error::InvalidConfig {
                    field,
                    reason: "must be finite",
                })
            }
        }

        finite("step_len", self.step_len)?;
        finite("kill_distance", self.kill_distance)?;
        finite("influence_radius", self.influence_radius)?;
        finite("tropism", self.tropism)?;
        finite("apical.strength", self.apical.strength)?;
        finite("apical.falloff", self.apical.falloff)?;

        if self.endpoints == 0 {
            return Err(Error::InvalidConfig {
                field: "endpoints",
                reason: "must be positive",
            });
        }
        if self.step_len <= 0.0 {
            return Err(Error::InvalidConfig {
                field: "step_len",
                reason: "must be positive",
            });
        }
        if self.kill_distance < 0.0 {
            return Err(Error::InvalidConfig {
                field: "kill_distance",
                reason: "must not be negative",
            });
        }
        if self.apical.strength < 0.0 {
            return Err(Error::InvalidConfig {
                field: "apical.strength",
                reason: "must not be negative",
            });
        }
        if self.apical.falloff <= 0.0 {
            return Err(Error::InvalidConfig {
                field: "apical.falloff",
                reason: "must be positive",
            });
        }
        if self.max_sample_attempts == 0 {
            return Err(Error::InvalidConfig {
                field: "max_sample_attempts",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}
