//! Volume sources for endpoints.
//!
//! A sampler makes one attempt per call. `None` is a rejected attempt;
//! the engine keeps calling until it gets an admissible point or runs
//! out of attempts.

use glam::DVec3;
use rand::Rng;

use crate::types::SimRng;

pub trait VolumeSampler {
    fn sample(&mut self, rng: &mut SimRng) -> Option<DVec3>;
}

impl<F> VolumeSampler for F
where
    F: FnMut(&mut SimRng) -> Option<DVec3>,
{
    fn sample(&mut self, rng: &mut SimRng) -> Option<DVec3> {
        self(rng)
    }
}

/// Uniform points in a ball, by rejection from the enclosing cube.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereVolume {
    pub center: DVec3,
    pub radius: f64,
}

impl SphereVolume {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl Default for SphereVolume {
    fn default() -> Self {
        Self::new(DVec3::new(0.0, 0.0, 8.0), 5.0)
    }
}

impl VolumeSampler for SphereVolume {
    fn sample(&mut self, rng: &mut SimRng) -> Option<DVec3> {
        let r = self.radius;
        let x = (rng.random::<f64>() * 2.0 - 1.0) * r;
        let y = (rng.random::<f64>() * 2.0 - 1.0) * r;
        let z = (rng.random::<f64>() * 2.0 - 1.0) * r;
        let p = DVec3::new(x, y, z);
        (p.length_squared() <= r * r).then_some(self.center + p)
    }
}

/// Uniform points in an axis-aligned box. Never rejects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxVolume {
    pub min: DVec3,
    pub max: DVec3,
}

impl BoxVolume {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }
}

impl VolumeSampler for BoxVolume {
    fn sample(&mut self, rng: &mut SimRng) -> Option<DVec3> {
        let t = DVec3::new(rng.random(), rng.random(), rng.random());
        Some(self.min + (self.max - self.min) * t)
    }
}
