//! The stateful growth engine.
//!
//! [`GrowthEngine`] owns both stores and the run's RNG. A run is:
//! 1. Build: seed the roots (one at the origin, or the preset starting
//!    points), then sample the initial endpoints and attach each to its
//!    nearest growable branch point.
//! 2. [`GrowthEngine::run`]: per generation, [`GrowthEngine::grow_branches`],
//!    optional Poisson injection of new endpoints, apical decay.
//! 3. [`GrowthEngine::into_growth`]: materialize the [`Tree`].
//!
//! [`GrowthEngine::iterate`] does 2 and 3 in one call.

use std::time::Instant;

use glam::DVec3;
use log::{debug, info, trace, warn};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    apical::ApicalControl,
    branch::BranchPointStore,
    config::Config,
    endpoint::EndPointStore,
    error::{Error, Result},
    influence_buffer::InfluenceBuffer,
    phases,
    search::{LinearScan, NearestSearch, Resolved},
    tree::Tree,
    types::{Association, NodeId, SimRng},
    volume::{SphereVolume, VolumeSampler},
};

type Exclusion = Box<dyn Fn(DVec3) -> bool>;

/// What happened in one generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub candidates: usize,
    pub committed: usize,
    pub excluded: usize,
    pub suppressed: usize,
}

/// Totals for a call to [`GrowthEngine::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Generations actually grown.
    pub generations: u32,
    /// Endpoints injected during the run.
    pub endpoints_added: usize,
    /// The wall-clock budget ended the run early.
    pub timed_out: bool,
}

/// Final result of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    pub tree: Tree,
    /// Every endpoint position, in insertion order.
    pub endpoints: Vec<DVec3>,
    pub stats: RunStats,
}

/// Configures and seeds a [`GrowthEngine`].
pub struct EngineBuilder {
    cfg: Config,
    volume: Box<dyn VolumeSampler>,
    exclude: Exclusion,
    search: Box<dyn NearestSearch>,
    starting_points: Vec<DVec3>,
}

impl EngineBuilder {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            volume: Box::new(SphereVolume::default()),
            exclude: Box::new(|_: DVec3| false),
            search: Box::new(LinearScan),
            starting_points: Vec::new(),
        }
    }

    /// Source of endpoints. Defaults to [`SphereVolume::default`].
    pub fn volume(mut self, volume: impl VolumeSampler + 'static) -> Self {
        self.volume = Box::new(volume);
        self
    }

    /// Points for which `exclude` returns `true` never receive a branch
    /// point or an endpoint.
    pub fn exclude(mut self, exclude: impl Fn(DVec3) -> bool + 'static) -> Self {
        self.exclude = Box::new(exclude);
        self
    }

    /// Replaces the single root at the origin with one root per point.
    /// An empty list keeps the default root.
    pub fn starting_points(mut self, points: impl IntoIterator<Item = DVec3>) -> Self {
        self.starting_points = points.into_iter().collect();
        self
    }

    pub fn search(mut self, search: impl NearestSearch + 'static) -> Self {
        self.search = Box::new(search);
        self
    }

    /// Validates the configuration and seeds roots and endpoints.
    pub fn build(self) -> Result<GrowthEngine> {
        self.cfg.validate()?;

        let mut engine = GrowthEngine {
            influence: self.cfg.effective_influence(),
            rng: SimRng::seed_from_u64(self.cfg.seed),
            apical: ApicalControl::new(&self.cfg.apical),
            cfg: self.cfg,
            volume: self.volume,
            exclude: self.exclude,
            search: self.search,
            branches: BranchPointStore::new(),
            endpoints: EndPointStore::new(),
            acc: InfluenceBuffer::with_len(0),
            generation: 0,
        };

        if self.starting_points.is_empty() {
            engine.branches.push_root(DVec3::ZERO, 0);
        } else {
            for p in self.starting_points {
                engine.branches.push_root(p, 0);
            }
        }

        for _ in 0..engine.cfg.endpoints {
            let p = engine.sample_point()?;
            engine.add_end_point(p);
        }

        info!(
            "seeded {} root(s) and {} endpoint(s)",
            engine.branches.len(),
            engine.endpoints.len()
        );
        Ok(engine)
    }
}

pub struct GrowthEngine {
    cfg: Config,
    influence: f64,
    rng: SimRng,
    apical: ApicalControl,
    volume: Box<dyn VolumeSampler>,
    exclude: Exclusion,
    search: Box<dyn NearestSearch>,
    branches: BranchPointStore,
    endpoints: EndPointStore,
    acc: InfluenceBuffer,
    /// Next generation number; carries over between calls to `run`.
    generation: u32,
}

impl GrowthEngine {
    pub fn builder(cfg: Config) -> EngineBuilder {
        EngineBuilder::new(cfg)
    }

    /// Engine with the default sphere volume, no exclusion and a single
    /// root at the origin.
    pub fn new(cfg: Config) -> Result<Self> {
        EngineBuilder::new(cfg).build()
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn branches(&self) -> &BranchPointStore {
        &self.branches
    }

    pub fn endpoints(&self) -> &EndPointStore {
        &self.endpoints
    }

    pub fn apical(&self) -> &ApicalControl {
        &self.apical
    }

    /// Generations grown so far across all calls to [`GrowthEngine::run`].
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Nearest growable branch point to `p`, as endpoint bookkeeping.
    pub fn closest_branch_point(&self, p: DVec3) -> Resolved {
        match self.search.closest(&self.branches, p) {
            Some(c) => c.resolve(self.influence),
            // Only reachable with no branch points at all.
            None => Resolved {
                association: Association::OutOfRange,
                direction: DVec3::ZERO,
                distance: f64::INFINITY,
            },
        }
    }

    /// Appends an endpoint and attaches it to its nearest branch point.
    pub fn add_end_point(&mut self, p: DVec3) -> usize {
        let resolved = self.closest_branch_point(p);
        self.endpoints.push(p, resolved)
    }

    /// Commits a new branch point under `parent`.
    ///
    /// Stamps the lineage with `generation`, lets every live endpoint
    /// see the new point, and, if `parent` just became full, re-resolves
    /// every endpoint still attached to it.
    ///
    /// ### Panics
    /// Panics if `parent` already has two children.
    pub fn add_branch_point(&mut self, pos: DVec3, parent: NodeId, generation: u32) -> NodeId {
        let id = self.branches.push_child(pos, parent, generation);
        let killed = self
            .endpoints
            .observe_branch(id, pos, self.cfg.kill_distance, self.influence);
        if killed > 0 {
            trace!("branch point {id} consumed {killed} endpoint(s)");
        }

        if !self.branches.is_growable(parent) {
            let stale = self.endpoints.associated_with(parent);
            trace!(
                "branch point {parent} is full, re-resolving {} endpoint(s)",
                stale.len()
            );
            for e in stale {
                let resolved = self.closest_branch_point(self.endpoints.pos[e]);
                self.endpoints.set(e, resolved);
            }
        }
        id
    }

    /// Whether apical control vetoes a shoot from a point with
    /// `apical_factor` prior shoots. Consumes a random draw when the
    /// outcome is uncertain.
    pub fn shoot_suppressed(&mut self, apical_factor: u32) -> bool {
        self.apical.shoot_suppressed(apical_factor, &mut self.rng)
    }

    /// Grows one generation.
    ///
    /// All candidates are computed against the stores as they are now;
    /// then the ones outside the exclusion region are committed in
    /// ascending parent order.
    pub fn grow_branches(&mut self, generation: u32) -> GenerationReport {
        phases::attraction_phase(&self.endpoints, self.branches.len(), &mut self.acc);
        let plan = phases::growth_phase(
            &self.branches,
            &self.acc,
            self.cfg.step_len,
            self.cfg.tropism,
            &self.apical,
            &mut self.rng,
        );

        let mut report = GenerationReport {
            candidates: plan.candidates.len(),
            suppressed: plan.suppressed,
            ..Default::default()
        };
        for c in plan.candidates {
            if (self.exclude)(c.pos) {
                report.excluded += 1;
                continue;
            }
            self.add_branch_point(c.pos, c.parent, generation);
            report.committed += 1;
        }

        debug!(
            "generation {generation}: {} candidate(s), {} committed, {} excluded, {} suppressed",
            report.candidates, report.committed, report.excluded, report.suppressed
        );
        report
    }

    /// Runs up to `max_iterations` generations.
    ///
    /// Generation numbers continue where the previous call stopped, so
    /// repeated calls grow the same tree further.
    ///
    /// A positive `new_endpoints_per_1000` injects endpoints as a Poisson
    /// process with that many arrivals per thousand generations. A
    /// positive `max_time_secs` is a wall-clock budget, checked between
    /// generations.
    pub fn run(&mut self, new_endpoints_per_1000: f64, max_time_secs: f64) -> Result<RunStats> {
        let start = Instant::now();
        let rate = new_endpoints_per_1000 / 1000.0;
        let mut stats = RunStats::default();

        // Arrival clock, in generations. Holds the time of the next event.
        let mut next_arrival = if rate > 0.0 {
            self.exponential(rate)
        } else {
            1.0
        };
        let mut clock = 0.0;

        for _ in 0..self.cfg.max_iterations {
            self.grow_branches(self.generation);
            self.generation += 1;
            stats.generations += 1;

            if max_time_secs > 0.0 && start.elapsed().as_secs_f64() > max_time_secs {
                warn!(
                    "time budget of {max_time_secs}s spent after {} generation(s)",
                    stats.generations
                );
                stats.timed_out = true;
                break;
            }

            if rate > 0.0 {
                clock += 1.0;
                while next_arrival < clock {
                    let p = self.sample_point()?;
                    self.add_end_point(p);
                    stats.endpoints_added += 1;
                    next_arrival += self.exponential(rate);
                }
            }

            self.apical.decay();
        }

        info!(
            "grew {} generation(s): {} branch point(s), {} of {} endpoint(s) consumed, {} injected",
            stats.generations,
            self.branches.len(),
            self.endpoints.dead_count(),
            self.endpoints.len(),
            stats.endpoints_added
        );
        Ok(stats)
    }

    /// Runs and materializes the result in one go.
    pub fn iterate(mut self, new_endpoints_per_1000: f64, max_time_secs: f64) -> Result<Growth> {
        let stats = self.run(new_endpoints_per_1000, max_time_secs)?;
        Ok(self.into_growth(stats))
    }

    /// Consumes the engine, turning the flat stores into a [`Tree`].
    pub fn into_growth(self, stats: RunStats) -> Growth {
        Growth {
            tree: Tree::from_store(&self.branches),
            endpoints: self.endpoints.pos,
            stats,
        }
    }

    /// Draws from the volume until a point outside the exclusion region
    /// turns up.
    fn sample_point(&mut self) -> Result<DVec3> {
        let attempts = self.cfg.max_sample_attempts;
        for _ in 0..attempts {
            if let Some(p) = self.volume.sample(&mut self.rng)
                && !(self.exclude)(p)
            {
                return Ok(p);
            }
        }
        Err(Error::SamplingExhausted { attempts })
    }

    /// Exponential inter-arrival time with the given rate.
    fn exponential(&mut self, rate: f64) -> f64 {
        let u: f64 = self.rng.random();
        -(1.0 - u).ln() / rate
    }
}
