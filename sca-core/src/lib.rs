//! Core 3-D space-colonization growth library.
//!
//! Main components:
//! - [`engine`] — the stateful growth engine and its builder.
//! - [`phases`] — the read-only half of a generation: staged candidates.
//! - [`branch`] / [`endpoint`] — append-only stores of growth state.
//! - [`search`] — nearest growable branch point lookup.
//! - [`influence_buffer`] — combining endpoint pulls into one direction.
//! - [`apical`] — stochastic apical dominance.
//! - [`volume`] — endpoint sources.
//! - [`tree`] — the materialized result.
//! - [`config`] / [`error`] / [`types`] — parameters, errors, shared ids.

pub mod apical;
pub mod branch;
pub mod config;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod influence_buffer;
pub mod phases;
pub mod search;
pub mod tree;
pub mod types;
pub mod volume;

pub use config::{ApicalConfig, Config};
pub use engine::{EngineBuilder, GenerationReport, Growth, GrowthEngine, RunStats};
pub use error::{Error, Result};
pub use tree::{Tree, TreeNode};
pub use types::{Association, NodeId, SimRng};
pub use volume::{BoxVolume, SphereVolume, VolumeSampler};
