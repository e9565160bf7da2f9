//! Packed, non-overlapping layouts for bubble charts.
//!
//! Bubbles are spawned on a grid ([`spawn`]), then pulled together by a
//! pairwise [`forces::ForceModel`] advanced with an [`integrator::Integrator`]
//! for a fixed number of steps ([`relaxation::RelaxationLoop`]).

pub mod backend;
pub mod forces;
pub mod integrator;
pub mod output;
pub mod relaxation;
pub mod spawn;
pub mod state;


pub use backend::{compute_layout, LayoutBackend, ParallelBackend, ReferenceBackend};
pub use bubble_common::{LayoutError, RelaxParams, Snapshot, Vec2};
pub use relaxation::{bounds, max_overlap, Relaxation, RelaxationLoop};
pub use spawn::spawn;
