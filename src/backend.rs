//! Interchangeable execution strategies for a relaxation run.
//!
//! [`ReferenceBackend`] is the serial pairwise loop and defines the expected
//! numbers. Any other backend must reproduce its output within floating-point
//! tolerance for the same inputs.

use bubble_common::error::Result;
use bubble_common::{BackendKind, RelaxParams, Vec2};
use log::info;
use rand::Rng;
use rayon::prelude::*;
use std::ops::ControlFlow;

use crate::forces::{self, pair_force, ForceModel};
use crate::integrator;
use crate::relaxation::{Relaxation, RelaxationLoop};
use crate::spawn::spawn;
use crate::state::LayoutState;

pub type StepHook<'h> = dyn FnMut(&LayoutState) -> ControlFlow<()> + 'h;

pub trait LayoutBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Relaxes `centres` with the force model and integrator selected by `params`,
    /// calling `hook` after every step.
    fn relax_with_hook(
        &self,
        radii: &[f64],
        centres: Vec<Vec2>,
        params: &RelaxParams,
        hook: &mut StepHook<'_>,
    ) -> Result<Relaxation>;

    fn relax(&self, radii: &[f64], centres: Vec<Vec2>, params: &RelaxParams) -> Result<Relaxation> {
        self.relax_with_hook(radii, centres, params, &mut |_| ControlFlow::Continue(()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceBackend;

impl LayoutBackend for ReferenceBackend {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn relax_with_hook(
        &self,
        radii: &[f64],
        centres: Vec<Vec2>,
        params: &RelaxParams,
        hook: &mut StepHook<'_>,
    ) -> Result<Relaxation> {
        params.validate()?;
        let force = forces::from_params(params);
        let integrator = integrator::from_params(params);
        RelaxationLoop::new(force.as_ref(), integrator.as_ref(), params.steps)
            .record_trajectory(params.record_trajectory)
            .run_with_hook(radii, centres, hook)
    }
}

/// Evaluates each bubble's force row on the rayon thread pool.
///
/// Rows are independent, so each task only writes its own entry. Pair
/// contributions are identical to the serial loop; only the summation order
/// differs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelForces<M>(pub M);

impl<M: ForceModel> ForceModel for ParallelForces<M> {
    fn pair_magnitude(&self, r_i: f64, r_j: f64, dist: f64) -> f64 {
        self.0.pair_magnitude(r_i, r_j, dist)
    }

    fn compute(&self, radii: &[f64], centres: &[Vec2]) -> Vec<Vec2> {
        let n = radii.len();
        (0..n)
            .into_par_iter()
            .map(|i| {
                (0..n).filter(|&j| j != i).fold(Vec2::zero(), |acc, j| {
                    acc + pair_force(&self.0, radii[i], radii[j], centres[i], centres[j])
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelBackend;

impl LayoutBackend for ParallelBackend {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn relax_with_hook(
        &self,
        radii: &[f64],
        centres: Vec<Vec2>,
        params: &RelaxParams,
        hook: &mut StepHook<'_>,
    ) -> Result<Relaxation> {
        params.validate()?;
        let force = ParallelForces(forces::from_params(params));
        let integrator = integrator::from_params(params);
        RelaxationLoop::new(&force, integrator.as_ref(), params.steps)
            .record_trajectory(params.record_trajectory)
            .run_with_hook(radii, centres, hook)
    }
}

pub fn from_kind(kind: BackendKind) -> Box<dyn LayoutBackend> {
    match kind {
        BackendKind::Reference => Box::new(ReferenceBackend),
        BackendKind::Parallel => Box::new(ParallelBackend),
    }
}

/// Spawns the bubbles on a grid unless `centres` are given, then relaxes them
/// on the backend selected by `params`.
pub fn compute_layout<R: Rng + ?Sized>(
    radii: &[f64],
    centres: Option<Vec<Vec2>>,
    params: &RelaxParams,
    rng: &mut R,
) -> Result<Relaxation> {
    params.validate()?;
    let centres = match centres {
        Some(centres) => centres,
        None => spawn(radii, rng)?,
    };
    let backend = from_kind(params.backend);
    info!("Relaxing {} bubbles on the {} backend.", radii.len(), backend.name());
    backend.relax(radii, centres, params)
}
