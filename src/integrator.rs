//! Fixed-step integrators for the relaxation loop.
//!
//! Each step moves the positions, then leaves `state.forces` holding the
//! forces at the new positions so the next step can start from them.

use bubble_common::{column_norms, IntegratorKind, RelaxParams, Vec2};
use log::debug;

use crate::forces::ForceModel;
use crate::state::LayoutState;

/// Advances a [`LayoutState`] by one discrete step.
pub trait Integrator: Send + Sync {
    /// Time step or learning rate, whichever the integrator uses.
    fn step_size(&self) -> f64;

    fn step(&self, state: &mut LayoutState, radii: &[f64], force: &dyn ForceModel);
}

/// Velocity-Verlet style step with the velocity set rescaled by its per-axis
/// column norm after every update.
#[derive(Debug, Clone, Copy)]
pub struct VelocityVerlet {
    pub time_step: f64,
}

impl VelocityVerlet {
    pub fn new(time_step: f64) -> Self {
        Self { time_step }
    }
}

impl Integrator for VelocityVerlet {
    fn step_size(&self) -> f64 {
        self.time_step
    }

    fn step(&self, state: &mut LayoutState, radii: &[f64], force: &dyn ForceModel) {
        let dt = self.time_step;
        let half_dt2 = 0.5 * dt * dt;

        // x' = x + v dt + f dt^2 / 2
        let new_positions: Vec<Vec2> = state
            .positions
            .iter()
            .zip(&state.velocities)
            .zip(&state.forces)
            .map(|((x, v), f)| *x + *v * dt + *f * half_dt2)
            .collect();

        let new_forces = force.compute(radii, &new_positions);

        // v' = v + (f + f') dt / 2
        for ((v, f_old), f_new) in state.velocities.iter_mut().zip(&state.forces).zip(&new_forces) {
            *v += (*f_old + *f_new) * (0.5 * dt);
        }
        if normalize_columns(&mut state.velocities) {
            debug!("Step {}: velocity column norm vanished, velocities left at zero.", state.step + 1);
        }

        state.positions = new_positions;
        state.forces = new_forces;
        state.step += 1;
    }
}

/// Divides the x and y components of every vector by that axis' norm over the
/// whole set. An axis whose norm is zero is all zeros and is left untouched.
///
/// Returns true if any axis was degenerate.
pub fn normalize_columns(vectors: &mut [Vec2]) -> bool {
    let (norm_x, norm_y) = column_norms(vectors);
    for v in vectors.iter_mut() {
        if norm_x > 0.0 {
            v.x /= norm_x;
        }
        if norm_y > 0.0 {
            v.y /= norm_y;
        }
    }
    !vectors.is_empty() && (norm_x == 0.0 || norm_y == 0.0)
}

/// Gradient descent on the pair potential: each bubble moves `learning_rate`
/// times its force, i.e. against the energy gradient. No velocity state.
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    pub learning_rate: f64,
}

impl GradientDescent {
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }
}

impl Integrator for GradientDescent {
    fn step_size(&self) -> f64 {
        self.learning_rate
    }

    fn step(&self, state: &mut LayoutState, radii: &[f64], force: &dyn ForceModel) {
        let lr = self.learning_rate;
        for (x, f) in state.positions.iter_mut().zip(&state.forces) {
            *x += *f * lr;
        }
        state.forces = force.compute(radii, &state.positions);
        state.step += 1;
    }
}

/// Builds the integrator selected by `params`.
pub fn from_params(params: &RelaxParams) -> Box<dyn Integrator> {
    match params.integrator {
        IntegratorKind::Velocity => Box::new(VelocityVerlet::new(params.step_size)),
        IntegratorKind::Gradient => Box::new(GradientDescent::new(params.step_size)),
    }
}
