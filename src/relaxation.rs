use bubble_common::error::{validate_positive, Result};
use bubble_common::{Snapshot, Vec2};
use log::{debug, trace};
use std::ops::ControlFlow;

use crate::forces::ForceModel;
use crate::integrator::Integrator;
use crate::state::LayoutState;

/// Outcome of a relaxation run.
#[derive(Debug, Clone)]
pub struct Relaxation {
    /// Final centre of every bubble, index-aligned with the radii.
    pub centres: Vec<Vec2>,
    /// Initial state plus one snapshot per step, if recording was requested.
    pub trajectory: Option<Vec<Snapshot>>,
    /// Steps actually applied. Only below the requested count if a hook stopped the run.
    pub steps_run: u32,
}

/// Drives a force model and an integrator for a fixed number of steps.
///
/// There is no convergence check: the loop always applies every step unless a
/// hook passed to [`RelaxationLoop::run_with_hook`] breaks out.
pub struct RelaxationLoop<'a> {
    force: &'a dyn ForceModel,
    integrator: &'a dyn Integrator,
    steps: u32,
    record_trajectory: bool,
}

impl<'a> RelaxationLoop<'a> {
    pub fn new(force: &'a dyn ForceModel, integrator: &'a dyn Integrator, steps: u32) -> Self {
        Self { force, integrator, steps, record_trajectory: false }
    }

    pub fn record_trajectory(mut self, record: bool) -> Self {
        self.record_trajectory = record;
        self
    }

    pub fn run(&self, radii: &[f64], centres: Vec<Vec2>) -> Result<Relaxation> {
        self.run_with_hook(radii, centres, |_| ControlFlow::Continue(()))
    }

    /// Runs the loop, calling `hook` with the state after every step.
    /// Returning `ControlFlow::Break` ends the run early with the state reached so far.
    pub fn run_with_hook<F>(&self, radii: &[f64], centres: Vec<Vec2>, mut hook: F) -> Result<Relaxation>
    where
        F: FnMut(&LayoutState) -> ControlFlow<()>,
    {
        // Fail before touching any state
        validate_positive("step_size", self.integrator.step_size())?;
        let mut state = LayoutState::new(radii, centres, self.force)?;

        let mut trajectory = self.record_trajectory.then(|| {
            let mut log = Vec::with_capacity(self.steps as usize + 1);
            log.push(Snapshot { step: 0, centres: state.positions.clone() });
            log
        });

        debug!(
            "Relaxing {} bubbles for {} steps (step size {}).",
            state.len(),
            self.steps,
            self.integrator.step_size()
        );

        for _ in 0..self.steps {
            self.integrator.step(&mut state, radii, self.force);

            if let Some(log) = trajectory.as_mut() {
                log.push(Snapshot { step: state.step, centres: state.positions.clone() });
            }

            if hook(&state).is_break() {
                debug!("Relaxation stopped by hook after {} of {} steps.", state.step, self.steps);
                break;
            }
            trace!("Step [{}/{}] done.", state.step, self.steps);
        }

        let steps_run = state.step;
        Ok(Relaxation { centres: state.into_positions(), trajectory, steps_run })
    }
}

/// Axis-aligned box `(min, max)` covering every circle, or `None` when there are no bubbles.
pub fn bounds(radii: &[f64], centres: &[Vec2]) -> Option<(Vec2, Vec2)> {
    radii.iter().zip(centres).fold(None, |acc, (&r, &c)| {
        let lo = Vec2::new(c.x - r, c.y - r);
        let hi = Vec2::new(c.x + r, c.y + r);
        Some(match acc {
            None => (lo, hi),
            Some((min, max)) => (
                Vec2::new(min.x.min(lo.x), min.y.min(lo.y)),
                Vec2::new(max.x.max(hi.x), max.y.max(hi.y)),
            ),
        })
    })
}

/// Deepest overlap between any two circles, `0.0` if none overlap.
pub fn max_overlap(radii: &[f64], centres: &[Vec2]) -> f64 {
    let n = radii.len().min(centres.len());
    let mut deepest = 0.0f64;
    for i in 0..n {
        for j in (i + 1)..n {
            let overlap = radii[i] + radii[j] - centres[i].distance(centres[j]);
            deepest = deepest.max(overlap);
        }
    }
    deepest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_all_circles() {
        let radii = [1.0, 2.0];
        let centres = [Vec2::new(0.0, 0.0), Vec2::new(5.0, -1.0)];
        let (min, max) = bounds(&radii, &centres).unwrap();
        assert_eq!(min, Vec2::new(-1.0, -3.0));
        assert_eq!(max, Vec2::new(7.0, 1.0));
        assert!(bounds(&[], &[]).is_none());
    }

    #[test]
    fn max_overlap_reports_deepest_pair() {
        let radii = [1.0, 1.0, 1.0];
        let centres = [Vec2::new(0.0, 0.0), Vec2::new(1.5, 0.0), Vec2::new(10.0, 0.0)];
        assert!((max_overlap(&radii, &centres) - 0.5).abs() < 1e-12);
        assert_eq!(max_overlap(&radii[..1], &centres[..1]), 0.0);
    }
}
