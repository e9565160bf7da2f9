use bubble_common::error::{validate_radii, Result};
use bubble_common::{LayoutError, Vec2};

use crate::forces::ForceModel;

/// Per-bubble buffers owned by a single relaxation run.
///
/// All vectors are index-aligned with the radius set the state was built for.
#[derive(Debug, Clone)]
pub struct LayoutState {
    pub positions: Vec<Vec2>,
    /// Only advanced by the velocity integrator; stays zero otherwise.
    pub velocities: Vec<Vec2>,
    /// Forces at `positions`, refreshed by every integration step.
    pub forces: Vec<Vec2>,
    /// Number of integration steps applied so far.
    pub step: u32,
}

impl LayoutState {
    /// Validates the inputs and evaluates the starting forces.
    pub fn new(radii: &[f64], centres: Vec<Vec2>, force: &dyn ForceModel) -> Result<Self> {
        validate_radii(radii)?;
        if centres.len() != radii.len() {
            return Err(LayoutError::LengthMismatch { radii: radii.len(), centres: centres.len() });
        }
        if let Some(index) = centres.iter().position(|c| !c.is_finite()) {
            return Err(LayoutError::NonFiniteCentre { index });
        }

        let forces = force.compute(radii, &centres);
        Ok(Self {
            velocities: vec![Vec2::zero(); centres.len()],
            positions: centres,
            forces,
            step: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Hands back the positions, consuming the run buffers.
    pub fn into_positions(self) -> Vec<Vec2> {
        self.positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forces::HarmonicPotential;

    #[test]
    fn buffers_are_index_aligned() {
        let radii = [1.0, 2.0, 3.0];
        let centres = vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)];
        let state = LayoutState::new(&radii, centres.clone(), &HarmonicPotential::default()).unwrap();
        assert_eq!(state.len(), 3);
        assert_eq!(state.velocities.len(), 3);
        assert_eq!(state.forces.len(), 3);
        assert_eq!(state.positions, centres);
        assert!(state.velocities.iter().all(|v| *v == Vec2::zero()));
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = LayoutState::new(&[1.0, 1.0], vec![Vec2::zero()], &HarmonicPotential::default())
            .unwrap_err();
        assert_eq!(err, LayoutError::LengthMismatch { radii: 2, centres: 1 });
    }

    #[test]
    fn rejects_non_finite_centre() {
        let centres = vec![Vec2::zero(), Vec2::new(f64::NAN, 0.0)];
        let err = LayoutState::new(&[1.0, 1.0], centres, &HarmonicPotential::default()).unwrap_err();
        assert_eq!(err, LayoutError::NonFiniteCentre { index: 1 });
    }

    #[test]
    fn empty_state_is_valid() {
        let state = LayoutState::new(&[], Vec::new(), &HarmonicPotential::default()).unwrap();
        assert!(state.is_empty());
        assert!(state.forces.is_empty());
    }
}
