use serde::{Deserialize, Serialize};

use crate::error::{validate_positive, Result};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ForceModelKind {
    /// Signed quadratic potential with equilibrium at `r_i + r_j + 1`.
    Soft,
    /// Harmonic potential with a stiff repulsion constant for overlaps.
    Harmonic,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorKind {
    /// Velocity-Verlet step with column-normalized velocities.
    Velocity,
    /// Plain gradient-descent step, no velocity state.
    Gradient,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Serial pairwise loop; the reference for numerical correctness.
    Reference,
    /// Force rows evaluated across the rayon thread pool.
    Parallel,
}

pub const DEFAULT_STEPS: u32 = 5000;
pub const DEFAULT_REPULSION_CONSTANT: f64 = 600.0;
pub const DEFAULT_TIME_STEP: f64 = 0.01;
pub const DEFAULT_LEARNING_RATE: f64 = 0.0005;

/// Run parameters derived from the configuration, consumed by the relaxation backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaxParams {
    pub steps: u32,
    /// Time step for the velocity integrator, learning rate for the gradient one.
    pub step_size: f64,
    pub force_model: ForceModelKind,
    pub integrator: IntegratorKind,
    /// Only read by the harmonic force model.
    pub repulsion_constant: f64,
    pub record_trajectory: bool,
    pub backend: BackendKind,
}

impl RelaxParams {
    /// Harmonic forces with gradient descent, the usual bubble-chart setup.
    pub fn harmonic_descent(steps: u32, learning_rate: f64, repulsion_constant: f64) -> Self {
        Self {
            steps,
            step_size: learning_rate,
            force_model: ForceModelKind::Harmonic,
            integrator: IntegratorKind::Gradient,
            repulsion_constant,
            record_trajectory: false,
            backend: BackendKind::Reference,
        }
    }

    pub fn with_trajectory(mut self, record: bool) -> Self {
        self.record_trajectory = record;
        self
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_positive("step_size", self.step_size)?;
        if self.force_model == ForceModelKind::Harmonic {
            validate_positive("repulsion_constant", self.repulsion_constant)?;
        }
        Ok(())
    }
}

impl Default for RelaxParams {
    fn default() -> Self {
        Self::harmonic_descent(DEFAULT_STEPS, DEFAULT_LEARNING_RATE, DEFAULT_REPULSION_CONSTANT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;

    #[test]
    fn rejects_non_positive_step_size() {
        let params = RelaxParams::harmonic_descent(10, 0.0, 600.0);
        assert_eq!(
            params.validate(),
            Err(LayoutError::NonPositiveParameter { name: "step_size", value: 0.0 })
        );
    }

    #[test]
    fn repulsion_constant_ignored_for_soft_model() {
        let mut params = RelaxParams::harmonic_descent(10, 0.01, -1.0);
        assert!(params.validate().is_err());
        params.force_model = ForceModelKind::Soft;
        assert!(params.validate().is_ok());
    }
}
