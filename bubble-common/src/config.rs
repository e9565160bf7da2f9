use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{validate_radii, LayoutError};
use crate::params::{
    BackendKind, ForceModelKind, IntegratorKind, RelaxParams, DEFAULT_LEARNING_RATE,
    DEFAULT_REPULSION_CONSTANT, DEFAULT_STEPS, DEFAULT_TIME_STEP,
};
use crate::vecmath::Vec2;

// Run control, loaded from the [layout] table
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RunConfig {
    #[serde(default = "default_steps")]
    pub steps: u32,
    #[serde(default)]
    pub record_trajectory: bool,
    /// Seed for the grid spawner. Fresh OS entropy is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_backend")]
    pub backend: BackendKind,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ForceConfig {
    #[serde(default = "default_force_model")]
    pub model: ForceModelKind,
    #[serde(default = "default_repulsion_constant")]
    pub repulsion_constant: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct IntegratorConfig {
    #[serde(default = "default_integrator")]
    pub kind: IntegratorKind,
    /// Time step (velocity) or learning rate (gradient). Defaults per kind.
    #[serde(default)]
    pub step_size: Option<f64>,
}

// The bubbles to lay out
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BubbleConfig {
    pub radii: Vec<f64>,
    /// Optional starting centres as [x, y] pairs; spawned on a grid when absent.
    #[serde(default)]
    pub centres: Option<Vec<[f64; 2]>>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_base_filename")]
    pub base_filename: String,
    #[serde(default)]
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
    #[serde(default = "default_true")]
    pub save_positions: bool,
    #[serde(default)]
    pub save_trajectory: bool,
    /// Keep every n-th trajectory snapshot when saving.
    #[serde(default = "default_frame_stride")]
    pub frame_stride: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            steps: default_steps(),
            record_trajectory: false,
            seed: None,
            backend: default_backend(),
        }
    }
}

impl Default for ForceConfig {
    fn default() -> Self {
        ForceConfig {
            model: default_force_model(),
            repulsion_constant: default_repulsion_constant(),
        }
    }
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        IntegratorConfig { kind: default_integrator(), step_size: None }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            base_filename: default_base_filename(),
            format: None,
            save_positions: true,
            save_trajectory: false,
            frame_stride: default_frame_stride(),
        }
    }
}

/// Main layout configuration, loaded from a TOML file.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LayoutConfig {
    #[serde(default)]
    pub layout: RunConfig,
    #[serde(default)]
    pub forces: ForceConfig,
    #[serde(default)]
    pub integrator: IntegratorConfig,
    pub bubbles: BubbleConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl LayoutConfig {
    /// Loads and validates the layout configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config = Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))?;

        Ok(config)
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: LayoutConfig = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Fails fast on anything that would make a run meaningless.
    pub fn validate(&self) -> std::result::Result<(), LayoutError> {
        validate_radii(&self.bubbles.radii)?;
        if let Some(centres) = &self.bubbles.centres {
            if centres.len() != self.bubbles.radii.len() {
                return Err(LayoutError::LengthMismatch {
                    radii: self.bubbles.radii.len(),
                    centres: centres.len(),
                });
            }
            if let Some(index) = centres.iter().position(|c| !Vec2::from(*c).is_finite()) {
                return Err(LayoutError::NonFiniteCentre { index });
            }
        }
        self.relax_params().validate()
    }

    pub fn step_size(&self) -> f64 {
        self.integrator.step_size.unwrap_or(match self.integrator.kind {
            IntegratorKind::Velocity => DEFAULT_TIME_STEP,
            IntegratorKind::Gradient => DEFAULT_LEARNING_RATE,
        })
    }

    pub fn initial_centres(&self) -> Option<Vec<Vec2>> {
        self.bubbles
            .centres
            .as_ref()
            .map(|centres| centres.iter().copied().map(Vec2::from).collect())
    }

    /// Converts the configuration into the parameters the relaxation backends consume.
    pub fn relax_params(&self) -> RelaxParams {
        RelaxParams {
            steps: self.layout.steps,
            step_size: self.step_size(),
            force_model: self.forces.model,
            integrator: self.integrator.kind,
            repulsion_constant: self.forces.repulsion_constant,
            record_trajectory: self.layout.record_trajectory || self.output.save_trajectory,
            backend: self.layout.backend,
        }
    }
}

fn default_steps() -> u32 {
    DEFAULT_STEPS
}

fn default_backend() -> BackendKind {
    BackendKind::Reference
}

fn default_force_model() -> ForceModelKind {
    ForceModelKind::Harmonic
}

fn default_repulsion_constant() -> f64 {
    DEFAULT_REPULSION_CONSTANT
}

fn default_integrator() -> IntegratorKind {
    IntegratorKind::Gradient
}

fn default_base_filename() -> String {
    "bubbles".to_string()
}

fn default_frame_stride() -> usize {
    20
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = LayoutConfig::from_toml_str("[bubbles]\nradii = [1.0, 2.0, 3.0]\n").unwrap();
        let params = config.relax_params();
        assert_eq!(params.steps, 5000);
        assert_eq!(params.force_model, ForceModelKind::Harmonic);
        assert_eq!(params.integrator, IntegratorKind::Gradient);
        assert_eq!(params.step_size, DEFAULT_LEARNING_RATE);
        assert_eq!(params.repulsion_constant, 600.0);
        assert!(!params.record_trajectory);
        assert!(config.initial_centres().is_none());
    }

    #[test]
    fn velocity_integrator_defaults_to_time_step() {
        let config = LayoutConfig::from_toml_str(
            r#"
            [layout]
            steps = 10
            backend = "parallel"

            [forces]
            model = "soft"

            [integrator]
            kind = "velocity"

            [bubbles]
            radii = [1.0]
            centres = [[0.5, -0.5]]

            [output]
            save_trajectory = true
            "#,
        )
        .unwrap();
        let params = config.relax_params();
        assert_eq!(params.step_size, DEFAULT_TIME_STEP);
        assert_eq!(params.backend, BackendKind::Parallel);
        assert!(params.record_trajectory);
        assert_eq!(config.initial_centres(), Some(vec![Vec2::new(0.5, -0.5)]));
    }

    #[test]
    fn rejects_mismatched_centres() {
        let err = LayoutConfig::from_toml_str(
            "[bubbles]\nradii = [1.0, 1.0]\ncentres = [[0.0, 0.0]]\n",
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<LayoutError>(),
            Some(&LayoutError::LengthMismatch { radii: 2, centres: 1 })
        );
    }

    #[test]
    fn rejects_non_positive_radius() {
        let err = LayoutConfig::from_toml_str("[bubbles]\nradii = [1.0, 0.0]\n").unwrap_err();
        assert_eq!(
            err.downcast_ref::<LayoutError>(),
            Some(&LayoutError::InvalidRadius { index: 1, value: 0.0 })
        );
    }

    #[test]
    fn rejects_negative_learning_rate() {
        let result = LayoutConfig::from_toml_str(
            "[integrator]\nstep_size = -0.1\n[bubbles]\nradii = [1.0]\n",
        );
        assert!(result.is_err());
    }
}
