//! Pairwise force models for bubble relaxation.
//!
//! Every model is described by the signed magnitude of the force between one
//! pair of bubbles. A positive magnitude pulls the pair together, a negative
//! one pushes it apart. [`ForceModel::compute`] turns those magnitudes into a
//! net force per bubble by walking each unordered pair once.

use bubble_common::{ForceModelKind, RelaxParams, Vec2};

/// A rule for the force between two bubbles.
pub trait ForceModel: Send + Sync {
    /// Signed force magnitude for a pair with radii `r_i`, `r_j` whose centres
    /// are `dist` apart. Positive attracts, negative repels.
    fn pair_magnitude(&self, r_i: f64, r_j: f64, dist: f64) -> f64;

    /// Net force on every bubble, index-aligned with `radii`.
    fn compute(&self, radii: &[f64], centres: &[Vec2]) -> Vec<Vec2> {
        let mut forces = vec![Vec2::zero(); radii.len()];
        accumulate_pairs(self, radii, centres, &mut forces);
        forces
    }
}

/// Adds every unordered pair's contribution into `out`.
/// Bubble `i` is pulled along the unit vector towards `j`, `j` the opposite way.
pub fn accumulate_pairs<M: ForceModel + ?Sized>(
    model: &M,
    radii: &[f64],
    centres: &[Vec2],
    out: &mut [Vec2],
) {
    let n = radii.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let contribution = pair_force(model, radii[i], radii[j], centres[i], centres[j]);
            out[i] += contribution;
            out[j] += -contribution;
        }
    }
}

/// Force on the bubble at `c_i` due to the one at `c_j`.
/// Coincident centres have no direction and contribute nothing.
pub fn pair_force<M: ForceModel + ?Sized>(model: &M, r_i: f64, r_j: f64, c_i: Vec2, c_j: Vec2) -> Vec2 {
    let offset = c_j - c_i;
    let unit = offset.normalize_or_zero();
    if unit == Vec2::zero() {
        return Vec2::zero();
    }
    unit * model.pair_magnitude(r_i, r_j, offset.length())
}

/// Signed quadratic potential. The pair sits at rest `r_i + r_j + 1` apart and
/// the restoring force grows with both the gap and the separation itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftPotential;

impl ForceModel for SoftPotential {
    fn pair_magnitude(&self, r_i: f64, r_j: f64, dist: f64) -> f64 {
        let equilibrium = r_i + r_j + 1.0;
        2.0 * (dist - equilibrium) * dist
    }
}

/// Harmonic potential on the gap between the two circle edges, with a much
/// stiffer constant once the circles overlap.
#[derive(Debug, Clone, Copy)]
pub struct HarmonicPotential {
    pub repulsion_constant: f64,
}

impl HarmonicPotential {
    pub fn new(repulsion_constant: f64) -> Self {
        Self { repulsion_constant }
    }
}

impl Default for HarmonicPotential {
    fn default() -> Self {
        Self::new(bubble_common::params::DEFAULT_REPULSION_CONSTANT)
    }
}

impl ForceModel for HarmonicPotential {
    fn pair_magnitude(&self, r_i: f64, r_j: f64, dist: f64) -> f64 {
        let gap = dist - r_i - r_j;
        if gap < 0.0 {
            self.repulsion_constant * gap
        } else {
            2.0 * gap
        }
    }
}

/// Builds the force model selected by `params`.
pub fn from_params(params: &RelaxParams) -> Box<dyn ForceModel> {
    match params.force_model {
        ForceModelKind::Soft => Box::new(SoftPotential),
        ForceModelKind::Harmonic => Box::new(HarmonicPotential::new(params.repulsion_constant)),
    }
}

impl<M: ForceModel + ?Sized> ForceModel for Box<M> {
    fn pair_magnitude(&self, r_i: f64, r_j: f64, dist: f64) -> f64 {
        (**self).pair_magnitude(r_i, r_j, dist)
    }

    fn compute(&self, radii: &[f64], centres: &[Vec2]) -> Vec<Vec2> {
        (**self).compute(radii, centres)
    }
}
