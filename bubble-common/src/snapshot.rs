use crate::vecmath::Vec2;
use serde::{Deserialize, Serialize};

/// The centre set of every bubble at a given relaxation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Number of integration steps applied before this snapshot (0 = initial state).
    pub step: u32,
    /// One centre per bubble, index-aligned with the radius set.
    pub centres: Vec<Vec2>,
}

/// Radii, final centres and (optionally) the recorded trajectory of a run.
/// This is what gets handed to rendering and animation consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutResult {
    pub radii: Vec<f64>,
    pub centres: Vec<Vec2>,
    #[serde(skip_serializing_if = "Option::is_none")] // Don't write "trajectory": null
    pub trajectory: Option<Vec<Snapshot>>,
}

/// Keeps every `stride`-th snapshot for playback, always including the last one.
pub fn subsample(trajectory: &[Snapshot], stride: usize) -> Vec<Snapshot> {
    let stride = stride.max(1);
    let mut frames: Vec<Snapshot> = trajectory.iter().step_by(stride).cloned().collect();
    if let Some(last) = trajectory.last() {
        if frames.last().map(|f| f.step) != Some(last.step) {
            frames.push(last.clone());
        }
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trajectory(len: u32) -> Vec<Snapshot> {
        (0..len)
            .map(|step| Snapshot { step, centres: vec![Vec2::new(step as f64, 0.0)] })
            .collect()
    }

    #[test]
    fn subsample_keeps_first_and_last() {
        let frames = subsample(&trajectory(46), 20);
        let steps: Vec<u32> = frames.iter().map(|f| f.step).collect();
        assert_eq!(steps, vec![0, 20, 40, 45]);
    }

    #[test]
    fn subsample_stride_one_is_identity() {
        let traj = trajectory(5);
        assert_eq!(subsample(&traj, 1), traj);
        assert_eq!(subsample(&traj, 0), traj);
        assert!(subsample(&[], 3).is_empty());
    }
}
