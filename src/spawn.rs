use bubble_common::error::{validate_radii, Result};
use bubble_common::Vec2;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Number of grid points along each side of the spawn grid for `n` bubbles.
pub fn grid_side(n: usize) -> usize {
    n / 2 + 1
}

/// Places every bubble on its own cell of a square grid whose spacing is the
/// largest diameter, so no two bubbles overlap at spawn time.
///
/// Cells are assigned by shuffling the cell indices with `rng` and taking the
/// first `radii.len()`, which makes the assignment unique. A single bubble
/// always lands on the origin.
pub fn spawn<R: Rng + ?Sized>(radii: &[f64], rng: &mut R) -> Result<Vec<Vec2>> {
    validate_radii(radii)?;
    let count = radii.len();
    if count == 0 {
        return Ok(Vec::new());
    }

    let side = grid_side(count);
    let spacing = 2.0 * radii.iter().copied().fold(f64::MIN, f64::max);

    // side^2 >= count for every count >= 1, so the grid always has room
    let mut cells: Vec<usize> = (0..side * side).collect();
    cells.shuffle(rng);
    cells.truncate(count);
    debug!("Spawning {} bubbles on a {}x{} grid (spacing {:.3}).", count, side, side, spacing);

    Ok(cells
        .into_iter()
        .map(|cell| Vec2::new((cell / side) as f64 * spacing, (cell % side) as f64 * spacing))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bubble_common::LayoutError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn single_bubble_spawns_at_origin() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(spawn(&[1.0], &mut rng).unwrap(), vec![Vec2::zero()]);
        }
    }

    #[test]
    fn empty_radii_spawn_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(spawn(&[], &mut rng).unwrap().is_empty());
    }

    #[test]
    fn cells_are_unique_and_on_grid() {
        let mut rng = StdRng::seed_from_u64(42);
        for count in 1..40 {
            let radii: Vec<f64> = (1..=count).map(|r| r as f64 * 0.5).collect();
            let centres = spawn(&radii, &mut rng).unwrap();
            assert_eq!(centres.len(), count);

            let spacing = 2.0 * radii[count - 1];
            let side = grid_side(count);
            let cells: HashSet<(i64, i64)> = centres
                .iter()
                .map(|c| ((c.x / spacing).round() as i64, (c.y / spacing).round() as i64))
                .collect();
            assert_eq!(cells.len(), count, "two bubbles share a cell for N={}", count);
            assert!(cells.iter().all(|&(i, j)| (i as usize) < side && (j as usize) < side));
        }
    }

    #[test]
    fn spawned_bubbles_do_not_overlap() {
        let mut rng = StdRng::seed_from_u64(3);
        let radii = [1.0, 4.0, 2.5, 0.5, 3.0, 1.5];
        let centres = spawn(&radii, &mut rng).unwrap();
        for i in 0..radii.len() {
            for j in (i + 1)..radii.len() {
                assert!(centres[i].distance(centres[j]) >= radii[i] + radii[j]);
            }
        }
    }

    #[test]
    fn same_seed_same_placement() {
        let radii = [1.0, 2.0, 3.0, 4.0, 5.0];
        let a = spawn(&radii, &mut StdRng::seed_from_u64(11)).unwrap();
        let b = spawn(&radii, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_invalid_radius() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            spawn(&[1.0, -2.0], &mut rng),
            Err(LayoutError::InvalidRadius { index: 1, value: -2.0 })
        );
    }
}
