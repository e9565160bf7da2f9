use anyhow::Result;
use bubble_common::{LayoutConfig, LayoutResult};
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::ops::ControlFlow;
use std::path::Path;
use std::time::Instant;

use bubble_layout::backend;
use bubble_layout::output::{save_layout, save_positions_csv};
use bubble_layout::{bounds, max_overlap, spawn};

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting bubble layout engine...");

    // --- Load Configuration ---
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = LayoutConfig::load(&config_path)?;
    let params = config.relax_params();
    debug!("Relaxation parameters: {:#?}", params);

    let radii = config.bubbles.radii.clone();

    // --- Initial Placement ---
    let centres = match config.initial_centres() {
        Some(centres) => {
            info!("Using {} initial centres from config.", centres.len());
            centres
        }
        None => {
            let mut rng = match config.layout.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            spawn(&radii, &mut rng)?
        }
    };

    // --- Relaxation ---
    let backend = backend::from_kind(params.backend);
    if params.backend == bubble_common::BackendKind::Parallel {
        info!("Using {} Rayon threads.", rayon::current_num_threads());
    }
    info!(
        "Relaxing {} bubbles for {} steps on the {} backend...",
        radii.len(),
        params.steps,
        backend.name()
    );

    let start_time = Instant::now();
    let mut previous_print_time = start_time;
    let print_interval_secs = 5.0;
    let total_steps = params.steps;

    let relaxation = backend.relax_with_hook(&radii, centres, &params, &mut |state| {
        let now = Instant::now();
        if now.duration_since(previous_print_time).as_secs_f64() >= print_interval_secs {
            info!(
                "Step [{}/{}] | Elapsed: {:.2} s",
                state.step,
                total_steps,
                start_time.elapsed().as_secs_f64()
            );
            previous_print_time = now;
        } else {
            trace!("Step [{}/{}] completed", state.step, total_steps);
        }
        ControlFlow::Continue(())
    })?;

    info!(
        "Relaxation finished in {:.3} seconds ({} steps).",
        start_time.elapsed().as_secs_f64(),
        relaxation.steps_run
    );

    let overlap = max_overlap(&radii, &relaxation.centres);
    if overlap > 0.0 {
        warn!("Bubbles still overlap by up to {:.4}; consider more steps or a smaller step size.", overlap);
    }
    if let Some((min, max)) = bounds(&radii, &relaxation.centres) {
        info!(
            "Layout extent: x [{:.3}, {:.3}], y [{:.3}, {:.3}]",
            min.x, max.x, min.y, max.y
        );
    }

    // --- Save Results ---
    let result = LayoutResult {
        radii,
        centres: relaxation.centres,
        trajectory: relaxation.trajectory,
    };
    let out_dir = Path::new(".");
    if config.output.save_positions {
        save_positions_csv(&config.output, out_dir, &result)?;
    } else {
        info!("Skipping saving final positions as per config.");
    }
    save_layout(&config.output, out_dir, &result)?;

    info!("Layout complete.");
    Ok(())
}
