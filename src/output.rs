use anyhow::Result;
use bubble_common::{subsample, LayoutResult, OutputConfig};
use log::{error, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the layout (and its trajectory, sub-sampled for playback) in the
/// configured format. Returns the path written.
pub fn save_layout(output: &OutputConfig, dir: &Path, result: &LayoutResult) -> Result<PathBuf> {
    let frames = match (&result.trajectory, output.save_trajectory) {
        (Some(trajectory), true) => Some(subsample(trajectory, output.frame_stride)),
        _ => None,
    };
    let layout = LayoutResult {
        radii: result.radii.clone(),
        centres: result.centres.clone(),
        trajectory: frames,
    };

    let output_format = output.format.as_deref().unwrap_or("json");
    let path = match output_format {
        "bincode" => {
            // Binary format (much more compact)
            let path = dir.join(format!("{}_layout.bin", output.base_filename));
            let mut file = BufWriter::new(File::create(&path)?);
            bincode::serialize_into(&mut file, &layout)?;
            file.flush()?;
            path
        }
        "messagepack" => {
            let path = dir.join(format!("{}_layout.msgpack", output.base_filename));
            let mut file = BufWriter::new(File::create(&path)?);
            rmp_serde::encode::write(&mut file, &layout)?;
            file.flush()?;
            path
        }
        other => {
            if other != "json" {
                error!("Unknown output format: {}. Using JSON instead.", other);
            }
            let path = dir.join(format!("{}_layout.json", output.base_filename));
            let json_string = serde_json::to_string(&layout)?;
            File::create(&path)?.write_all(json_string.as_bytes())?;
            path
        }
    };

    info!("Layout saved to {}", path.display());
    Ok(path)
}

/// Writes one `radius,x,y` row per bubble.
pub fn save_positions_csv(output: &OutputConfig, dir: &Path, result: &LayoutResult) -> Result<PathBuf> {
    let path = dir.join(format!("{}_final_positions.csv", output.base_filename));
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["radius", "x", "y"])?;
    for (radius, centre) in result.radii.iter().zip(&result.centres) {
        writer.write_record(&[
            format!("{:.6}", radius),
            format!("{:.6}", centre.x),
            format!("{:.6}", centre.y),
        ])?;
    }
    writer.flush()?;
    info!("Final positions saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bubble_common::{Snapshot, Vec2};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bubble-layout-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn result() -> LayoutResult {
        let trajectory = (0..5)
            .map(|step| Snapshot { step, centres: vec![Vec2::new(step as f64, 0.0)] })
            .collect();
        LayoutResult {
            radii: vec![1.5],
            centres: vec![Vec2::new(4.0, 0.0)],
            trajectory: Some(trajectory),
        }
    }

    #[test]
    fn json_output_subsamples_trajectory() {
        let dir = scratch_dir("json");
        let output = OutputConfig { save_trajectory: true, frame_stride: 2, ..OutputConfig::default() };
        let path = save_layout(&output, &dir, &result()).unwrap();

        let saved: LayoutResult = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        let steps: Vec<u32> = saved.trajectory.unwrap().iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![0, 2, 4]);
        assert_eq!(saved.centres, vec![Vec2::new(4.0, 0.0)]);
    }

    #[test]
    fn trajectory_omitted_unless_requested() {
        let dir = scratch_dir("notraj");
        let output = OutputConfig { format: Some("messagepack".into()), ..OutputConfig::default() };
        let path = save_layout(&output, &dir, &result()).unwrap();
        assert!(path.to_string_lossy().ends_with(".msgpack"));

        let json = scratch_dir("notraj-json");
        let path = save_layout(&OutputConfig::default(), &json, &result()).unwrap();
        assert!(!std::fs::read_to_string(path).unwrap().contains("trajectory"));
    }

    #[test]
    fn csv_has_one_row_per_bubble() {
        let dir = scratch_dir("csv");
        let path = save_positions_csv(&OutputConfig::default(), &dir, &result()).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["radius,x,y", "1.500000,4.000000,0.000000"]);
    }
}
