pub mod config;
pub mod error;
pub mod params;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{BubbleConfig, ForceConfig, IntegratorConfig, LayoutConfig, OutputConfig, RunConfig};
pub use error::{LayoutError, Result};
pub use params::{BackendKind, ForceModelKind, IntegratorKind, RelaxParams};
pub use snapshot::{subsample, LayoutResult, Snapshot};
pub use vecmath::{column_norms, Vec2};
