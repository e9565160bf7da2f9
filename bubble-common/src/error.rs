/// Configuration problems detected before a relaxation run starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("radius set has {radii} entries but centre set has {centres}")]
    LengthMismatch { radii: usize, centres: usize },
    #[error("radius {index} must be positive and finite, got {value}")]
    InvalidRadius { index: usize, value: f64 },
    #[error("centre {index} is not finite")]
    NonFiniteCentre { index: usize },
    #[error("{name} must be positive and finite, got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// Checks that every radius is strictly positive and finite.
pub fn validate_radii(radii: &[f64]) -> Result<()> {
    match radii.iter().position(|r| !(r.is_finite() && *r > 0.0)) {
        Some(index) => Err(LayoutError::InvalidRadius { index, value: radii[index] }),
        None => Ok(()),
    }
}

pub fn validate_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::NonPositiveParameter { name, value })
    }
}
