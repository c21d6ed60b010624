//! Error types for estimation

/// Estimation failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimateError {
    /// Profile area is not a positive finite number
    #[error("invalid profile: area must be positive, got {area}")]
    InvalidProfile {
        /// Offending area
        area: f64,
    },
}

/// Result alias for estimation
pub type Result<T> = std::result::Result<T, EstimateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_profile_display() {
        let err = EstimateError::InvalidProfile { area: -3.0 };
        assert_eq!(err.to_string(), "invalid profile: area must be positive, got -3");
    }
}
