//! Error types for profile detection

/// Detection failures
///
/// The keyword extractor itself never fails; these surface from detector
/// implementations and from the thread the detector runs on.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    /// Detector gave up on the answers
    #[error("profile detection failed: {reason}")]
    Failed {
        /// Why detection failed
        reason: String,
    },

    /// Detector produced a profile that violates profile invariants
    #[error("detected profile is invalid: {0}")]
    InvalidProfile(String),

    /// Detection thread panicked or was torn down
    #[error("profile detection interrupted: {0}")]
    Interrupted(String),
}

impl DetectionError {
    /// Create a failure with a reason
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_error_display() {
        let err = DetectionError::failed("no answers");
        assert_eq!(err.to_string(), "profile detection failed: no answers");
    }
}
