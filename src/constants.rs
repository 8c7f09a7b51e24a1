//! Cross-cutting, shared constants.
//!
//! The scoring calibration values below were chosen empirically against the competency
//! taxonomy. They are kept as named constants so the numeric policy lives in one place;
//! [`crate::scoring::ScoringParams`] gathers them for runtime use.
//!
//! # Dimension Invariants
//!
//! The embedding dimension is treated as a default, not a hard invariant: the active
//! embedder reports its own dimension and the vector cache records it. Use
//! [`validate_embedding_dim`] at module boundaries to catch mismatches early.

/// Output dimension of the default sentence encoder (MiniLM-L6 class models).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Max tokens fed to the sentence encoder per text.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Number of highest-scoring competencies averaged into a block score.
pub const BLOCK_TOP_K: usize = 5;

/// Block score above which the expert bonus applies (strictly greater).
pub const EXPERT_THRESHOLD: f32 = 0.6;

/// Multiplier applied to block scores above [`EXPERT_THRESHOLD`] during job matching.
pub const EXPERT_BONUS: f32 = 1.1;

/// Rescaling applied to the raw job average before clamping to `1.0`.
pub const NORMALIZATION_MULTIPLIER: f32 = 1.5;

/// Number of competencies reported in the top-competency detail.
pub const TOP_COMPETENCY_COUNT: usize = 10;

/// Block score below which a block is treated as a gap in progression plans.
pub const WEAK_BLOCK_THRESHOLD: f32 = 0.6;

/// Statements with more words than this are scored as-is, without enrichment.
pub const ENRICH_MAX_WORDS: usize = 6;

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use skillmatch::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// validate_embedding_dim(384, DEFAULT_EMBEDDING_DIM).unwrap();
/// assert!(validate_embedding_dim(768, DEFAULT_EMBEDDING_DIM).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_values() {
        assert_eq!(BLOCK_TOP_K, 5);
        assert_eq!(EXPERT_THRESHOLD, 0.6);
        assert_eq!(EXPERT_BONUS, 1.1);
        assert_eq!(NORMALIZATION_MULTIPLIER, 1.5);
        assert_eq!(TOP_COMPETENCY_COUNT, 10);
    }

    #[test]
    fn test_validate_embedding_dim_match() {
        assert!(validate_embedding_dim(384, 384).is_ok());
    }

    #[test]
    fn test_validate_embedding_dim_zero() {
        assert_eq!(
            validate_embedding_dim(0, 384),
            Err(DimValidationError::ZeroDimension)
        );
    }

    #[test]
    fn test_validate_embedding_dim_mismatch() {
        assert_eq!(
            validate_embedding_dim(768, 384),
            Err(DimValidationError::DimensionMismatch {
                expected: 384,
                actual: 768
            })
        );
    }

    #[test]
    fn test_error_display() {
        let err = DimValidationError::ZeroDimension;
        assert_eq!(err.to_string(), "embedding dimension cannot be zero");

        let err = DimValidationError::DimensionMismatch {
            expected: 384,
            actual: 768,
        };
        assert!(err.to_string().contains("384"));
        assert!(err.to_string().contains("768"));
    }
}
