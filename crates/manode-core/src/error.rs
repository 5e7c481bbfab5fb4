//! Error types for manifold operations and manifold integrators.
//!
//! Two layers are distinguished:
//! - [`ManifoldError`] is raised by the geometric provider (retraction,
//!   vector transport, projections).
//! - [`IntegratorError`] is what a step returns. Provider failures convert
//!   into it unchanged through `?`.

use thiserror::Error;

/// Errors that can occur during manifold operations.
#[derive(Debug, Clone, Error)]
pub enum ManifoldError {
    /// Point is not on the manifold.
    ///
    /// This error occurs when a point fails to satisfy the manifold constraints
    /// within numerical tolerance.
    #[error("Point is not on the manifold: {reason}")]
    InvalidPoint {
        /// Description of why the point is invalid
        reason: String,
    },

    /// Vector is not in the tangent space.
    #[error("Vector is not in the tangent space: {reason}")]
    InvalidTangent {
        /// Description of why the tangent vector is invalid
        reason: String,
    },

    /// Dimension mismatch between tensors.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Numerical instability detected.
    ///
    /// Raised for example when a retraction is undefined for the magnitude
    /// of the given tangent vector, or a factorization is singular.
    #[error("Numerical instability detected: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },

    /// Method not supported by this manifold.
    ///
    /// Returned when a descriptor selects a retraction or vector transport
    /// that the manifold does not provide.
    #[error("Feature not implemented: {feature}")]
    NotImplemented {
        /// Name of the unimplemented feature
        feature: String,
    },
}

impl ManifoldError {
    /// Create an InvalidPoint error with a custom reason.
    pub fn invalid_point<S: Into<String>>(reason: S) -> Self {
        Self::InvalidPoint {
            reason: reason.into(),
        }
    }

    /// Create an InvalidTangent error with a custom reason.
    pub fn invalid_tangent<S: Into<String>>(reason: S) -> Self {
        Self::InvalidTangent {
            reason: reason.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }

    /// Create a NotImplemented error for a specific feature.
    pub fn not_implemented<S: Into<String>>(feature: S) -> Self {
        Self::NotImplemented {
            feature: feature.into(),
        }
    }
}

/// Errors that can occur while stepping an integrator.
#[derive(Debug, Clone, Error)]
pub enum IntegratorError {
    /// Propagated manifold error.
    ///
    /// Retraction and transport failures surface through this variant
    /// without modification.
    #[error("Manifold operation failed: {0}")]
    Manifold(#[from] ManifoldError),

    /// The vector field could not be evaluated.
    #[error("Field evaluation failed at t = {time}: {reason}")]
    FieldEvaluation {
        /// Description of the failure
        reason: String,
        /// Time at which the field was evaluated
        time: f64,
    },

    /// Invalid integrator or solver configuration.
    #[error("Invalid integrator configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// `step` was called before `initialize`.
    #[error("{algorithm} cache used before initialization")]
    NotInitialized {
        /// Name of the algorithm that owns the cache
        algorithm: String,
    },
}

impl IntegratorError {
    /// Create a FieldEvaluation error.
    pub fn field_evaluation<S: Into<String>>(reason: S, time: f64) -> Self {
        Self::FieldEvaluation {
            reason: reason.into(),
            time,
        }
    }

    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Create a NotInitialized error for the named algorithm.
    pub fn not_initialized<S: Into<String>>(algorithm: S) -> Self {
        Self::NotInitialized {
            algorithm: algorithm.into(),
        }
    }
}

/// Result type alias for operations that can produce ManifoldError.
pub type Result<T> = std::result::Result<T, ManifoldError>;

/// Result type alias for integrator operations.
pub type IntegratorResult<T> = std::result::Result<T, IntegratorError>;
