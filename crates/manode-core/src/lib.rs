//! Core traits and types for integrating ODEs on manifolds.
//!
//! This crate provides the capability layer shared by every manifold
//! integrator: what a manifold must be able to do (retract, transport,
//! allocate buffers), how a vector field is evaluated, and how failures and
//! costs are reported.
//!
//! # Key Concepts
//!
//! - **Manifolds**: Smooth spaces that locally resemble Euclidean space
//! - **Tangent vectors**: Outputs of field evaluations, tied to a base point
//! - **Retractions**: Smooth maps from tangent spaces back to the manifold
//! - **Vector transport**: Moves tangent vectors between base points
//!
//! # Modules
//!
//! - [`buffer`]: In-place arithmetic on point and tangent storage
//! - [`error`]: Error types for manifold operations and integrators
//! - [`field`]: Vector fields `u' = f(u, p, t)`
//! - [`manifold`]: Core manifold trait
//! - [`retraction`]: Retraction and vector transport selectors
//! - [`stats`]: Evaluation counters
//! - [`types`]: The `Scalar` trait and nalgebra aliases

pub mod buffer;
pub mod error;
pub mod field;
pub mod manifold;
pub mod retraction;
pub mod stats;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_manifolds;

// Re-export commonly used items at the crate root
pub use error::{IntegratorError, IntegratorResult, ManifoldError, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use manode_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::ManifoldBuffer;
    pub use crate::error::{IntegratorError, IntegratorResult, ManifoldError, Result};
    pub use crate::field::{CountingOdeFunction, FnOdeFunction, ManifoldOdeFunction};
    pub use crate::manifold::Manifold;
    pub use crate::retraction::{RetractionMethod, RetractionOrder, VectorTransportMethod};
    pub use crate::stats::IntegrationStats;
    pub use crate::types::{DMatrix, DVector, SMatrix, SVector, Scalar};
}
