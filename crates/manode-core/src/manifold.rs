//! Core manifold trait consumed by the integrators.
//!
//! This module defines the geometric capability every manifold provider must
//! implement so that the step algorithms can run on it. The integrators never
//! look inside points or tangent vectors: they only evaluate the field,
//! retract, transport and do buffer arithmetic through [`ManifoldBuffer`].
//!
//! # Mathematical Background
//!
//! An ODE on a manifold M is given by a vector field f with
//! f(u, t) ∈ T_u M. Advancing the state requires:
//! - **Retraction**: R_u: T_u M → M, used for every update `u ← R_u(h·X)`
//! - **Vector transport**: T_{u→v}: T_u M → T_v M, used to bring stage
//!   vectors computed at intermediate points back to a common base point
//!
//! In a flat space the retraction reduces to addition and the transport to
//! the identity, and the integrators reduce to classical Runge–Kutta methods.

use crate::{
    buffer::ManifoldBuffer,
    error::Result,
    retraction::{RetractionMethod, VectorTransportMethod},
    types::Scalar,
};
use num_traits::Float;
use std::fmt::Debug;

/// Geometric capability required by manifold integrators.
///
/// # Type Parameters
///
/// - `T`: The scalar type (f32 or f64)
///
/// # Implementation Notes
///
/// When implementing this trait:
/// - `retract` with a zero tangent must return the base point exactly
/// - `retract` and `vector_transport_to` must report unsupported method
///   selectors with [`ManifoldError::NotImplemented`](crate::error::ManifoldError::NotImplemented)
/// - implementations are shared read-only between concurrent integrations,
///   hence the `Send + Sync` bound
///
/// # Example
///
/// ```rust,ignore
/// use manode_core::prelude::*;
///
/// /// Unit circle S^1 embedded in R^2.
/// #[derive(Debug)]
/// struct Circle;
///
/// impl Manifold<f64> for Circle {
///     type Point = SVector<f64, 2>;
///     type TangentVector = SVector<f64, 2>;
///
///     fn retract(&self, point: &Self::Point, tangent: &Self::TangentVector,
///                method: RetractionMethod, result: &mut Self::Point) -> Result<()> {
///         // R_p(v) = (p + v) / ||p + v||
///         let sum = point + tangent;
///         result.copy_from(&(sum / sum.norm()));
///         Ok(())
///     }
///     // ...
/// }
/// ```
pub trait Manifold<T: Scalar>: Debug + Send + Sync {
    /// Representation of points on the manifold.
    type Point: ManifoldBuffer<T>;

    /// Representation of tangent vectors.
    type TangentVector: ManifoldBuffer<T>;

    /// Returns a human-readable name for the manifold.
    fn name(&self) -> &str;

    /// Returns the intrinsic dimension of the manifold.
    fn dimension(&self) -> usize;

    /// Checks if a point lies on the manifold within a given tolerance.
    fn is_point_on_manifold(&self, point: &Self::Point, tol: T) -> bool;

    /// Checks if a vector is in the tangent space at a given point.
    fn is_vector_in_tangent_space(
        &self,
        point: &Self::Point,
        vector: &Self::TangentVector,
        tol: T,
    ) -> bool;

    /// Projects an ambient point onto the manifold, writing into `result`.
    fn project_point(&self, point: &Self::Point, result: &mut Self::Point) -> Result<()>;

    /// Projects an ambient vector onto the tangent space at `point`.
    fn project_tangent(
        &self,
        point: &Self::Point,
        vector: &Self::TangentVector,
        result: &mut Self::TangentVector,
    ) -> Result<()>;

    /// Computes the Riemannian inner product ⟨u, v⟩_p.
    fn inner_product(
        &self,
        point: &Self::Point,
        u: &Self::TangentVector,
        v: &Self::TangentVector,
    ) -> Result<T>;

    /// Computes the norm of a tangent vector.
    ///
    /// This is equivalent to sqrt(inner_product(point, v, v)).
    fn norm(&self, point: &Self::Point, vector: &Self::TangentVector) -> Result<T> {
        self.inner_product(point, vector, vector)
            .map(<T as Float>::sqrt)
    }

    /// Returns the zero tangent vector at `point`.
    ///
    /// This is the allocation entry point for tangent buffers: caches call it
    /// once per stage with the state prototype.
    fn zero_vector(&self, point: &Self::Point) -> Self::TangentVector;

    /// Performs a retraction from the tangent space to the manifold.
    ///
    /// Writes R_point(tangent) into `result`. The caller is responsible for
    /// scaling `tangent` by the step size beforehand.
    ///
    /// # Errors
    ///
    /// Returns an error if `method` is not supported by this manifold or if
    /// the retraction is undefined for the given tangent vector.
    fn retract(
        &self,
        point: &Self::Point,
        tangent: &Self::TangentVector,
        method: RetractionMethod,
        result: &mut Self::Point,
    ) -> Result<()>;

    /// Transports `vector ∈ T_from M` into `T_to M`, writing into `result`.
    ///
    /// # Errors
    ///
    /// Returns an error if `method` is not supported by this manifold.
    fn vector_transport_to(
        &self,
        from: &Self::Point,
        vector: &Self::TangentVector,
        to: &Self::Point,
        method: VectorTransportMethod,
        result: &mut Self::TangentVector,
    ) -> Result<()>;

    /// Retraction used when a descriptor does not choose one.
    fn default_retraction(&self) -> RetractionMethod {
        RetractionMethod::Exponential
    }

    /// Vector transport used when a descriptor does not choose one.
    fn default_transport(&self) -> VectorTransportMethod {
        VectorTransportMethod::Parallel
    }

    /// Checks if the manifold is flat.
    ///
    /// Flat manifolds (like Euclidean space) have zero curvature, retraction
    /// is addition and transport is the identity.
    fn is_flat(&self) -> bool {
        false
    }
}
