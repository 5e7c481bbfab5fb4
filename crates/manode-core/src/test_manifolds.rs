//! Common test manifolds for use in unit tests.
//!
//! This module provides small manifold implementations that can be used
//! across test modules and downstream crates (feature `test-utils`) without
//! pulling in the full providers.

#![cfg(any(test, feature = "test-utils"))]

use crate::{
    buffer::ManifoldBuffer,
    error::{ManifoldError, Result},
    manifold::Manifold,
    retraction::{RetractionMethod, VectorTransportMethod},
    types::{DVector, Scalar},
};
use num_traits::Float;

/// A simple Euclidean manifold for testing.
///
/// Every retraction is addition and every transport is the identity.
#[derive(Debug, Clone)]
pub struct TestEuclideanManifold {
    dim: usize,
}

impl TestEuclideanManifold {
    /// Creates the test manifold of the given ambient dimension.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl<T: Scalar> Manifold<T> for TestEuclideanManifold {
    type Point = DVector<T>;
    type TangentVector = DVector<T>;

    fn name(&self) -> &str {
        "TestEuclidean"
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn is_point_on_manifold(&self, point: &Self::Point, _tol: T) -> bool {
        point.len() == self.dim
    }

    fn is_vector_in_tangent_space(
        &self,
        _point: &Self::Point,
        vector: &Self::TangentVector,
        _tol: T,
    ) -> bool {
        vector.len() == self.dim
    }

    fn project_point(&self, point: &Self::Point, result: &mut Self::Point) -> Result<()> {
        result.copy_from(point);
        Ok(())
    }

    fn project_tangent(
        &self,
        _point: &Self::Point,
        vector: &Self::TangentVector,
        result: &mut Self::TangentVector,
    ) -> Result<()> {
        result.copy_from(vector);
        Ok(())
    }

    fn inner_product(
        &self,
        _point: &Self::Point,
        u: &Self::TangentVector,
        v: &Self::TangentVector,
    ) -> Result<T> {
        Ok(u.dot(v))
    }

    fn zero_vector(&self, point: &Self::Point) -> Self::TangentVector {
        point.allocate_like()
    }

    fn retract(
        &self,
        point: &Self::Point,
        tangent: &Self::TangentVector,
        _method: RetractionMethod,
        result: &mut Self::Point,
    ) -> Result<()> {
        result.zip_zip_apply(point, tangent, |r, p, v| *r = p + v);
        Ok(())
    }

    fn vector_transport_to(
        &self,
        _from: &Self::Point,
        vector: &Self::TangentVector,
        _to: &Self::Point,
        _method: VectorTransportMethod,
        result: &mut Self::TangentVector,
    ) -> Result<()> {
        result.copy_from(vector);
        Ok(())
    }

    fn is_flat(&self) -> bool {
        true
    }
}

/// A simple sphere manifold for testing.
///
/// This represents the unit sphere S^{n-1} in R^n with the exponential and
/// projection retractions and projection transport.
#[derive(Debug, Clone)]
pub struct TestSphereManifold {
    dim: usize,
}

impl TestSphereManifold {
    /// Creates the test manifold of the given ambient dimension.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl<T: Scalar> Manifold<T> for TestSphereManifold {
    type Point = DVector<T>;
    type TangentVector = DVector<T>;

    fn name(&self) -> &str {
        "TestSphere"
    }

    fn dimension(&self) -> usize {
        self.dim - 1
    }

    fn is_point_on_manifold(&self, point: &DVector<T>, tol: T) -> bool {
        <T as Float>::abs(point.norm_squared() - T::one()) < tol
    }

    fn is_vector_in_tangent_space(&self, point: &DVector<T>, vector: &DVector<T>, tol: T) -> bool {
        <T as Float>::abs(point.dot(vector)) < tol
    }

    fn project_point(&self, point: &Self::Point, result: &mut Self::Point) -> Result<()> {
        let norm = point.norm();
        if norm < T::EPSILON {
            return Err(ManifoldError::numerical_error("cannot project the origin"));
        }
        result.assign_scaled(point, T::one() / norm);
        Ok(())
    }

    fn project_tangent(
        &self,
        point: &Self::Point,
        vector: &Self::TangentVector,
        result: &mut Self::TangentVector,
    ) -> Result<()> {
        let inner = point.dot(vector);
        result.zip_zip_apply(vector, point, |r, v, p| *r = v - p * inner);
        Ok(())
    }

    fn inner_product(
        &self,
        _point: &Self::Point,
        u: &Self::TangentVector,
        v: &Self::TangentVector,
    ) -> Result<T> {
        Ok(u.dot(v))
    }

    fn zero_vector(&self, point: &Self::Point) -> Self::TangentVector {
        point.allocate_like()
    }

    fn retract(
        &self,
        point: &Self::Point,
        tangent: &Self::TangentVector,
        method: RetractionMethod,
        result: &mut Self::Point,
    ) -> Result<()> {
        let norm = tangent.norm();
        if norm == T::zero() {
            result.copy_from(point);
            return Ok(());
        }
        match method {
            RetractionMethod::Exponential => {
                let (sin, cos) = <T as Float>::sin_cos(norm);
                let scale = sin / norm;
                result.zip_zip_apply(point, tangent, |r, p, v| *r = p * cos + v * scale);
                Ok(())
            }
            RetractionMethod::Projection => {
                result.zip_zip_apply(point, tangent, |r, p, v| *r = p + v);
                let n = result.norm();
                result.scale_in_place(T::one() / n);
                Ok(())
            }
            other => Err(ManifoldError::not_implemented(format!(
                "{other} retraction on TestSphere"
            ))),
        }
    }

    fn vector_transport_to(
        &self,
        _from: &Self::Point,
        vector: &Self::TangentVector,
        to: &Self::Point,
        method: VectorTransportMethod,
        result: &mut Self::TangentVector,
    ) -> Result<()> {
        match method {
            VectorTransportMethod::Projection => self.project_tangent(to, vector, result),
            other => Err(ManifoldError::not_implemented(format!(
                "{other} transport on TestSphere"
            ))),
        }
    }

    fn default_transport(&self) -> VectorTransportMethod {
        VectorTransportMethod::Projection
    }
}
