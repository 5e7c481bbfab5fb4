//! Euclidean space R^n viewed as a (flat) manifold.
//!
//! Retraction is plain addition and every transport is the identity, so the
//! manifold integrators reduce to their classical Runge–Kutta counterparts
//! on this space.

use manode_core::{
    buffer::ManifoldBuffer,
    error::{ManifoldError, Result},
    manifold::Manifold,
    retraction::{RetractionMethod, VectorTransportMethod},
    types::{DVector, Scalar},
};

/// Euclidean space R^n.
#[derive(Debug, Clone)]
pub struct Euclidean {
    dim: usize,
}

impl Euclidean {
    /// Creates R^n.
    ///
    /// # Errors
    /// Returns an error if `dim` is zero.
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(ManifoldError::invalid_point(
                "Euclidean space requires dimension >= 1",
            ));
        }
        Ok(Self { dim })
    }
}

impl<T: Scalar> Manifold<T> for Euclidean {
    type Point = DVector<T>;
    type TangentVector = DVector<T>;

    fn name(&self) -> &str {
        "Euclidean"
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn is_point_on_manifold(&self, point: &DVector<T>, _tolerance: T) -> bool {
        point.len() == self.dim
    }

    fn is_vector_in_tangent_space(
        &self,
        point: &DVector<T>,
        vector: &DVector<T>,
        _tolerance: T,
    ) -> bool {
        point.len() == self.dim && vector.len() == self.dim
    }

    fn project_point(&self, point: &DVector<T>, result: &mut DVector<T>) -> Result<()> {
        result.copy_from(point);
        Ok(())
    }

    fn project_tangent(
        &self,
        _point: &DVector<T>,
        vector: &DVector<T>,
        result: &mut DVector<T>,
    ) -> Result<()> {
        result.copy_from(vector);
        Ok(())
    }

    fn inner_product(&self, _point: &DVector<T>, u: &DVector<T>, v: &DVector<T>) -> Result<T> {
        Ok(u.dot(v))
    }

    fn zero_vector(&self, point: &DVector<T>) -> DVector<T> {
        point.allocate_like()
    }

    fn retract(
        &self,
        point: &DVector<T>,
        tangent: &DVector<T>,
        method: RetractionMethod,
        result: &mut DVector<T>,
    ) -> Result<()> {
        match method {
            RetractionMethod::Exponential | RetractionMethod::Projection => {
                result.zip_zip_apply(point, tangent, |r, p, v| *r = p + v);
                Ok(())
            }
            other => Err(ManifoldError::not_implemented(format!(
                "{other} retraction on Euclidean space"
            ))),
        }
    }

    fn vector_transport_to(
        &self,
        _from: &DVector<T>,
        vector: &DVector<T>,
        _to: &DVector<T>,
        method: VectorTransportMethod,
        result: &mut DVector<T>,
    ) -> Result<()> {
        match method {
            VectorTransportMethod::Parallel
            | VectorTransportMethod::Projection
            | VectorTransportMethod::Identity => {
                result.copy_from(vector);
                Ok(())
            }
            VectorTransportMethod::RightTranslation => Err(ManifoldError::not_implemented(
                "right translation on Euclidean space",
            )),
        }
    }

    fn default_transport(&self) -> VectorTransportMethod {
        VectorTransportMethod::Identity
    }

    fn is_flat(&self) -> bool {
        true
    }
}
