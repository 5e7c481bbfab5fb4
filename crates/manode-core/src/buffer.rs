//! Arithmetic on point and tangent-vector storage.
//!
//! Step caches never allocate on the step path: every buffer is created once
//! from a prototype with [`ManifoldBuffer::allocate_like`] and afterwards only
//! overwritten in place.

use crate::types::Scalar;
use nalgebra::{allocator::Allocator, DefaultAllocator, Dim, OMatrix};
use std::fmt::Debug;

/// Storage for manifold points and tangent vectors.
///
/// Implemented for every owned nalgebra matrix, which covers dynamic and
/// static vectors as well as matrices.
pub trait ManifoldBuffer<T: Scalar>: Clone + Debug + Send + Sync {
    /// Returns a zero-initialized buffer with the same shape as `self`.
    fn allocate_like(&self) -> Self;

    /// Overwrites `self` with `other`.
    fn assign(&mut self, other: &Self);

    /// Overwrites `self` with `alpha * other`.
    fn assign_scaled(&mut self, other: &Self, alpha: T);

    /// Multiplies `self` by `alpha` in place.
    fn scale_in_place(&mut self, alpha: T);

    /// Euclidean (Frobenius) norm of the underlying storage.
    fn frobenius_norm(&self) -> T;

    /// Returns `true` if both buffers have the same shape.
    fn same_shape(&self, other: &Self) -> bool;
}

impl<T, R, C> ManifoldBuffer<T> for OMatrix<T, R, C>
where
    T: Scalar,
    R: Dim,
    C: Dim,
    DefaultAllocator: Allocator<R, C>,
    <DefaultAllocator as Allocator<R, C>>::Buffer<T>: Send + Sync,
{
    fn allocate_like(&self) -> Self {
        let (rows, cols) = self.shape_generic();
        Self::zeros_generic(rows, cols)
    }

    fn assign(&mut self, other: &Self) {
        self.copy_from(other);
    }

    fn assign_scaled(&mut self, other: &Self, alpha: T) {
        self.zip_apply(other, |dst, src| *dst = src * alpha);
    }

    fn scale_in_place(&mut self, alpha: T) {
        self.apply(|x| *x *= alpha);
    }

    fn frobenius_norm(&self) -> T {
        self.norm()
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DMatrix, DVector, SVector};

    #[test]
    fn test_allocate_like_matches_shape() {
        let prototype = DMatrix::<f64>::from_element(3, 2, 7.0);
        let buffer = prototype.allocate_like();
        assert_eq!(buffer.shape(), (3, 2));
        assert!(buffer.iter().all(|&x| x == 0.0));
        assert!(buffer.same_shape(&prototype));
    }

    #[test]
    fn test_assign_scaled() {
        let src = DVector::from_vec(vec![1.0, -2.0, 4.0]);
        let mut dst = src.allocate_like();
        dst.assign_scaled(&src, 0.5);
        assert_eq!(dst, DVector::from_vec(vec![0.5, -1.0, 2.0]));

        dst.scale_in_place(-2.0);
        assert_eq!(dst, DVector::from_vec(vec![-1.0, 2.0, -4.0]));

        dst.assign(&src);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_static_buffers() {
        let v = SVector::<f64, 3>::new(3.0, 0.0, 4.0);
        assert_eq!(v.frobenius_norm(), 5.0);
        assert_eq!(v.allocate_like(), SVector::<f64, 3>::zeros());
    }
}
