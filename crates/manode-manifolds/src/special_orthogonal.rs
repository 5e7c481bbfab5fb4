//! Special orthogonal group SO(n) = {R in R^{n×n} : R^T R = I, det R = 1}
//!
//! Rotations are the canonical Lie group state space: rigid body attitude,
//! frames transported along curves, orthogonal flows in numerical linear
//! algebra.
//!
//! Tangent vectors are stored in ambient form V = R Ω with Ω skew-symmetric.
//! Equations written in right-trivialized form `R' = A(t, R) R` therefore give
//! a field value `A R` directly.

use manode_core::{
    buffer::ManifoldBuffer,
    error::{ManifoldError, Result},
    manifold::Manifold,
    retraction::{RetractionMethod, VectorTransportMethod},
    types::{DMatrix, DVector, Scalar},
};
use num_traits::Float;
use rand_distr::{Distribution, StandardNormal};

/// The rotation group SO(n) with the bi-invariant metric ⟨U, V⟩ = tr(U^T V).
///
/// # Mathematical Properties
///
/// - **Dimension**: n(n-1)/2
/// - **Tangent space**: T_R SO(n) = {R Ω : Ω^T = -Ω}
/// - **Exponential map**: exp_R(V) = R expm(R^T V)
/// - **Cayley retraction**: R (I - Ω/2)^{-1} (I + Ω/2)
/// - **QR / polar retractions**: orthogonal factor of R + V
/// - **Right translation**: V ∈ T_X ↦ V X^T Y ∈ T_Y
#[derive(Debug, Clone)]
pub struct SpecialOrthogonal {
    n: usize,
}

impl SpecialOrthogonal {
    /// Creates SO(n).
    ///
    /// # Errors
    /// Returns an error if `n` < 2
    pub fn new(n: usize) -> Result<Self> {
        if n < 2 {
            return Err(ManifoldError::invalid_point(
                "SO(n) requires n >= 2",
            ));
        }
        Ok(Self { n })
    }

    /// Returns n.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Skew-symmetric part (A - A^T) / 2.
    pub fn skew<T: Scalar>(a: &DMatrix<T>) -> DMatrix<T> {
        (a - a.transpose()) * <T as Scalar>::from_f64(0.5)
    }

    /// Maps ω ∈ R^3 to the skew matrix [ω]_× of so(3).
    ///
    /// # Panics
    /// Panics if `omega` does not have three entries.
    pub fn hat<T: Scalar>(omega: &DVector<T>) -> DMatrix<T> {
        assert_eq!(omega.len(), 3, "hat map is defined on R^3");
        let zero = T::zero();
        DMatrix::from_row_slice(
            3,
            3,
            &[
                zero, -omega[2], omega[1],
                omega[2], zero, -omega[0],
                -omega[1], omega[0], zero,
            ],
        )
    }

    /// Computes exp_R(V) = R expm(R^T V).
    pub fn exp_map<T: Scalar>(&self, point: &DMatrix<T>, tangent: &DMatrix<T>) -> DMatrix<T> {
        let omega = point.tr_mul(tangent);
        point * omega.exp()
    }

    /// Generates a random rotation (Haar distributed up to the sign fix).
    pub fn random_point<T: Scalar>(&self) -> DMatrix<T> {
        let mut rng = rand::thread_rng();
        let gaussian = DMatrix::from_fn(self.n, self.n, |_, _| {
            let val: f64 = StandardNormal.sample(&mut rng);
            <T as Scalar>::from_f64(val)
        });
        let mut q = positive_qr_factor(&gaussian);
        if q.determinant() < T::zero() {
            q.column_mut(0).neg_mut();
        }
        q
    }

    /// Generates a random tangent vector R Ω at the given point.
    pub fn random_tangent<T: Scalar>(&self, point: &DMatrix<T>) -> DMatrix<T> {
        let mut rng = rand::thread_rng();
        let gaussian = DMatrix::from_fn(self.n, self.n, |_, _| {
            let val: f64 = StandardNormal.sample(&mut rng);
            <T as Scalar>::from_f64(val)
        });
        point * Self::skew(&gaussian)
    }

    fn check_shape<T: Scalar>(&self, matrix: &DMatrix<T>) -> Result<()> {
        if matrix.shape() != (self.n, self.n) {
            return Err(ManifoldError::dimension_mismatch(
                format!("({}, {})", self.n, self.n),
                format!("({}, {})", matrix.nrows(), matrix.ncols()),
            ));
        }
        Ok(())
    }
}

/// Q factor of the QR decomposition with a positive diagonal in R.
fn positive_qr_factor<T: Scalar>(matrix: &DMatrix<T>) -> DMatrix<T> {
    let qr = matrix.clone().qr();
    let r = qr.r();
    let mut q = qr.q();
    for j in 0..q.ncols() {
        if r[(j, j)] < T::zero() {
            q.column_mut(j).neg_mut();
        }
    }
    q
}

/// Orthogonal polar factor U V^T of the SVD U Σ V^T.
fn polar_factor<T: Scalar>(matrix: &DMatrix<T>) -> Result<DMatrix<T>> {
    let svd = matrix.clone().svd(true, true);
    match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => Ok(u * v_t),
        _ => Err(ManifoldError::numerical_error(
            "SVD failed in polar retraction",
        )),
    }
}

impl<T: Scalar> Manifold<T> for SpecialOrthogonal {
    type Point = DMatrix<T>;
    type TangentVector = DMatrix<T>;

    fn name(&self) -> &str {
        "SpecialOrthogonal"
    }

    fn dimension(&self) -> usize {
        self.n * (self.n - 1) / 2
    }

    fn is_point_on_manifold(&self, point: &DMatrix<T>, tolerance: T) -> bool {
        if point.shape() != (self.n, self.n) {
            return false;
        }
        let gram = point.tr_mul(point);
        let identity = DMatrix::<T>::identity(self.n, self.n);
        (gram - identity).norm() < tolerance
            && <T as Float>::abs(point.determinant() - T::one()) < tolerance
    }

    fn is_vector_in_tangent_space(
        &self,
        point: &DMatrix<T>,
        vector: &DMatrix<T>,
        tolerance: T,
    ) -> bool {
        if point.shape() != (self.n, self.n) || vector.shape() != (self.n, self.n) {
            return false;
        }
        // R^T V must be skew-symmetric
        let omega = point.tr_mul(vector);
        (&omega + omega.transpose()).norm() < tolerance
    }

    fn project_point(&self, point: &DMatrix<T>, result: &mut DMatrix<T>) -> Result<()> {
        self.check_shape(point)?;
        let mut q = polar_factor(point)?;
        if q.determinant() < T::zero() {
            return Err(ManifoldError::invalid_point(
                "matrix has negative determinant and cannot be projected onto SO(n)",
            ));
        }
        std::mem::swap(result, &mut q);
        Ok(())
    }

    fn project_tangent(
        &self,
        point: &DMatrix<T>,
        vector: &DMatrix<T>,
        result: &mut DMatrix<T>,
    ) -> Result<()> {
        self.check_shape(vector)?;
        let omega = Self::skew(&point.tr_mul(vector));
        point.mul_to(&omega, result);
        Ok(())
    }

    fn inner_product(&self, _point: &DMatrix<T>, u: &DMatrix<T>, v: &DMatrix<T>) -> Result<T> {
        Ok(u.dot(v))
    }

    fn zero_vector(&self, point: &DMatrix<T>) -> DMatrix<T> {
        point.allocate_like()
    }

    fn retract(
        &self,
        point: &DMatrix<T>,
        tangent: &DMatrix<T>,
        method: RetractionMethod,
        result: &mut DMatrix<T>,
    ) -> Result<()> {
        self.check_shape(tangent)?;
        if tangent.iter().all(|x| *x == T::zero()) {
            result.copy_from(point);
            return Ok(());
        }

        match method {
            RetractionMethod::Exponential => {
                let omega = point.tr_mul(tangent);
                point.mul_to(&omega.exp(), result);
            }
            RetractionMethod::Cayley => {
                let half_omega = point.tr_mul(tangent) * <T as Scalar>::from_f64(0.5);
                let identity = DMatrix::<T>::identity(self.n, self.n);
                let cayley = (&identity - &half_omega)
                    .lu()
                    .solve(&(&identity + &half_omega))
                    .ok_or_else(|| {
                        ManifoldError::numerical_error("singular factor in Cayley retraction")
                    })?;
                point.mul_to(&cayley, result);
            }
            RetractionMethod::QR => {
                result.copy_from(&positive_qr_factor(&(point + tangent)));
            }
            RetractionMethod::Polar | RetractionMethod::Projection => {
                result.copy_from(&polar_factor(&(point + tangent))?);
            }
        }
        Ok(())
    }

    fn vector_transport_to(
        &self,
        from: &DMatrix<T>,
        vector: &DMatrix<T>,
        to: &DMatrix<T>,
        method: VectorTransportMethod,
        result: &mut DMatrix<T>,
    ) -> Result<()> {
        self.check_shape(vector)?;
        match method {
            VectorTransportMethod::RightTranslation => {
                // V X^T Y: the generator V X^T is carried unchanged
                let generator = vector * from.transpose();
                generator.mul_to(to, result);
                Ok(())
            }
            VectorTransportMethod::Projection => self.project_tangent(to, vector, result),
            other => Err(ManifoldError::not_implemented(format!(
                "{other} transport on SO(n)"
            ))),
        }
    }

    fn default_transport(&self) -> VectorTransportMethod {
        VectorTransportMethod::RightTranslation
    }
}
