//! Sphere manifold S^{n-1} = {x in R^n : ||x|| = 1}
//!
//! The unit sphere is the standard test bed for ODEs on manifolds:
//! - rigid body directions (unit vectors attached to a rotating frame)
//! - spin and magnetization dynamics (Landau–Lifshitz type equations)
//! - normalized flows in data and control problems

use manode_core::{
    buffer::ManifoldBuffer,
    error::{ManifoldError, Result},
    manifold::Manifold,
    retraction::{RetractionMethod, VectorTransportMethod},
    types::{DVector, Scalar},
};
use num_traits::Float;
use rand_distr::{Distribution, StandardNormal};

/// The unit sphere S^{n-1} in R^n.
///
/// # Mathematical Properties
///
/// - **Dimension**: n-1 (for sphere in R^n)
/// - **Tangent space**: T_x S^{n-1} = {v in R^n : x^T v = 0}
/// - **Riemannian metric**: Inherited from Euclidean space (canonical metric)
/// - **Exponential map**: exp_x(v) = cos(||v||) x + sin(||v||) v/||v||
/// - **Parallel transport** along the geodesic from x to y:
///   P_{x→y}(v) = v - ⟨y, v⟩ / (1 + ⟨x, y⟩) (x + y)
#[derive(Debug, Clone)]
pub struct Sphere {
    /// Ambient dimension (n)
    ambient_dim: usize,
}

impl Sphere {
    /// Creates a new sphere S^{n-1} embedded in R^n.
    ///
    /// # Errors
    /// Returns an error if `ambient_dim` < 2
    pub fn new(ambient_dim: usize) -> Result<Self> {
        if ambient_dim < 2 {
            return Err(ManifoldError::invalid_point(
                "Sphere requires ambient dimension >= 2",
            ));
        }
        Ok(Self { ambient_dim })
    }

    /// Returns the ambient dimension (n)
    pub fn ambient_dimension(&self) -> usize {
        self.ambient_dim
    }

    /// Computes the exponential map at point x in direction v.
    ///
    /// This moves along a great circle from x in direction v.
    pub fn exp_map<T: Scalar>(&self, point: &DVector<T>, tangent: &DVector<T>) -> DVector<T> {
        let mut result = point.allocate_like();
        self.exp_into(point, tangent, &mut result);
        result
    }

    /// Computes the logarithmic map from point x to point y.
    ///
    /// log_x(y) = θ (y - cos(θ)x) / sin(θ), θ = arccos(clamp(x^T y, -1, 1))
    ///
    /// # Errors
    /// Returns an error for antipodal points, where the map is not unique.
    pub fn log_map<T: Scalar>(&self, point: &DVector<T>, other: &DVector<T>) -> Result<DVector<T>> {
        let cos_theta = <T as Float>::max(
            <T as Float>::min(point.dot(other), T::one()),
            -T::one(),
        );
        let theta = <T as Float>::acos(cos_theta);

        if theta < T::EPSILON {
            return Ok(point.allocate_like());
        }

        let sin_theta = <T as Float>::sin(theta);
        if sin_theta < T::EPSILON {
            return Err(ManifoldError::numerical_error(
                "logarithmic map undefined for antipodal points",
            ));
        }

        Ok((other - point * cos_theta) * (theta / sin_theta))
    }

    /// Geodesic distance arccos(⟨x, y⟩).
    pub fn distance<T: Scalar>(&self, x: &DVector<T>, y: &DVector<T>) -> T {
        let cos_theta = <T as Float>::max(<T as Float>::min(x.dot(y), T::one()), -T::one());
        <T as Float>::acos(cos_theta)
    }

    /// Generates a random point uniformly distributed on the sphere.
    pub fn random_point<T: Scalar>(&self) -> DVector<T> {
        let mut rng = rand::thread_rng();
        let mut point = DVector::zeros(self.ambient_dim);
        loop {
            for i in 0..self.ambient_dim {
                let val: f64 = StandardNormal.sample(&mut rng);
                point[i] = <T as Scalar>::from_f64(val);
            }
            let norm = point.norm();
            if norm > T::EPSILON {
                return point / norm;
            }
        }
    }

    /// Generates a random tangent vector at the given point.
    pub fn random_tangent<T: Scalar>(&self, point: &DVector<T>) -> DVector<T> {
        let mut rng = rand::thread_rng();
        let random_vec = DVector::from_fn(self.ambient_dim, |_, _| {
            let val: f64 = StandardNormal.sample(&mut rng);
            <T as Scalar>::from_f64(val)
        });
        let inner = point.dot(&random_vec);
        random_vec - point * inner
    }

    fn exp_into<T: Scalar>(
        &self,
        point: &DVector<T>,
        tangent: &DVector<T>,
        result: &mut DVector<T>,
    ) {
        let tangent_norm = tangent.norm();
        if tangent_norm == T::zero() {
            // exp_x(0) = x
            result.copy_from(point);
            return;
        }

        let (sin_norm, cos_norm) = <T as Float>::sin_cos(tangent_norm);
        let scale = sin_norm / tangent_norm;
        result.zip_zip_apply(point, tangent, |r, p, v| *r = p * cos_norm + v * scale);
    }

    fn check_dims<T: Scalar>(&self, vector: &DVector<T>) -> Result<()> {
        if vector.len() != self.ambient_dim {
            return Err(ManifoldError::dimension_mismatch(
                self.ambient_dim,
                vector.len(),
            ));
        }
        Ok(())
    }
}

impl<T: Scalar> Manifold<T> for Sphere {
    type Point = DVector<T>;
    type TangentVector = DVector<T>;

    fn name(&self) -> &str {
        "Sphere"
    }

    fn dimension(&self) -> usize {
        self.ambient_dim - 1
    }

    fn is_point_on_manifold(&self, point: &DVector<T>, tolerance: T) -> bool {
        if point.len() != self.ambient_dim {
            return false;
        }
        <T as Float>::abs(point.norm_squared() - T::one()) < tolerance
    }

    fn is_vector_in_tangent_space(
        &self,
        point: &DVector<T>,
        vector: &DVector<T>,
        tolerance: T,
    ) -> bool {
        if point.len() != self.ambient_dim || vector.len() != self.ambient_dim {
            return false;
        }
        // Check if v ⊥ x: <v, x> = 0
        <T as Float>::abs(point.dot(vector)) < tolerance
    }

    fn project_point(&self, point: &DVector<T>, result: &mut DVector<T>) -> Result<()> {
        self.check_dims(point)?;
        let norm = point.norm();
        if norm < T::EPSILON {
            return Err(ManifoldError::numerical_error(
                "cannot project the origin onto the sphere",
            ));
        }
        result.assign_scaled(point, T::one() / norm);
        Ok(())
    }

    fn project_tangent(
        &self,
        point: &DVector<T>,
        vector: &DVector<T>,
        result: &mut DVector<T>,
    ) -> Result<()> {
        self.check_dims(vector)?;
        // v - <v,x>x
        let inner = point.dot(vector);
        result.zip_zip_apply(vector, point, |r, v, p| *r = v - p * inner);
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
        self.check_dims(tangent)?;
        match method {
            RetractionMethod::Exponential => {
                self.exp_into(point, tangent, result);
                Ok(())
            }
            RetractionMethod::Projection => {
                // (x + v) / ||x + v||
                result.zip_zip_apply(point, tangent, |r, p, v| *r = p + v);
                let norm = result.norm();
                if norm < T::EPSILON {
                    return Err(ManifoldError::numerical_error(
                        "projection retraction through the origin",
                    ));
                }
                result.scale_in_place(T::one() / norm);
                Ok(())
            }
            other => Err(ManifoldError::not_implemented(format!(
                "{other} retraction on the sphere"
            ))),
        }
    }

    fn vector_transport_to(
        &self,
        from: &DVector<T>,
        vector: &DVector<T>,
        to: &DVector<T>,
        method: VectorTransportMethod,
        result: &mut DVector<T>,
    ) -> Result<()> {
        self.check_dims(vector)?;
        match method {
            VectorTransportMethod::Parallel => {
                let denom = T::one() + from.dot(to);
                if denom < T::EPSILON {
                    return Err(ManifoldError::numerical_error(
                        "parallel transport undefined between antipodal points",
                    ));
                }
                let coef = to.dot(vector) / denom;
                result.copy_from(vector);
                result.zip_zip_apply(from, to, |r, x, y| *r -= coef * (x + y));
                Ok(())
            }
            VectorTransportMethod::Projection => self.project_tangent(to, vector, result),
            other => Err(ManifoldError::not_implemented(format!(
                "{other} transport on the sphere"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_creation() {
        let sphere = Sphere::new(3).unwrap();
        assert_eq!(Manifold::<f64>::dimension(&sphere), 2);
        assert_eq!(sphere.ambient_dimension(), 3);
        assert!(Sphere::new(1).is_err());
    }

    #[test]
    fn test_point_on_manifold() {
        let sphere = Sphere::new(3).unwrap();

        let on_sphere = DVector::from_vec(vec![1.0, 0.0, 0.0]);
        assert!(sphere.is_point_on_manifold(&on_sphere, 1e-10));

        let not_on_sphere = DVector::from_vec(vec![2.0, 0.0, 0.0]);
        assert!(!sphere.is_point_on_manifold(&not_on_sphere, 1e-10));
    }

    #[test]
    fn test_tangent_projection() {
        let sphere = Sphere::new(3).unwrap();
        let point = DVector::from_vec(vec![1.0, 0.0, 0.0]);
        let vector = DVector::from_vec(vec![0.5, 1.0, 0.0]);

        let mut projected = DVector::zeros(3);
        sphere.project_tangent(&point, &vector, &mut projected).unwrap();
        assert_relative_eq!(point.dot(&projected), 0.0, epsilon = 1e-12);
        assert_relative_eq!(projected[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_exp_log_maps() {
        let sphere = Sphere::new(3).unwrap();
        let point = DVector::from_vec(vec![1.0, 0.0, 0.0]);
        let tangent = DVector::from_vec(vec![0.0, 0.5, 0.0]);

        let exp_result = sphere.exp_map(&point, &tangent);
        assert_relative_eq!(exp_result.norm(), 1.0, epsilon = 1e-12);

        let log_result = sphere.log_map(&point, &exp_result).unwrap();
        assert_relative_eq!(log_result, tangent, epsilon = 1e-12);

        let antipode = -&point;
        assert!(sphere.log_map(&point, &antipode).is_err());
    }

    #[test]
    fn test_retractions_stay_on_sphere() {
        let sphere = Sphere::new(4).unwrap();
        let point: DVector<f64> = sphere.random_point();
        let tangent = sphere.random_tangent(&point) * 0.3;
        let mut result = DVector::zeros(4);

        for method in [RetractionMethod::Exponential, RetractionMethod::Projection] {
            sphere.retract(&point, &tangent, method, &mut result).unwrap();
            assert!(sphere.is_point_on_manifold(&result, 1e-12));
        }

        let err = sphere.retract(&point, &tangent, RetractionMethod::QR, &mut result);
        assert!(matches!(err, Err(ManifoldError::NotImplemented { .. })));
    }

    #[test]
    fn test_parallel_transport_along_geodesic() {
        let sphere = Sphere::new(3).unwrap();
        let from = DVector::from_vec(vec![1.0, 0.0, 0.0]);
        let to = DVector::from_vec(vec![0.0, 1.0, 0.0]);
        let mut result = DVector::zeros(3);

        // The normal to the great circle is invariant
        let normal = DVector::from_vec(vec![0.0, 0.0, 1.0]);
        sphere
            .vector_transport_to(&from, &normal, &to, VectorTransportMethod::Parallel, &mut result)
            .unwrap();
        assert_relative_eq!(result, normal, epsilon = 1e-12);

        // The geodesic velocity is carried to the velocity at the end point
        let velocity = DVector::from_vec(vec![0.0, 1.0, 0.0]);
        sphere
            .vector_transport_to(
                &from,
                &velocity,
                &to,
                VectorTransportMethod::Parallel,
                &mut result,
            )
            .unwrap();
        assert_relative_eq!(result, DVector::from_vec(vec![-1.0, 0.0, 0.0]), epsilon = 1e-12);
    }

    #[test]
    fn test_transports_land_in_target_tangent_space() {
        let sphere = Sphere::new(5).unwrap();
        let from: DVector<f64> = sphere.random_point();
        let to = sphere.exp_map(&from, &(sphere.random_tangent(&from) * 0.5));
        let vector = sphere.random_tangent(&from);
        let mut result = DVector::zeros(5);

        for method in [VectorTransportMethod::Parallel, VectorTransportMethod::Projection] {
            sphere
                .vector_transport_to(&from, &vector, &to, method, &mut result)
                .unwrap();
            assert!(sphere.is_vector_in_tangent_space(&to, &result, 1e-10));
        }

        // Parallel transport is an isometry
        sphere
            .vector_transport_to(&from, &vector, &to, VectorTransportMethod::Parallel, &mut result)
            .unwrap();
        assert_relative_eq!(result.norm(), vector.norm(), epsilon = 1e-10);
    }

    #[test]
    fn test_distance() {
        let sphere = Sphere::new(3).unwrap();
        let point1 = DVector::from_vec(vec![1.0, 0.0, 0.0]);
        let point2 = DVector::from_vec(vec![0.0, 1.0, 0.0]);
        assert_relative_eq!(
            sphere.distance(&point1, &point2),
            std::f64::consts::FRAC_PI_2,
            epsilon = 1e-12
        );
    }
}
