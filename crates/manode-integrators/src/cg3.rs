//! Crouch–Grossmann method of order 3 (tableau 6.1 of Owren–Marthinsen).
//!
//! ```text
//! 0     | 0
//! 3/4   | 3/4      0
//! 17/24 | 119/216  17/108   0
//! ---------------------------------
//!       | 13/51    -2/3     24/17
//! ```
//!
//! Each nonzero tableau entry is its own retraction. Stage three is reached by
//! two consecutive retractions from `u`, and the update applies the three
//! weighted stages one after the other:
//!
//! ```text
//! u ← R_u(b1 h X1)
//! u ← R_u(b2 h T_{u2→u} X2)
//! u ← R_u(b3 h T_{u3→u} X3)
//! ```
//!
//! Every transport targets the state produced by the previous retraction, so
//! the three updates cannot be merged or reordered. They are written straight
//! into `u`: a failure in the middle of the sequence leaves `u` partially
//! advanced.

use crate::integrator::{
    check_prototype, coefficient, retract_in_place, CacheState, IntegratorCache,
    ManifoldIntegrator,
};
use crate::tableau::cg3::{A, B, C, ORDER, STAGES};
use manode_core::{
    buffer::ManifoldBuffer,
    error::{IntegratorError, IntegratorResult},
    field::ManifoldOdeFunction,
    manifold::Manifold,
    retraction::{RetractionMethod, VectorTransportMethod},
    stats::IntegrationStats,
    types::Scalar,
};
use std::marker::PhantomData;

/// CG3 descriptor.
///
/// # Example
///
/// ```rust,ignore
/// let cg3 = CG3::new(SpecialOrthogonal::new(3)?)
///     .with_retraction(RetractionMethod::Cayley)
///     .with_transport(VectorTransportMethod::RightTranslation);
/// ```
#[derive(Debug, Clone)]
pub struct CG3<T, M> {
    manifold: M,
    retraction: RetractionMethod,
    transport: VectorTransportMethod,
    _scalar: PhantomData<fn() -> T>,
}

impl<T, M> CG3<T, M>
where
    T: Scalar,
    M: Manifold<T>,
{
    /// Creates the method with the manifold's default retraction and
    /// transport.
    pub fn new(manifold: M) -> Self {
        let retraction = manifold.default_retraction();
        let transport = manifold.default_transport();
        Self {
            manifold,
            retraction,
            transport,
            _scalar: PhantomData,
        }
    }

    /// Sets the retraction.
    pub fn with_retraction(mut self, method: RetractionMethod) -> Self {
        self.retraction = method;
        self
    }

    /// Sets the vector transport.
    pub fn with_transport(mut self, method: VectorTransportMethod) -> Self {
        self.transport = method;
        self
    }

    /// Retraction used by every step.
    pub fn retraction(&self) -> RetractionMethod {
        self.retraction
    }

    /// Vector transport used by every step.
    pub fn transport(&self) -> VectorTransportMethod {
        self.transport
    }
}

/// Scratch storage of [`CG3`].
#[derive(Debug, Clone)]
pub struct CG3Cache<T, M>
where
    T: Scalar,
    M: Manifold<T>,
{
    fsal_first: M::TangentVector,
    k1: M::TangentVector,
    k2: M::TangentVector,
    k3: M::TangentVector,
    transported: M::TangentVector,
    scaled: M::TangentVector,
    u2: M::Point,
    u3_partial: M::Point,
    u3: M::Point,
    base: M::Point,
    state: CacheState,
    stats: IntegrationStats,
}

impl<T, M> CG3Cache<T, M>
where
    T: Scalar,
    M: Manifold<T>,
{
    /// Field value stored by `initialize`.
    pub fn fsal_first(&self) -> &M::TangentVector {
        &self.fsal_first
    }

    /// Stage values `[X1, X2, X3]` of the last step.
    pub fn stage_values(&self) -> [&M::TangentVector; STAGES] {
        [&self.k1, &self.k2, &self.k3]
    }

    /// Stage points `[u2, u3]` of the last step.
    pub fn stage_points(&self) -> [&M::Point; STAGES - 1] {
        [&self.u2, &self.u3]
    }
}

impl<T, M> IntegratorCache for CG3Cache<T, M>
where
    T: Scalar,
    M: Manifold<T>,
{
    fn state(&self) -> CacheState {
        self.state
    }

    fn stats(&self) -> &IntegrationStats {
        &self.stats
    }

    fn reset(&mut self) {
        self.state = CacheState::Uninitialized;
        self.stats.reset();
    }
}

impl<T, M> ManifoldIntegrator<T, M> for CG3<T, M>
where
    T: Scalar,
    M: Manifold<T>,
{
    type Cache = CG3Cache<T, M>;

    fn name(&self) -> &str {
        "CG3"
    }

    fn order(&self) -> usize {
        ORDER
    }

    fn stages(&self) -> usize {
        STAGES
    }

    fn manifold(&self) -> &M {
        &self.manifold
    }

    fn alloc_cache(&self, prototype: &M::Point) -> Self::Cache {
        let zero = self.manifold.zero_vector(prototype);
        CG3Cache {
            fsal_first: zero.allocate_like(),
            k1: zero.allocate_like(),
            k2: zero.allocate_like(),
            k3: zero.allocate_like(),
            transported: zero.allocate_like(),
            scaled: zero,
            u2: prototype.allocate_like(),
            u3_partial: prototype.allocate_like(),
            u3: prototype.allocate_like(),
            base: prototype.allocate_like(),
            state: CacheState::Uninitialized,
            stats: IntegrationStats::new(),
        }
    }

    fn initialize<F, P>(
        &self,
        cache: &mut Self::Cache,
        field: &F,
        u: &M::Point,
        params: &P,
        t: T,
    ) -> IntegratorResult<usize>
    where
        F: ManifoldOdeFunction<T, M, P>,
    {
        check_prototype::<T, _>(u, &cache.base)?;
        field.evaluate(&mut cache.fsal_first, u, params, t)?;
        cache.stats.record_evaluation();
        cache.state = CacheState::Initialized;
        Ok(1)
    }

    fn step<F, P>(
        &self,
        cache: &mut Self::Cache,
        field: &F,
        u: &mut M::Point,
        params: &P,
        t: T,
        dt: T,
    ) -> IntegratorResult<usize>
    where
        F: ManifoldOdeFunction<T, M, P>,
    {
        if !cache.state.is_ready() {
            return Err(IntegratorError::not_initialized(self.name()));
        }
        check_prototype::<T, _>(u, &cache.base)?;
        let manifold = &self.manifold;
        let retraction = self.retraction;
        let t2 = t + coefficient::<T>(C[1]) * dt;
        let t3 = t + coefficient::<T>(C[2]) * dt;

        // Stage 1
        field.evaluate(&mut cache.k1, u, params, t)?;
        cache.stats.record_evaluation();

        // Stage 2: u2 = R_u(a21 h X1)
        cache
            .scaled
            .assign_scaled(&cache.k1, coefficient::<T>(A[1][0]) * dt);
        manifold.retract(u, &cache.scaled, retraction, &mut cache.u2)?;
        cache.stats.record_retraction();
        field.evaluate(&mut cache.k2, &cache.u2, params, t2)?;
        cache.stats.record_evaluation();

        // Stage 3: u3 = R_{u3'}(a32 h T_{u2→u3'} X2), u3' = R_u(a31 h X1)
        cache
            .scaled
            .assign_scaled(&cache.k1, coefficient::<T>(A[2][0]) * dt);
        manifold.retract(u, &cache.scaled, retraction, &mut cache.u3_partial)?;
        cache.stats.record_retraction();
        field.transport(
            manifold,
            self.transport,
            &mut cache.transported,
            &cache.u2,
            &cache.k2,
            &cache.u3_partial,
            params,
            t3,
            t2,
        )?;
        cache.stats.record_transport();
        cache
            .scaled
            .assign_scaled(&cache.transported, coefficient::<T>(A[2][1]) * dt);
        manifold.retract(&cache.u3_partial, &cache.scaled, retraction, &mut cache.u3)?;
        cache.stats.record_retraction();
        field.evaluate(&mut cache.k3, &cache.u3, params, t3)?;
        cache.stats.record_evaluation();

        // Update, in tableau order
        cache
            .scaled
            .assign_scaled(&cache.k1, coefficient::<T>(B[0]) * dt);
        retract_in_place::<T, M>(manifold, retraction, &mut cache.base, &cache.scaled, u)?;
        cache.stats.record_retraction();

        field.transport(
            manifold,
            self.transport,
            &mut cache.transported,
            &cache.u2,
            &cache.k2,
            u,
            params,
            t,
            t2,
        )?;
        cache.stats.record_transport();
        cache
            .scaled
            .assign_scaled(&cache.transported, coefficient::<T>(B[1]) * dt);
        retract_in_place::<T, M>(manifold, retraction, &mut cache.base, &cache.scaled, u)?;
        cache.stats.record_retraction();

        field.transport(
            manifold,
            self.transport,
            &mut cache.transported,
            &cache.u3,
            &cache.k3,
            u,
            params,
            t,
            t3,
        )?;
        cache.stats.record_transport();
        cache
            .scaled
            .assign_scaled(&cache.transported, coefficient::<T>(B[2]) * dt);
        retract_in_place::<T, M>(manifold, retraction, &mut cache.base, &cache.scaled, u)?;
        cache.stats.record_retraction();

        cache.stats.record_step();
        cache.state = CacheState::Stepping;
        Ok(STAGES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use manode_core::{
        error::ManifoldError,
        field::FnOdeFunction,
        test_manifolds::{TestEuclideanManifold, TestSphereManifold},
        types::DVector,
    };
    use pretty_assertions::assert_eq;

    type Field = fn(&mut DVector<f64>, &DVector<f64>, &(), f64) -> IntegratorResult<()>;

    fn nonlinear(
        out: &mut DVector<f64>,
        u: &DVector<f64>,
        _p: &(),
        t: f64,
    ) -> IntegratorResult<()> {
        out[0] = u[1] * u[2] - t.sin();
        out[1] = u[0].cos() + t;
        out[2] = -0.5 * u[2];
        Ok(())
    }

    fn rotation(
        out: &mut DVector<f64>,
        u: &DVector<f64>,
        _p: &(),
        _t: f64,
    ) -> IntegratorResult<()> {
        out[0] = -u[1];
        out[1] = u[0];
        out[2] = 0.0;
        Ok(())
    }

    #[test]
    fn test_flat_cg3_matches_classical_tableau() {
        let cg3: CG3<f64, _> = CG3::new(TestEuclideanManifold::new(3));
        let field = FnOdeFunction::new(nonlinear as Field);
        let u0 = DVector::from_vec(vec![0.2, -0.4, 1.1]);
        let (t, dt) = (0.3, 0.05);

        let mut u = u0.clone();
        let mut cache = cg3.alloc_cache(&u);
        cg3.initialize(&mut cache, &field, &u, &(), t).unwrap();
        cg3.step(&mut cache, &field, &mut u, &(), t, dt).unwrap();

        let mut k1 = DVector::zeros(3);
        nonlinear(&mut k1, &u0, &(), t).unwrap();
        let y2 = &u0 + &k1 * (A[1][0] * dt);
        let mut k2 = DVector::zeros(3);
        nonlinear(&mut k2, &y2, &(), t + C[1] * dt).unwrap();
        let y3 = &u0 + (&k1 * A[2][0] + &k2 * A[2][1]) * dt;
        let mut k3 = DVector::zeros(3);
        nonlinear(&mut k3, &y3, &(), t + C[2] * dt).unwrap();
        let expected = &u0 + (&k1 * B[0] + &k2 * B[1] + &k3 * B[2]) * dt;

        assert_relative_eq!(u, expected, epsilon = 1e-14);
    }

    #[test]
    fn test_stats_count_every_retraction() {
        let cg3: CG3<f64, _> = CG3::new(TestSphereManifold::new(3));
        let field = FnOdeFunction::new(rotation as Field);
        let mut u = DVector::from_vec(vec![0.0, 0.6, 0.8]);
        let mut cache = cg3.alloc_cache(&u);

        cg3.initialize(&mut cache, &field, &u, &(), 0.0).unwrap();
        let evals = cg3.step(&mut cache, &field, &mut u, &(), 0.0, 0.1).unwrap();

        assert_eq!(evals, 3);
        assert_eq!(
            *cache.stats(),
            IntegrationStats {
                field_evaluations: 4,
                steps: 1,
                retractions: 6,
                transports: 3,
            }
        );
        assert!(cg3.manifold().is_point_on_manifold(&u, 1e-12));
    }

    #[test]
    fn test_unsupported_retraction_propagates() {
        let cg3: CG3<f64, _> =
            CG3::new(TestSphereManifold::new(3)).with_retraction(RetractionMethod::Cayley);
        let field = FnOdeFunction::new(rotation as Field);
        let mut u = DVector::from_vec(vec![0.0, 0.6, 0.8]);
        let mut cache = cg3.alloc_cache(&u);

        cg3.initialize(&mut cache, &field, &u, &(), 0.0).unwrap();
        let err = cg3.step(&mut cache, &field, &mut u, &(), 0.0, 0.1).unwrap_err();
        assert!(matches!(
            err,
            IntegratorError::Manifold(ManifoldError::NotImplemented { .. })
        ));
        assert_eq!(cache.state(), CacheState::Initialized);
    }
}
