//! Crouch–Grossmann method of order 2.
//!
//! The manifold version of the explicit midpoint rule:
//!
//! ```text
//! X1 = f(u, t)
//! u2 = R_u(h/2 X1)
//! X2 = f(u2, t + h/2)
//! u  ← R_u(h T_{u2→u} X2)
//! ```
//!
//! The midpoint value is transported back to the base point before it is
//! used; stage vectors are never combined in different tangent spaces.

use crate::integrator::{
    check_prototype, coefficient, CacheState, IntegratorCache, ManifoldIntegrator,
};
use crate::tableau::cg2::{A, B, C, ORDER, STAGES};
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

/// CG2 descriptor.
#[derive(Debug, Clone)]
pub struct CG2<T, M> {
    manifold: M,
    retraction: RetractionMethod,
    transport: VectorTransportMethod,
    _scalar: PhantomData<fn() -> T>,
}

impl<T, M> CG2<T, M>
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

/// Scratch storage of [`CG2`].
#[derive(Debug, Clone)]
pub struct CG2Cache<T, M>
where
    T: Scalar,
    M: Manifold<T>,
{
    fsal_first: M::TangentVector,
    k1: M::TangentVector,
    k2: M::TangentVector,
    k2_transported: M::TangentVector,
    scaled: M::TangentVector,
    u2: M::Point,
    next: M::Point,
    state: CacheState,
    stats: IntegrationStats,
}

impl<T, M> CG2Cache<T, M>
where
    T: Scalar,
    M: Manifold<T>,
{
    /// Field value stored by `initialize`.
    pub fn fsal_first(&self) -> &M::TangentVector {
        &self.fsal_first
    }

    /// Midpoint of the last step.
    pub fn midpoint(&self) -> &M::Point {
        &self.u2
    }
}

impl<T, M> IntegratorCache for CG2Cache<T, M>
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

impl<T, M> ManifoldIntegrator<T, M> for CG2<T, M>
where
    T: Scalar,
    M: Manifold<T>,
{
    type Cache = CG2Cache<T, M>;

    fn name(&self) -> &str {
        "CG2"
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
        CG2Cache {
            fsal_first: zero.allocate_like(),
            k1: zero.allocate_like(),
            k2: zero.allocate_like(),
            k2_transported: zero.allocate_like(),
            scaled: zero,
            u2: prototype.allocate_like(),
            next: prototype.allocate_like(),
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
        check_prototype::<T, _>(u, &cache.next)?;
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
        check_prototype::<T, _>(u, &cache.next)?;
        let manifold = &self.manifold;
        let t2 = t + coefficient::<T>(C[1]) * dt;

        field.evaluate(&mut cache.k1, u, params, t)?;
        cache.stats.record_evaluation();

        cache
            .scaled
            .assign_scaled(&cache.k1, coefficient::<T>(A[1][0]) * dt);
        manifold.retract(u, &cache.scaled, self.retraction, &mut cache.u2)?;
        cache.stats.record_retraction();

        field.evaluate(&mut cache.k2, &cache.u2, params, t2)?;
        cache.stats.record_evaluation();

        field.transport(
            manifold,
            self.transport,
            &mut cache.k2_transported,
            &cache.u2,
            &cache.k2,
            u,
            params,
            t,
            t2,
        )?;
        cache.stats.record_transport();

        // b1 = 0: only the transported midpoint value moves u
        cache
            .scaled
            .assign_scaled(&cache.k2_transported, coefficient::<T>(B[1]) * dt);
        manifold.retract(u, &cache.scaled, self.retraction, &mut cache.next)?;
        cache.stats.record_retraction();
        u.assign(&cache.next);

        cache.stats.record_step();
        cache.state = CacheState::Stepping;
        Ok(STAGES)
    }
}
