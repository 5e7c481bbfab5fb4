//! Manifold Euler method.
//!
//! The first-order method `u_{n+1} = R_{u_n}(h f(u_n, t_n))`. In a flat space
//! the retraction is addition and this is the classical forward Euler method.

use crate::integrator::{
    check_prototype, CacheState, IntegratorCache, ManifoldIntegrator,
};
use manode_core::{
    buffer::ManifoldBuffer,
    error::{IntegratorError, IntegratorResult},
    field::ManifoldOdeFunction,
    manifold::Manifold,
    retraction::RetractionMethod,
    stats::IntegrationStats,
    types::Scalar,
};
use std::marker::PhantomData;

/// Manifold Euler descriptor.
///
/// # Example
///
/// ```rust,ignore
/// let euler = ManifoldEuler::new(Sphere::new(3)?)
///     .with_retraction(RetractionMethod::Projection);
/// ```
#[derive(Debug, Clone)]
pub struct ManifoldEuler<T, M> {
    manifold: M,
    retraction: RetractionMethod,
    _scalar: PhantomData<fn() -> T>,
}

impl<T, M> ManifoldEuler<T, M>
where
    T: Scalar,
    M: Manifold<T>,
{
    /// Creates the method with the manifold's default retraction.
    pub fn new(manifold: M) -> Self {
        let retraction = manifold.default_retraction();
        Self {
            manifold,
            retraction,
            _scalar: PhantomData,
        }
    }

    /// Sets the retraction.
    pub fn with_retraction(mut self, method: RetractionMethod) -> Self {
        self.retraction = method;
        self
    }

    /// Retraction used by every step.
    pub fn retraction(&self) -> RetractionMethod {
        self.retraction
    }
}

/// Scratch storage of [`ManifoldEuler`].
#[derive(Debug, Clone)]
pub struct ManifoldEulerCache<T, M>
where
    T: Scalar,
    M: Manifold<T>,
{
    fsal_first: M::TangentVector,
    k: M::TangentVector,
    scaled: M::TangentVector,
    next: M::Point,
    state: CacheState,
    stats: IntegrationStats,
}

impl<T, M> ManifoldEulerCache<T, M>
where
    T: Scalar,
    M: Manifold<T>,
{
    /// Field value stored by `initialize`.
    pub fn fsal_first(&self) -> &M::TangentVector {
        &self.fsal_first
    }

    /// Field value of the last step.
    pub fn k(&self) -> &M::TangentVector {
        &self.k
    }
}

impl<T, M> IntegratorCache for ManifoldEulerCache<T, M>
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

impl<T, M> ManifoldIntegrator<T, M> for ManifoldEuler<T, M>
where
    T: Scalar,
    M: Manifold<T>,
{
    type Cache = ManifoldEulerCache<T, M>;

    fn name(&self) -> &str {
        "ManifoldEuler"
    }

    fn order(&self) -> usize {
        1
    }

    fn stages(&self) -> usize {
        1
    }

    fn manifold(&self) -> &M {
        &self.manifold
    }

    fn alloc_cache(&self, prototype: &M::Point) -> Self::Cache {
        let zero = self.manifold.zero_vector(prototype);
        ManifoldEulerCache {
            fsal_first: zero.allocate_like(),
            k: zero.allocate_like(),
            scaled: zero,
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

        field.evaluate(&mut cache.k, u, params, t)?;
        cache.stats.record_evaluation();

        cache.scaled.assign_scaled(&cache.k, dt);
        self.manifold
            .retract(u, &cache.scaled, self.retraction, &mut cache.next)?;
        cache.stats.record_retraction();
        u.assign(&cache.next);

        cache.stats.record_step();
        cache.state = CacheState::Stepping;
        Ok(1)
    }
}
