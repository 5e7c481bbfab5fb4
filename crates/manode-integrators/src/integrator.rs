//! Shared interface of the fixed-step manifold integrators.
//!
//! Every method is split into an immutable descriptor (manifold, retraction
//! and transport choices) and a mutable cache that owns all scratch buffers of
//! one integration. The descriptor can be shared between threads; the cache is
//! exclusively borrowed by each step.
//!
//! # Lifecycle
//!
//! ```text
//! alloc_cache ──► Uninitialized ──initialize──► Initialized ──step──► Stepping ─┐
//!                                                                       ▲        │
//!                                                                       └─step───┘
//! ```
//!
//! A failing step leaves the cache state unchanged.

use manode_core::{
    buffer::ManifoldBuffer,
    error::{IntegratorResult, ManifoldError},
    field::ManifoldOdeFunction,
    manifold::Manifold,
    retraction::RetractionMethod,
    stats::IntegrationStats,
    types::Scalar,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Lifecycle state of a step cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CacheState {
    /// Allocated, `initialize` not called yet
    #[default]
    Uninitialized,
    /// First-evaluation slot primed
    Initialized,
    /// At least one step completed
    Stepping,
}

impl CacheState {
    /// Returns `true` if the cache may be stepped.
    pub fn is_ready(self) -> bool {
        !matches!(self, CacheState::Uninitialized)
    }
}

/// Common read access to the step caches.
pub trait IntegratorCache: Debug + Send {
    /// Current lifecycle state.
    fn state(&self) -> CacheState;

    /// Counters accumulated since allocation or the last reset.
    fn stats(&self) -> &IntegrationStats;

    /// Returns the cache to [`CacheState::Uninitialized`] and zeroes the
    /// counters. Buffers are kept.
    fn reset(&mut self);
}

/// A fixed-step explicit integrator for `u' = f(u, p, t)` on a manifold.
///
/// # Type Parameters
///
/// - `T`: The scalar type
/// - `M`: The manifold the state lives on
pub trait ManifoldIntegrator<T, M>: Debug + Send + Sync
where
    T: Scalar,
    M: Manifold<T>,
{
    /// Scratch storage of one integration.
    type Cache: IntegratorCache;

    /// Returns the name of the method.
    fn name(&self) -> &str;

    /// Convergence order of the method.
    fn order(&self) -> usize;

    /// Field evaluations consumed by one step.
    fn stages(&self) -> usize;

    /// The manifold the method was built for.
    fn manifold(&self) -> &M;

    /// Allocates a cache whose buffers are shaped like `prototype`.
    ///
    /// This is the only allocation of an integration; steps reuse the
    /// returned buffers.
    fn alloc_cache(&self, prototype: &M::Point) -> Self::Cache;

    /// Primes the first-evaluation slot with `f(u, p, t)`.
    ///
    /// # Returns
    ///
    /// The number of field evaluations consumed (always 1).
    ///
    /// # Errors
    ///
    /// Returns an error if `u` does not match the cache shape or if the field
    /// evaluation fails. The cache stays uninitialized in that case.
    fn initialize<F, P>(
        &self,
        cache: &mut Self::Cache,
        field: &F,
        u: &M::Point,
        params: &P,
        t: T,
    ) -> IntegratorResult<usize>
    where
        F: ManifoldOdeFunction<T, M, P>;

    /// Advances `u` from `t` to `t + dt` in place.
    ///
    /// # Returns
    ///
    /// The number of field evaluations consumed, equal to
    /// [`stages`](Self::stages).
    ///
    /// # Errors
    ///
    /// Returns [`IntegratorError::NotInitialized`](manode_core::IntegratorError::NotInitialized)
    /// if `initialize` was not called on `cache`, and propagates field,
    /// retraction and transport failures unchanged.
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
        F: ManifoldOdeFunction<T, M, P>;
}

/// Retracts `u` along `tangent` and writes the result back into `u`.
///
/// `base` receives a copy of the old state so that the retraction never reads
/// and writes the same buffer.
pub(crate) fn retract_in_place<T, M>(
    manifold: &M,
    method: RetractionMethod,
    base: &mut M::Point,
    tangent: &M::TangentVector,
    u: &mut M::Point,
) -> IntegratorResult<()>
where
    T: Scalar,
    M: Manifold<T>,
{
    base.assign(u);
    manifold.retract(base, tangent, method, u)?;
    Ok(())
}

/// Checks that a state has the shape the cache was allocated for.
pub(crate) fn check_prototype<T, B>(state: &B, prototype: &B) -> IntegratorResult<()>
where
    T: Scalar,
    B: ManifoldBuffer<T>,
{
    if !state.same_shape(prototype) {
        return Err(ManifoldError::invalid_point(
            "state shape differs from the cache prototype",
        )
        .into());
    }
    Ok(())
}

/// Tableau entry converted to the working scalar type.
#[inline]
pub(crate) fn coefficient<T: Scalar>(value: f64) -> T {
    <T as Scalar>::from_f64(value)
}
