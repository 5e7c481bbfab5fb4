//! Vector fields of ODEs on manifolds.
//!
//! A field maps `(u, p, t)` to a tangent vector at `u`. It is evaluated in
//! place into a caller-supplied buffer so that steps do not allocate.
//!
//! The field also owns the transport hook used by multi-stage integrators.
//! By default it forwards to the manifold's vector transport; fields built
//! from frozen coefficients (Lie group actions) may override it to transport
//! the coefficient instead, which is why the hook receives the parameters and
//! both stage times.

use crate::{
    error::IntegratorResult,
    manifold::Manifold,
    retraction::VectorTransportMethod,
    types::Scalar,
};
use std::cell::Cell;
use std::fmt;

/// Right-hand side of an ODE `u' = f(u, p, t)` on the manifold `M`.
pub trait ManifoldOdeFunction<T, M, P = ()>
where
    T: Scalar,
    M: Manifold<T>,
{
    /// Evaluates the field at `(point, t)` into `out`.
    fn evaluate(
        &self,
        out: &mut M::TangentVector,
        point: &M::Point,
        params: &P,
        t: T,
    ) -> IntegratorResult<()>;

    /// Allocating variant of [`evaluate`](Self::evaluate).
    fn evaluate_alloc(
        &self,
        manifold: &M,
        point: &M::Point,
        params: &P,
        t: T,
    ) -> IntegratorResult<M::TangentVector> {
        let mut out = manifold.zero_vector(point);
        self.evaluate(&mut out, point, params, t)?;
        Ok(out)
    }

    /// Moves `from_vector ∈ T_{from_point} M`, computed at `from_time`, into
    /// the tangent space at `to_point` for use at `to_time`.
    #[allow(clippy::too_many_arguments)]
    fn transport(
        &self,
        manifold: &M,
        method: VectorTransportMethod,
        out: &mut M::TangentVector,
        from_point: &M::Point,
        from_vector: &M::TangentVector,
        to_point: &M::Point,
        _params: &P,
        _to_time: T,
        _from_time: T,
    ) -> IntegratorResult<()> {
        manifold.vector_transport_to(from_point, from_vector, to_point, method, out)?;
        Ok(())
    }
}

/// Field backed by a closure `|out, u, p, t| -> IntegratorResult<()>`.
#[derive(Clone, Copy)]
pub struct FnOdeFunction<F> {
    f: F,
}

impl<F> FnOdeFunction<F> {
    /// Wraps a closure as a field.
    pub const fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for FnOdeFunction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOdeFunction").finish_non_exhaustive()
    }
}

impl<T, M, P, F> ManifoldOdeFunction<T, M, P> for FnOdeFunction<F>
where
    T: Scalar,
    M: Manifold<T>,
    F: Fn(&mut M::TangentVector, &M::Point, &P, T) -> IntegratorResult<()>,
{
    fn evaluate(
        &self,
        out: &mut M::TangentVector,
        point: &M::Point,
        params: &P,
        t: T,
    ) -> IntegratorResult<()> {
        (self.f)(out, point, params, t)
    }
}

/// Field wrapper that counts evaluations.
///
/// Transport calls are forwarded to the inner field and not counted.
#[derive(Debug)]
pub struct CountingOdeFunction<F> {
    /// The underlying field
    pub inner: F,
    evaluations: Cell<usize>,
}

impl<F> CountingOdeFunction<F> {
    /// Creates a new counting wrapper around a field.
    pub const fn new(inner: F) -> Self {
        Self {
            inner,
            evaluations: Cell::new(0),
        }
    }

    /// Number of evaluations since creation or the last reset.
    pub fn evaluations(&self) -> usize {
        self.evaluations.get()
    }

    /// Resets the counter to zero.
    pub fn reset_count(&self) {
        self.evaluations.set(0);
    }
}

impl<T, M, P, F> ManifoldOdeFunction<T, M, P> for CountingOdeFunction<F>
where
    T: Scalar,
    M: Manifold<T>,
    F: ManifoldOdeFunction<T, M, P>,
{
    fn evaluate(
        &self,
        out: &mut M::TangentVector,
        point: &M::Point,
        params: &P,
        t: T,
    ) -> IntegratorResult<()> {
        self.evaluations.set(self.evaluations.get() + 1);
        self.inner.evaluate(out, point, params, t)
    }

    fn transport(
        &self,
        manifold: &M,
        method: VectorTransportMethod,
        out: &mut M::TangentVector,
        from_point: &M::Point,
        from_vector: &M::TangentVector,
        to_point: &M::Point,
        params: &P,
        to_time: T,
        from_time: T,
    ) -> IntegratorResult<()> {
        self.inner.transport(
            manifold,
            method,
            out,
            from_point,
            from_vector,
            to_point,
            params,
            to_time,
            from_time,
        )
    }
}
