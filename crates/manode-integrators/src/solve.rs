//! Fixed-step integration over a time span.
//!
//! A thin driver around the step algorithms: one cache, one `initialize`, then
//! constant steps until the end of the span. The last step is shortened so
//! that the final time is hit exactly. There is no error estimation and no
//! step size adaptation.

use crate::integrator::{IntegratorCache, ManifoldIntegrator};
use manode_core::{
    error::{IntegratorError, IntegratorResult},
    field::ManifoldOdeFunction,
    manifold::Manifold,
    stats::IntegrationStats,
    types::Scalar,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Initial value problem `u' = f(u, p, t)`, `u(t0) = u0` on a manifold.
#[derive(Debug, Clone)]
pub struct ManifoldOdeProblem<T, U, F, P = ()> {
    /// The vector field
    pub field: F,
    /// Initial state
    pub u0: U,
    /// Time span `(t0, tf)`
    pub tspan: (T, T),
    /// Parameters passed to every field evaluation
    pub params: P,
}

impl<T, U, F, P> ManifoldOdeProblem<T, U, F, P>
where
    T: Scalar,
{
    /// Creates a new problem.
    pub fn new(field: F, u0: U, tspan: (T, T), params: P) -> Self {
        Self {
            field,
            u0,
            tspan,
            params,
        }
    }
}

/// Options of the fixed-step runner.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixedStepOptions {
    /// Record the state after every step (otherwise only the initial and
    /// final states are kept)
    pub save_everystep: bool,

    /// Upper bound on the number of steps a run may take
    pub max_steps: usize,
}

impl Default for FixedStepOptions {
    fn default() -> Self {
        Self {
            save_everystep: true,
            max_steps: 1_000_000,
        }
    }
}

impl FixedStepOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether every step is recorded.
    pub fn with_save_everystep(mut self, save: bool) -> Self {
        self.save_everystep = save;
        self
    }

    /// Sets the step limit.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

/// Trajectory produced by [`FixedStepSolver::solve`].
#[derive(Debug, Clone)]
pub struct IntegrationResult<T, U> {
    /// Saved times, starting with `t0` and ending with `tf`
    pub t: Vec<T>,
    /// States at the saved times
    pub u: Vec<U>,
    /// Counters of the run, including the evaluation done by `initialize`
    pub stats: IntegrationStats,
    /// Wall-clock time of the run
    pub duration: Duration,
}

impl<T, U> IntegrationResult<T, U> {
    /// Final state of the run.
    pub fn final_state(&self) -> Option<&U> {
        self.u.last()
    }

    /// Final time of the run.
    pub fn final_time(&self) -> Option<&T> {
        self.t.last()
    }
}

/// Constant step size driver.
#[derive(Debug, Clone, Default)]
pub struct FixedStepSolver {
    options: FixedStepOptions,
}

impl FixedStepSolver {
    /// Creates a solver with the given options.
    pub fn new(options: FixedStepOptions) -> Self {
        Self { options }
    }

    /// Returns the solver options.
    pub fn options(&self) -> &FixedStepOptions {
        &self.options
    }

    /// Integrates `problem` with step `dt` using `alg`.
    ///
    /// # Errors
    ///
    /// Returns [`IntegratorError::InvalidConfiguration`] for a non-positive or
    /// non-finite step, an inverted or non-finite time span, or a span that
    /// needs more than `max_steps` steps. Failures of `initialize` and `step`
    /// are propagated unchanged.
    pub fn solve<T, M, A, F, P>(
        &self,
        alg: &A,
        problem: &ManifoldOdeProblem<T, M::Point, F, P>,
        dt: T,
    ) -> IntegratorResult<IntegrationResult<T, M::Point>>
    where
        T: Scalar,
        M: Manifold<T>,
        A: ManifoldIntegrator<T, M>,
        F: ManifoldOdeFunction<T, M, P>,
    {
        let start = Instant::now();
        let (t0, tf) = problem.tspan;
        let total_steps = self.validate(t0, tf, dt)?;

        let mut u = problem.u0.clone();
        let mut cache = alg.alloc_cache(&u);
        alg.initialize(&mut cache, &problem.field, &u, &problem.params, t0)?;

        let capacity = if self.options.save_everystep {
            total_steps + 1
        } else {
            2
        };
        let mut ts = Vec::with_capacity(capacity);
        let mut us = Vec::with_capacity(capacity);
        ts.push(t0);
        us.push(u.clone());

        let mut t = t0;
        for n in 1..=total_steps {
            let (h, t_next) = if n == total_steps {
                (tf - t, tf)
            } else {
                (dt, t0 + <T as Scalar>::from_usize(n) * dt)
            };
            alg.step(&mut cache, &problem.field, &mut u, &problem.params, t, h)?;
            t = t_next;

            if self.options.save_everystep {
                ts.push(t);
                us.push(u.clone());
            }
        }

        if !self.options.save_everystep && total_steps > 0 {
            ts.push(t);
            us.push(u);
        }

        Ok(IntegrationResult {
            t: ts,
            u: us,
            stats: *cache.stats(),
            duration: start.elapsed(),
        })
    }

    /// Number of steps needed to cover `[t0, tf]`.
    ///
    /// A remainder shorter than a relative tolerance of `dt` is absorbed into
    /// the last step instead of producing a tiny extra step. An empty span
    /// takes no step, any other span at least one.
    fn validate<T: Scalar>(&self, t0: T, tf: T, dt: T) -> IntegratorResult<usize> {
        if !<T as num_traits::Float>::is_finite(dt) || dt <= T::zero() {
            return Err(IntegratorError::invalid_configuration(
                "step size must be positive and finite",
                "dt",
                dt.to_string(),
            ));
        }
        if !<T as num_traits::Float>::is_finite(t0) || !<T as num_traits::Float>::is_finite(tf) {
            return Err(IntegratorError::invalid_configuration(
                "time span must be finite",
                "tspan",
                format!("({t0}, {tf})"),
            ));
        }
        if tf < t0 {
            return Err(IntegratorError::invalid_configuration(
                "time span must satisfy t0 <= tf",
                "tspan",
                format!("({t0}, {tf})"),
            ));
        }

        if tf <= t0 {
            return Ok(0);
        }

        // a non-empty span takes at least one step
        let ratio = (tf - t0) / dt;
        let steps = <T as num_traits::Float>::ceil(ratio - T::DEFAULT_TOLERANCE);
        let steps = <T as Scalar>::to_f64(<T as num_traits::Float>::max(steps, T::one()));
        if steps > self.options.max_steps as f64 {
            return Err(IntegratorError::invalid_configuration(
                format!("span needs {steps} steps, more than max_steps"),
                "dt",
                dt.to_string(),
            ));
        }
        Ok(steps as usize)
    }
}

/// Integrates `problem` with step `dt` and default options.
///
/// Equivalent to `FixedStepSolver::default().solve(alg, problem, dt)`.
pub fn solve_fixed<T, M, A, F, P>(
    alg: &A,
    problem: &ManifoldOdeProblem<T, M::Point, F, P>,
    dt: T,
) -> IntegratorResult<IntegrationResult<T, M::Point>>
where
    T: Scalar,
    M: Manifold<T>,
    A: ManifoldIntegrator<T, M>,
    F: ManifoldOdeFunction<T, M, P>,
{
    FixedStepSolver::default().solve(alg, problem, dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::euler::ManifoldEuler;
    use approx::assert_relative_eq;
    use manode_core::{field::FnOdeFunction, test_manifolds::TestEuclideanManifold, types::DVector};

    type Field = fn(&mut DVector<f64>, &DVector<f64>, &f64, f64) -> IntegratorResult<()>;

    fn constant_velocity(
        out: &mut DVector<f64>,
        _u: &DVector<f64>,
        speed: &f64,
        _t: f64,
    ) -> IntegratorResult<()> {
        out.fill(*speed);
        Ok(())
    }

    fn problem(
        tspan: (f64, f64),
    ) -> ManifoldOdeProblem<f64, DVector<f64>, FnOdeFunction<Field>, f64> {
        ManifoldOdeProblem::new(
            FnOdeFunction::new(constant_velocity as Field),
            DVector::zeros(2),
            tspan,
            2.0,
        )
    }

    #[test]
    fn test_last_step_lands_on_final_time() {
        let euler: ManifoldEuler<f64, _> = ManifoldEuler::new(TestEuclideanManifold::new(2));
        let solution = solve_fixed(&euler, &problem((0.0, 1.0)), 0.3).unwrap();

        assert_eq!(solution.t.len(), 5);
        assert_eq!(*solution.final_time().unwrap(), 1.0);
        assert_relative_eq!(solution.t[1], 0.3, epsilon = 1e-15);
        assert_relative_eq!(solution.t[3], 0.9, epsilon = 1e-15);
        let last = solution.final_state().unwrap();
        assert_relative_eq!(last[0], 2.0, epsilon = 1e-12);
        assert_eq!(solution.stats.steps, 4);
        assert_eq!(solution.stats.field_evaluations, 5);
    }

    #[test]
    fn test_exact_multiple_has_no_tiny_step() {
        let euler: ManifoldEuler<f64, _> = ManifoldEuler::new(TestEuclideanManifold::new(2));
        let solution = solve_fixed(&euler, &problem((0.0, 1.0)), 0.1).unwrap();
        assert_eq!(solution.stats.steps, 10);
        assert_eq!(*solution.final_time().unwrap(), 1.0);
    }

    #[test]
    fn test_save_only_endpoints() {
        let euler: ManifoldEuler<f64, _> = ManifoldEuler::new(TestEuclideanManifold::new(2));
        let solver = FixedStepSolver::new(FixedStepOptions::new().with_save_everystep(false));
        let solution = solver.solve(&euler, &problem((1.0, 2.0)), 0.25).unwrap();

        assert_eq!(solution.t, vec![1.0, 2.0]);
        assert_eq!(solution.u.len(), 2);
        assert_relative_eq!(solution.u[1][1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_span_returns_initial_state() {
        let euler: ManifoldEuler<f64, _> = ManifoldEuler::new(TestEuclideanManifold::new(2));
        let solution = solve_fixed(&euler, &problem((0.5, 0.5)), 0.1).unwrap();
        assert_eq!(solution.t, vec![0.5]);
        assert_eq!(solution.stats.steps, 0);
    }

    #[test]
    fn test_span_shorter_than_tolerance_takes_one_step() {
        let euler: ManifoldEuler<f64, _> = ManifoldEuler::new(TestEuclideanManifold::new(2));
        let solution = solve_fixed(&euler, &problem((0.0, 1e-9)), 0.1).unwrap();

        assert_eq!(solution.t, vec![0.0, 1e-9]);
        assert_eq!(solution.stats.steps, 1);
        let last = solution.final_state().unwrap();
        assert_relative_eq!(last[0], 2e-9, epsilon = 1e-20);

        let solver = FixedStepSolver::new(FixedStepOptions::new().with_save_everystep(false));
        let solution = solver.solve(&euler, &problem((0.0, 1e-9)), 0.1).unwrap();
        assert_eq!(*solution.final_time().unwrap(), 1e-9);
    }

    #[test]
    fn test_invalid_configuration() {
        let euler: ManifoldEuler<f64, _> = ManifoldEuler::new(TestEuclideanManifold::new(2));

        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let err = solve_fixed(&euler, &problem((0.0, 1.0)), dt).unwrap_err();
            assert!(matches!(err, IntegratorError::InvalidConfiguration { .. }));
        }

        let err = solve_fixed(&euler, &problem((1.0, 0.0)), 0.1).unwrap_err();
        assert!(matches!(err, IntegratorError::InvalidConfiguration { .. }));

        let solver = FixedStepSolver::new(FixedStepOptions::new().with_max_steps(5));
        let err = solver.solve(&euler, &problem((0.0, 1.0)), 0.1).unwrap_err();
        assert!(matches!(err, IntegratorError::InvalidConfiguration { .. }));
    }
}
