//! State and cache after a step that fails halfway.
//!
//! Euler and CG2 build the new state in scratch storage, so any failure
//! leaves `u` as it was. CG3 updates `u` through three successive
//! retractions, and a failure between them leaves the retractions already
//! applied in place. In every case the cache state is left unchanged.

use approx::assert_relative_eq;
use manode_core::{
    error::{IntegratorError, IntegratorResult, ManifoldError},
    field::ManifoldOdeFunction,
    manifold::Manifold,
    retraction::{RetractionMethod, VectorTransportMethod},
};
use manode_integrators::{CacheState, IntegratorCache, ManifoldEuler, ManifoldIntegrator, CG2, CG3};
use manode_manifolds::Sphere;
use nalgebra::DVector;
use pretty_assertions::assert_eq;
use std::cell::Cell;

/// Rotation about e3 with a constant tilt, projected onto `T_u S^2`.
fn tilted_rotation(u: &DVector<f64>, t: f64) -> DVector<f64> {
    let w = DVector::from_vec(vec![-u[1], u[0], 0.2 + 0.1 * t]);
    let inner = u.dot(&w);
    w - u * inner
}

/// Sphere field that fails on a chosen evaluation or transport call.
#[derive(Debug, Default)]
struct FaultyField {
    fail_evaluation: Option<usize>,
    fail_transport: Option<usize>,
    evaluations: Cell<usize>,
    transports: Cell<usize>,
}

impl FaultyField {
    fn failing_evaluation(call: usize) -> Self {
        Self {
            fail_evaluation: Some(call),
            ..Self::default()
        }
    }

    fn failing_transport(call: usize) -> Self {
        Self {
            fail_transport: Some(call),
            ..Self::default()
        }
    }
}

impl ManifoldOdeFunction<f64, Sphere, ()> for FaultyField {
    fn evaluate(
        &self,
        out: &mut DVector<f64>,
        point: &DVector<f64>,
        _params: &(),
        t: f64,
    ) -> IntegratorResult<()> {
        let call = self.evaluations.get() + 1;
        self.evaluations.set(call);
        if self.fail_evaluation == Some(call) {
            return Err(IntegratorError::field_evaluation("field blew up", t));
        }
        out.copy_from(&tilted_rotation(point, t));
        Ok(())
    }

    fn transport(
        &self,
        manifold: &Sphere,
        method: VectorTransportMethod,
        out: &mut DVector<f64>,
        from_point: &DVector<f64>,
        from_vector: &DVector<f64>,
        to_point: &DVector<f64>,
        _params: &(),
        _to_time: f64,
        _from_time: f64,
    ) -> IntegratorResult<()> {
        let call = self.transports.get() + 1;
        self.transports.set(call);
        if self.fail_transport == Some(call) {
            return Err(ManifoldError::numerical_error("transport blew up").into());
        }
        manifold.vector_transport_to(from_point, from_vector, to_point, method, out)?;
        Ok(())
    }
}

fn start() -> DVector<f64> {
    DVector::from_vec(vec![0.6, 0.0, 0.8])
}

/// Takes `good_steps` successful steps, then one failing step.
///
/// Returns the error together with the state and cache state observed
/// before and after the failure.
fn fail_after<A>(
    alg: &A,
    field: &FaultyField,
    good_steps: usize,
) -> (IntegratorError, DVector<f64>, DVector<f64>, CacheState, CacheState)
where
    A: ManifoldIntegrator<f64, Sphere>,
{
    let dt = 0.1;
    let mut u = start();
    let mut cache = alg.alloc_cache(&u);
    alg.initialize(&mut cache, field, &u, &(), 0.0).unwrap();
    for i in 0..good_steps {
        alg.step(&mut cache, field, &mut u, &(), dt * i as f64, dt)
            .unwrap();
    }

    let before = u.clone();
    let state_before = cache.state();
    let steps_before = cache.stats().steps;
    let err = alg
        .step(&mut cache, field, &mut u, &(), dt * good_steps as f64, dt)
        .unwrap_err();
    assert_eq!(cache.stats().steps, steps_before);

    (err, before, u, state_before, cache.state())
}

#[test]
fn test_euler_keeps_state_when_field_fails() {
    let euler: ManifoldEuler<f64, _> = ManifoldEuler::new(Sphere::new(3).unwrap());
    // initialize, first step, then the second step fails
    let field = FaultyField::failing_evaluation(3);

    let (err, before, after, state_before, state_after) = fail_after(&euler, &field, 1);
    assert!(matches!(err, IntegratorError::FieldEvaluation { .. }));
    assert_eq!(after, before);
    assert_eq!(state_before, CacheState::Stepping);
    assert_eq!(state_after, CacheState::Stepping);
}

#[test]
fn test_euler_keeps_state_when_retraction_fails() {
    let euler: ManifoldEuler<f64, _> =
        ManifoldEuler::new(Sphere::new(3).unwrap()).with_retraction(RetractionMethod::QR);
    let field = FaultyField::default();

    let (err, before, after, state_before, state_after) = fail_after(&euler, &field, 0);
    assert!(matches!(
        err,
        IntegratorError::Manifold(ManifoldError::NotImplemented { .. })
    ));
    assert_eq!(after, start());
    assert_eq!(after, before);
    assert_eq!(state_after, state_before);
    assert_eq!(state_after, CacheState::Initialized);
}

#[test]
fn test_cg2_keeps_state_when_midpoint_evaluation_fails() {
    let cg2: CG2<f64, _> = CG2::new(Sphere::new(3).unwrap());
    // the midpoint is already retracted when the second evaluation fails
    let field = FaultyField::failing_evaluation(3);

    let (err, before, after, state_before, state_after) = fail_after(&cg2, &field, 0);
    assert!(matches!(err, IntegratorError::FieldEvaluation { .. }));
    assert_eq!(after, before);
    assert_eq!(state_before, CacheState::Initialized);
    assert_eq!(state_after, CacheState::Initialized);
}

#[test]
fn test_cg2_keeps_state_when_transport_fails() {
    let cg2: CG2<f64, _> = CG2::new(Sphere::new(3).unwrap());
    let field = FaultyField::failing_transport(2);

    let (err, before, after, state_before, state_after) = fail_after(&cg2, &field, 1);
    assert!(matches!(
        err,
        IntegratorError::Manifold(ManifoldError::NumericalError { .. })
    ));
    assert_eq!(after, before);
    assert_eq!(state_before, CacheState::Stepping);
    assert_eq!(state_after, CacheState::Stepping);
}

#[test]
fn test_cg3_final_phase_failure_keeps_first_retraction() {
    let sphere = Sphere::new(3).unwrap();
    let cg3: CG3<f64, _> = CG3::new(sphere.clone());
    // transport 1 belongs to stage 3, transport 2 to the second update
    let field = FaultyField::failing_transport(2);
    let (t, dt) = (0.0, 0.1);

    let u0 = start();
    let mut u = u0.clone();
    let mut cache = cg3.alloc_cache(&u);
    cg3.initialize(&mut cache, &field, &u, &(), t).unwrap();
    let err = cg3
        .step(&mut cache, &field, &mut u, &(), t, dt)
        .unwrap_err();
    assert!(matches!(
        err,
        IntegratorError::Manifold(ManifoldError::NumericalError { .. })
    ));

    // u = R_{u0}(13/51 h X1)
    let scaled = tilted_rotation(&u0, t) * (13.0 / 51.0 * dt);
    let mut expected = u0.clone();
    sphere
        .retract(&u0, &scaled, cg3.retraction(), &mut expected)
        .unwrap();
    assert!((&u - &u0).norm() > 1e-3);
    assert_relative_eq!(u, expected, epsilon = 1e-14);
    assert!(sphere.is_point_on_manifold(&u, 1e-12));

    assert_eq!(cache.state(), CacheState::Initialized);
    assert_eq!(cache.stats().steps, 0);
    assert_eq!(cache.stats().field_evaluations, 4);
    assert_eq!(cache.stats().retractions, 4);
    assert_eq!(cache.stats().transports, 1);
}

#[test]
fn test_step_rejects_state_of_wrong_shape() {
    let cg3: CG3<f64, _> = CG3::new(Sphere::new(3).unwrap());
    let field = FaultyField::default();
    let u = start();
    let mut cache = cg3.alloc_cache(&u);
    cg3.initialize(&mut cache, &field, &u, &(), 0.0).unwrap();

    let mut wrong = DVector::from_vec(vec![0.0, 0.0, 0.6, 0.8]);
    let err = cg3
        .step(&mut cache, &field, &mut wrong, &(), 0.0, 0.1)
        .unwrap_err();
    assert!(matches!(
        err,
        IntegratorError::Manifold(ManifoldError::InvalidPoint { .. })
    ));
    assert_eq!(wrong, DVector::from_vec(vec![0.0, 0.0, 0.6, 0.8]));
    assert_eq!(cache.state(), CacheState::Initialized);
}
