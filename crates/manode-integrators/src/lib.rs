//! ManODE Integrators - Fixed-step explicit integrators for ODEs on manifolds.
//!
//! Each method advances a state `u` on a manifold with the manifold's
//! retraction, and brings stage values computed at intermediate points back to
//! a common base point with a vector transport. In a flat space they reduce to
//! classical explicit Runge–Kutta methods.
//!
//! # Available Integrators
//!
//! - **ManifoldEuler**: order 1, one field evaluation per step
//! - **CG2**: Crouch–Grossmann order 2 (manifold midpoint rule), two evaluations
//! - **CG3**: Crouch–Grossmann order 3, three evaluations
//!
//! # Examples
//!
//! ```rust,ignore
//! use manode_integrators::{CG3, ManifoldIntegrator};
//! use manode_core::{field::FnOdeFunction, retraction::RetractionMethod};
//!
//! let cg3 = CG3::new(manifold).with_retraction(RetractionMethod::Cayley);
//! let mut cache = cg3.alloc_cache(&u);
//! cg3.initialize(&mut cache, &field, &u, &params, t0)?;
//! let evaluations = cg3.step(&mut cache, &field, &mut u, &params, t0, dt)?;
//! assert_eq!(evaluations, 3);
//! ```

pub mod cg2;
pub mod cg3;
pub mod euler;
pub mod integrator;
pub mod solve;
pub mod tableau;

// Re-export main integrators for convenience
pub use cg2::{CG2Cache, CG2};
pub use cg3::{CG3Cache, CG3};
pub use euler::{ManifoldEuler, ManifoldEulerCache};
pub use integrator::{CacheState, IntegratorCache, ManifoldIntegrator};
pub use solve::{
    solve_fixed, FixedStepOptions, FixedStepSolver, IntegrationResult, ManifoldOdeProblem,
};

#[cfg(test)]
mod tests {
    use super::*;
    use manode_core::test_manifolds::TestEuclideanManifold;

    #[test]
    fn test_exports() {
        let euler: ManifoldEuler<f64, _> = ManifoldEuler::new(TestEuclideanManifold::new(2));
        let cg2: CG2<f64, _> = CG2::new(TestEuclideanManifold::new(2));
        let cg3: CG3<f64, _> = CG3::new(TestEuclideanManifold::new(2));

        assert_eq!((euler.name(), euler.order(), euler.stages()), ("ManifoldEuler", 1, 1));
        assert_eq!((cg2.name(), cg2.order(), cg2.stages()), ("CG2", 2, 2));
        assert_eq!((cg3.name(), cg3.order(), cg3.stages()), ("CG3", 3, 3));
        assert_eq!(FixedStepOptions::default(), FixedStepOptions::new());
    }
}
