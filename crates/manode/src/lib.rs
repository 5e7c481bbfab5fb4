//! ManODE - Explicit integrators for ordinary differential equations on
//! manifolds.
//!
//! This crate re-exports the workspace crates:
//!
//! - [`manode_core`]: the `Manifold` capability, vector fields, errors and
//!   counters
//! - [`manode_manifolds`]: Euclidean space, spheres and rotation groups
//! - [`manode_integrators`]: manifold Euler, CG2, CG3 and the fixed-step runner
//!
//! # Example
//!
//! ```rust
//! use manode::prelude::*;
//!
//! // Rotation about the z axis on the unit sphere
//! let field = FnOdeFunction::new(
//!     |out: &mut DVector<f64>, u: &DVector<f64>, _p: &(), _t: f64| -> IntegratorResult<()> {
//!         out[0] = -u[1];
//!         out[1] = u[0];
//!         out[2] = 0.0;
//!         Ok(())
//!     },
//! );
//! let u0 = DVector::from_vec(vec![1.0, 0.0, 0.0]);
//! let problem = ManifoldOdeProblem::new(field, u0, (0.0, 1.0), ());
//!
//! let cg3: CG3<f64, _> = CG3::new(Sphere::new(3).unwrap());
//! let solution = solve_fixed(&cg3, &problem, 0.01).unwrap();
//! let u = solution.final_state().unwrap();
//! assert!((u[0] - 1.0_f64.cos()).abs() < 1e-6);
//! ```

pub use manode_core;
pub use manode_integrators;
pub use manode_manifolds;
pub use nalgebra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use manode_core::prelude::*;
    pub use manode_integrators::{
        solve_fixed, CacheState, FixedStepOptions, FixedStepSolver, IntegrationResult,
        IntegratorCache, ManifoldEuler, ManifoldIntegrator, ManifoldOdeProblem, CG2, CG3,
    };
    pub use manode_manifolds::{Euclidean, SpecialOrthogonal, Sphere};
}
