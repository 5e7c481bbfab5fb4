//! ManODE Manifolds - Concrete manifold providers for the integrators.
//!
//! This crate provides implementations of the `Manifold` capability for the
//! state spaces most commonly met when integrating ODEs on manifolds.
//!
//! # Available Manifolds
//!
//! - **Euclidean**: R^n, where the integrators reduce to classical Runge–Kutta
//! - **Sphere**: S^{n-1} with exponential and projection retractions
//! - **SpecialOrthogonal**: SO(n) with Lie group retractions and
//!   right-translation transport

pub mod euclidean;
pub mod special_orthogonal;
pub mod sphere;

// Re-export main manifolds for convenience
pub use euclidean::Euclidean;
pub use special_orthogonal::SpecialOrthogonal;
pub use sphere::Sphere;
