//! Retraction and vector transport method selectors.
//!
//! An integrator descriptor picks one retraction and one vector transport at
//! construction time. The manifold implementation then dispatches on the
//! selector inside [`Manifold::retract`](crate::manifold::Manifold::retract)
//! and [`Manifold::vector_transport_to`](crate::manifold::Manifold::vector_transport_to).
//!
//! # Mathematical Background
//!
//! A retraction on a manifold M is a smooth mapping R: TM → M with
//! - R(p, 0) = p (centering condition)
//! - dR(p, 0)[v] = v (local rigidity condition)
//!
//! A vector transport moves a tangent vector from T_p M to T_q M. Multi-stage
//! integrators need it because stage vectors computed at different base
//! points cannot be combined directly.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order of approximation of a retraction with respect to the exponential map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RetractionOrder {
    /// First-order retraction (satisfies the basic requirements)
    First,
    /// Second-order retraction (matches the exponential map to second order)
    Second,
    /// Exact exponential map
    Exact,
}

/// Retraction used to map tangent updates back onto the manifold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RetractionMethod {
    /// Exponential map (geodesic on spheres, group exponential on Lie groups).
    #[default]
    Exponential,
    /// Step in the ambient space, then project back onto the manifold.
    Projection,
    /// Q factor of the QR decomposition of `X + V`.
    QR,
    /// Orthogonal polar factor of `X + V`.
    Polar,
    /// Cayley transform of the skew-symmetric generator.
    Cayley,
}

impl RetractionMethod {
    /// Returns the name of this retraction method.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exponential => "Exponential",
            Self::Projection => "Projection",
            Self::QR => "QR",
            Self::Polar => "Polar",
            Self::Cayley => "Cayley",
        }
    }

    /// Returns the order of approximation of this retraction.
    pub fn order(&self) -> RetractionOrder {
        match self {
            Self::Exponential => RetractionOrder::Exact,
            Self::Projection | Self::QR => RetractionOrder::First,
            Self::Polar | Self::Cayley => RetractionOrder::Second,
        }
    }
}

impl fmt::Display for RetractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Vector transport used to move stage vectors between tangent spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VectorTransportMethod {
    /// Parallel transport along the connecting geodesic.
    #[default]
    Parallel,
    /// Orthogonal projection onto the target tangent space.
    Projection,
    /// Plain copy. Only meaningful where all tangent spaces coincide.
    Identity,
    /// Right translation on a matrix Lie group: `V ↦ V Xᵀ Y` for `V ∈ T_X G`.
    ///
    /// This is the transport of a frozen right-invariant vector field and is
    /// the one Crouch–Grossmann order conditions are stated for.
    RightTranslation,
}

impl VectorTransportMethod {
    /// Returns the name of this vector transport method.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Parallel => "Parallel",
            Self::Projection => "Projection",
            Self::Identity => "Identity",
            Self::RightTranslation => "RightTranslation",
        }
    }
}

impl fmt::Display for VectorTransportMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
