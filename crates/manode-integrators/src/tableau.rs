//! Butcher tableaus of the Crouch–Grossmann methods.
//!
//! Coefficients from Owren, B. and Marthinsen, A. (1999). "Runge-Kutta
//! methods adapted to manifolds and based on rigid frames", BIT 39(1).
//!
//! For a Crouch–Grossmann method the row `A[i]` is not summed: each nonzero
//! entry is one retraction, applied in column order, and the weights `B` are
//! applied the same way to produce the next state.

/// CG2 (explicit midpoint on manifolds).
pub mod cg2 {
    /// Number of stages
    pub const STAGES: usize = 2;

    /// Order of the method
    pub const ORDER: usize = 2;

    /// Nodes c_i: stage i is evaluated at t + c_i*h
    pub const C: [f64; STAGES] = [0.0, 0.5];

    /// Stage coefficients a_ij (j < i)
    pub const A: [[f64; STAGES]; STAGES] = [
        [0.0, 0.0],
        [0.5, 0.0],
    ];

    /// Weights b_i
    pub const B: [f64; STAGES] = [0.0, 1.0];
}

/// CG3, tableau 6.1.
pub mod cg3 {
    /// Number of stages
    pub const STAGES: usize = 3;

    /// Order of the method
    pub const ORDER: usize = 3;

    /// Nodes c_i: stage i is evaluated at t + c_i*h
    pub const C: [f64; STAGES] = [0.0, 3.0 / 4.0, 17.0 / 24.0];

    /// Stage coefficients a_ij (j < i)
    pub const A: [[f64; STAGES]; STAGES] = [
        [0.0, 0.0, 0.0],
        [3.0 / 4.0, 0.0, 0.0],
        [119.0 / 216.0, 17.0 / 108.0, 0.0],
    ];

    /// Weights b_i
    pub const B: [f64; STAGES] = [13.0 / 51.0, -2.0 / 3.0, 24.0 / 17.0];
}
