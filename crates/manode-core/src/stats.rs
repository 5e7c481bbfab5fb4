//! Cost accounting for one integration run.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Counters accumulated by a step cache over one integration.
///
/// These are used for cost accounting only; no algorithm reads them back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntegrationStats {
    /// Number of field evaluations, including the one done by `initialize`
    pub field_evaluations: usize,
    /// Number of completed steps
    pub steps: usize,
    /// Number of retractions
    pub retractions: usize,
    /// Number of vector transports
    pub transports: usize,
}

impl IntegrationStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one field evaluation.
    pub fn record_evaluation(&mut self) {
        self.field_evaluations += 1;
    }

    /// Records one retraction.
    pub fn record_retraction(&mut self) {
        self.retractions += 1;
    }

    /// Records one vector transport.
    pub fn record_transport(&mut self) {
        self.transports += 1;
    }

    /// Records one completed step.
    pub fn record_step(&mut self) {
        self.steps += 1;
    }

    /// Resets all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl AddAssign for IntegrationStats {
    fn add_assign(&mut self, other: Self) {
        self.field_evaluations += other.field_evaluations;
        self.steps += other.steps;
        self.retractions += other.retractions;
        self.transports += other.transports;
    }
}
