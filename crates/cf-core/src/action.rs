//! Relaxation coefficient pair chosen by the agent each step.

use crate::numeric::{Real, clamp_finite};

/// Lower bound of an admissible relaxation coefficient.
pub const RELAXATION_MIN: Real = 0.1;
/// Upper bound of an admissible relaxation coefficient.
pub const RELAXATION_MAX: Real = 1.0;

/// Velocity and pressure relaxation coefficients.
///
/// Out-of-range components are clamped into `[RELAXATION_MIN, RELAXATION_MAX]`
/// on construction, never rejected. A NaN component clamps to the lower bound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Action {
    u: Real,
    p: Real,
}

impl Action {
    pub fn new(u: Real, p: Real) -> Self {
        Self {
            u: clamp_relaxation(u),
            p: clamp_relaxation(p),
        }
    }

    /// Velocity (`U`) relaxation coefficient.
    pub fn u(&self) -> Real {
        self.u
    }

    /// Pressure (`p`) relaxation coefficient.
    pub fn p(&self) -> Real {
        self.p
    }

    /// Re-apply the admissible range. Idempotent on an already clamped action.
    pub fn clamped(self) -> Self {
        Self::new(self.u, self.p)
    }
}

impl From<[Real; 2]> for Action {
    fn from(v: [Real; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

pub fn clamp_relaxation(v: Real) -> Real {
    clamp_finite(v, RELAXATION_MIN, RELAXATION_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_components() {
        let a = Action::new(-3.0, 7.5);
        assert_eq!(a.u(), RELAXATION_MIN);
        assert_eq!(a.p(), RELAXATION_MAX);
    }

    #[test]
    fn keeps_in_range_components() {
        let a = Action::from([0.7, 0.3]);
        assert_eq!(a.u(), 0.7);
        assert_eq!(a.p(), 0.3);
    }

    #[test]
    fn nan_clamps_to_lower_bound() {
        let a = Action::new(Real::NAN, 0.5);
        assert_eq!(a.u(), RELAXATION_MIN);
    }
}
