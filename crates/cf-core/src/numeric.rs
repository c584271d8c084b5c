use crate::CfError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CfError::NonFinite { what, value: v })
    }
}

/// Clamp into `[lo, hi]`, mapping NaN to `lo`.
pub fn clamp_finite(v: Real, lo: Real, hi: Real) -> Real {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn clamp_finite_handles_nan_and_infinities() {
        assert_eq!(clamp_finite(Real::NAN, 0.1, 1.0), 0.1);
        assert_eq!(clamp_finite(Real::INFINITY, 0.1, 1.0), 1.0);
        assert_eq!(clamp_finite(Real::NEG_INFINITY, 0.1, 1.0), 0.1);
        assert_eq!(clamp_finite(0.5, 0.1, 1.0), 0.5);
    }
}
