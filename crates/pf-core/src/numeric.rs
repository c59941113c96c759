use crate::PfError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PfError::NonFinite { what, value: v })
    }
}

/// Clamp into `[0, 1]`. NaN maps to 0 so a bad command can never start anything.
pub fn clamp_unit(v: Real) -> Real {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Non-finite and negative values become 0.
pub fn non_negative(v: Real) -> Real {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}
