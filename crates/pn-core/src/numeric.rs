use crate::{PnError, PnResult};

pub fn ensure_finite(v: f64, what: &'static str) -> PnResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PnError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero (lengths, diameters, densities).
pub fn ensure_positive(v: f64, what: &'static str) -> PnResult<f64> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(PnError::OutOfRange { what, value: v })
    }
}

/// Finite and not below zero (roughness, fixed losses, loss coefficients).
pub fn ensure_non_negative(v: f64, what: &'static str) -> PnResult<f64> {
    let v = ensure_finite(v, what)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(PnError::OutOfRange { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(f64::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn range_checks() {
        assert!(ensure_positive(1.0, "len").is_ok());
        assert!(matches!(
            ensure_positive(0.0, "len"),
            Err(PnError::OutOfRange { what: "len", .. })
        ));
        assert!(ensure_non_negative(0.0, "rough").is_ok());
        assert!(ensure_non_negative(-0.1, "rough").is_err());
        assert!(ensure_non_negative(f64::INFINITY, "rough").is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn positive_implies_non_negative(v in -1e3f64..1e3) {
                if ensure_positive(v, "v").is_ok() {
                    prop_assert!(ensure_non_negative(v, "v").is_ok());
                }
            }
        }
    }
}
