//! The SCS-CN equivalent precipitation formula.

use crate::error::PeqError;

/// Equivalent precipitation for a cumulated depth `p` (mm) over a zone
/// with curve number `cn` and initial abstraction ratio `lambda`.
///
/// The potential maximum retention is `S = 25400 / CN - 254` (mm). The
/// transform inverts the runoff relation at the start of the event:
///
/// ```text
/// M    = max(0, sqrt(S * (P + ((1 - l) / 2)^2 * S)) - ((1 + l) / 2) * S)
/// Peq0 = M * (1 + l * S / (S + M))
/// ```
///
/// `CN = 100` means an impervious zone, where the depth passes through
/// unchanged. Non-positive depths map to zero.
pub fn peq0(p: f64, cn: f64, lambda: f64) -> Result<f64, PeqError> {
    if !(cn > 0.0 && cn <= 100.0) {
        return Err(PeqError::CnOutOfRange { cn });
    }
    if !(0.0..1.0).contains(&lambda) {
        return Err(PeqError::InvalidLambda { lambda });
    }
    if p <= 0.0 {
        return Ok(0.0);
    }
    if cn == 100.0 {
        return Ok(p);
    }

    let s = 25400.0 / cn - 254.0;
    let m = (s * (p + ((1.0 - lambda) / 2.0).powi(2) * s)).sqrt()
        - (1.0 + lambda) / 2.0 * s;
    let m = m.max(0.0);
    Ok(m * (1.0 + lambda * s / (s + m)))
}

/// Applies [`peq0`] across a row of per-duration depths, passing nodata
/// through untouched.
pub fn transform_row(
    values: &[Option<f64>],
    cn: f64,
    lambda: f64,
) -> Result<Vec<Option<f64>>, PeqError> {
    values
        .iter()
        .map(|v| match v {
            Some(p) => peq0(*p, cn, lambda).map(Some),
            None => Ok(None),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_and_negative_depths_map_to_zero() {
        assert_relative_eq!(peq0(0.0, 70.0, 0.2).unwrap(), 0.0);
        assert_relative_eq!(peq0(-3.5, 70.0, 0.2).unwrap(), 0.0);
    }

    #[test]
    fn impervious_zone_passes_the_depth_through() {
        assert_relative_eq!(peq0(48.6, 100.0, 0.2).unwrap(), 48.6);
    }

    #[test]
    fn reference_case_cn70() {
        // CN 70 gives S = 25400/70 - 254 = 108.857142... mm; for P = 50 mm
        // the transform yields 23.782 mm.
        let got = peq0(50.0, 70.0, 0.2).unwrap();
        assert_relative_eq!(got, 23.782, epsilon = 1e-3);
    }

    #[test]
    fn result_is_bounded_by_the_input_depth() {
        for &cn in &[30.0, 55.0, 70.0, 85.0, 99.0] {
            for &p in &[0.5, 5.0, 20.0, 80.0, 250.0] {
                let peq = peq0(p, cn, 0.2).unwrap();
                assert!(peq >= 0.0);
                assert!(peq <= p + 1e-9, "peq0({p}, {cn}) = {peq} exceeds input");
            }
        }
    }

    #[test]
    fn result_grows_with_depth_and_curve_number() {
        let lo = peq0(20.0, 70.0, 0.2).unwrap();
        let hi = peq0(40.0, 70.0, 0.2).unwrap();
        assert!(lo < hi);

        let permeable = peq0(40.0, 55.0, 0.2).unwrap();
        let sealed = peq0(40.0, 90.0, 0.2).unwrap();
        assert!(permeable < sealed);
    }

    #[test]
    fn small_depth_on_permeable_soil_is_retained() {
        // Below the initial abstraction the event produces no runoff, but
        // the equivalent depth stays non-negative.
        let peq = peq0(0.1, 40.0, 0.2).unwrap();
        assert!(peq >= 0.0);
        assert!(peq < 0.1);
    }

    #[test]
    fn invalid_curve_numbers_are_rejected() {
        assert!(matches!(
            peq0(10.0, 0.0, 0.2),
            Err(PeqError::CnOutOfRange { .. })
        ));
        assert!(matches!(
            peq0(10.0, -5.0, 0.2),
            Err(PeqError::CnOutOfRange { .. })
        ));
        assert!(matches!(
            peq0(10.0, 100.5, 0.2),
            Err(PeqError::CnOutOfRange { .. })
        ));
        assert!(matches!(
            peq0(10.0, f64::NAN, 0.2),
            Err(PeqError::CnOutOfRange { .. })
        ));
    }

    #[test]
    fn invalid_lambda_is_rejected() {
        assert!(matches!(
            peq0(10.0, 70.0, 1.0),
            Err(PeqError::InvalidLambda { .. })
        ));
        assert!(matches!(
            peq0(10.0, 70.0, -0.1),
            Err(PeqError::InvalidLambda { .. })
        ));
    }

    #[test]
    fn rows_preserve_nodata_cells() {
        let row = vec![Some(50.0), None, Some(0.0)];
        let out = transform_row(&row, 70.0, 0.2).unwrap();
        assert!(out[0].unwrap() > 0.0);
        assert_eq!(out[1], None);
        assert_relative_eq!(out[2].unwrap(), 0.0);
    }
}
