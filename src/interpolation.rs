use crate::error::{AnalysisError, Result};
use itertools::{izip, Itertools};
use optional::{none, some, Optioned};

/// Interpolate values given two parallel vectors of data and a target value.
///
/// Assumes that xs is monotonic. Points where either value is missing are skipped, and no
/// extrapolation is done, so a target outside the data gives a missing value.
#[inline]
pub fn linear_interpolate(
    xs: &[Optioned<f64>],
    ys: &[Optioned<f64>],
    target_x: f64,
) -> Optioned<f64> {
    debug_assert_eq!(xs.len(), ys.len());

    enum BracketType {
        Bracket((f64, f64), (f64, f64)),
        EndEqual((f64, f64)),
    }

    let make_bracket = |pnt_0: (f64, f64), pnt_1: (f64, f64)| -> Option<BracketType> {
        let (x0, _) = pnt_0;
        let (x1, _) = pnt_1;

        if (x0 < target_x && x1 > target_x) || (x0 > target_x && x1 < target_x) {
            Some(BracketType::Bracket(pnt_0, pnt_1))
        } else if (x0 - target_x).abs() < std::f64::EPSILON {
            Some(BracketType::EndEqual(pnt_0))
        } else if (x1 - target_x).abs() < std::f64::EPSILON {
            Some(BracketType::EndEqual(pnt_1))
        } else {
            None
        }
    };

    let value_opt = izip!(xs, ys)
        // Skip over points with a missing value, the points on either side are used instead.
        .filter(|(x, y)| x.is_some() && y.is_some())
        .map(|(x, y)| (x.unpack(), y.unpack()))
        .tuple_windows::<(_, _)>()
        .filter_map(|(pnt_0, pnt_1)| make_bracket(pnt_0, pnt_1))
        // Get the first (and only) one that brackets the target value
        .next()
        .map(|val| match val {
            BracketType::Bracket(pnt_0, pnt_1) => {
                let (x0, y0) = pnt_0;
                let (x1, y1) = pnt_1;
                linear_interp(target_x, x0, x1, y0, y1)
            }
            BracketType::EndEqual(pnt) => pnt.1,
        });

    Optioned::from(value_opt)
}

/// Piecewise linear interpolation of the points `(xp, fp)` at every value in `x`.
///
/// `xp` must be sorted in increasing order. Targets below the first or above the last point take
/// the end values, no extrapolation is done. If either neighbor of a target is missing the result
/// is missing.
pub fn interp(x: &[f64], xp: &[f64], fp: &[Optioned<f64>]) -> Result<Vec<Optioned<f64>>> {
    if xp.is_empty() {
        return Err(AnalysisError::NotEnoughData);
    }
    if xp.len() != fp.len() {
        return Err(AnalysisError::InvalidInput(format!(
            "interpolation needs parallel points, got {} x and {} y values",
            xp.len(),
            fp.len()
        )));
    }

    debug_assert!(xp.iter().tuple_windows().all(|(a, b)| a <= b));

    Ok(x.iter().map(|&tgt| interp_one(tgt, xp, fp)).collect())
}

#[inline]
fn interp_one(tgt: f64, xp: &[f64], fp: &[Optioned<f64>]) -> Optioned<f64> {
    let last = xp.len() - 1;

    if tgt <= xp[0] {
        return fp[0];
    }
    if tgt >= xp[last] {
        return fp[last];
    }

    // First point strictly above the target, 1..=last because of the checks above.
    let i = xp.partition_point(|&v| v <= tgt);

    match (fp[i - 1].into_option(), fp[i].into_option()) {
        (Some(y0), Some(y1)) => some(linear_interp(tgt, xp[i - 1], xp[i], y0, y1)),
        _ => none(),
    }
}

#[inline]
pub(crate) fn linear_interp(x_val: f64, x1: f64, x2: f64, y1: f64, y2: f64) -> f64 {
    debug_assert!(x1 != x2);

    let run = x2 - x1;
    let rise = y2 - y1;
    let dx = x_val - x1;

    y1 + dx * (rise / run)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::approx_equal;

    fn opts(vals: &[f64]) -> Vec<Optioned<f64>> {
        vals.iter().map(|&v| some(v)).collect()
    }

    #[test]
    fn test_linear_interp() {
        assert!(approx_equal(linear_interp(1.5, 1.0, 2.0, 10.0, 20.0), 15.0, 1.0e-12));
        assert!(approx_equal(linear_interp(1.0, 2.0, 0.0, 0.0, 4.0), 2.0, 1.0e-12));
    }

    #[test]
    fn test_linear_interpolate() {
        let xs = opts(&[0.0, 10.0, 20.0, 30.0]);
        let mut ys = opts(&[1.0, 2.0, 3.0, 4.0]);

        assert!(approx_equal(linear_interpolate(&xs, &ys, 15.0).unpack(), 2.5, 1.0e-12));
        assert!(approx_equal(linear_interpolate(&xs, &ys, 30.0).unpack(), 4.0, 1.0e-12));
        assert!(linear_interpolate(&xs, &ys, 31.0).is_none());

        // Missing points are stepped over
        ys[1] = none();
        assert!(approx_equal(linear_interpolate(&xs, &ys, 10.0).unpack(), 2.0, 1.0e-12));
    }

    #[test]
    fn test_interp_clamps_at_ends() {
        let xp = [0.0, 1.0, 3.0];
        let fp = opts(&[10.0, 20.0, 40.0]);

        let vals = interp(&[-1.0, 0.0, 0.5, 2.0, 3.0, 7.0], &xp, &fp).unwrap();
        let expected = [10.0, 10.0, 15.0, 30.0, 40.0, 40.0];

        for (v, e) in vals.iter().zip(&expected) {
            assert!(approx_equal(v.unpack(), *e, 1.0e-12), "{:?} != {}", v, e);
        }
    }

    #[test]
    fn test_interp_missing_neighbor() {
        let xp = [0.0, 1.0, 2.0];
        let fp = vec![some(0.0), none(), some(2.0)];

        let vals = interp(&[0.5, 1.5, 2.5], &xp, &fp).unwrap();
        assert!(vals[0].is_none());
        assert!(vals[1].is_none());
        assert!(approx_equal(vals[2].unpack(), 2.0, 1.0e-12));
    }

    #[test]
    fn test_interp_bad_input() {
        assert!(interp(&[1.0], &[], &[]).is_err());
        assert!(interp(&[1.0], &[0.0, 1.0], &opts(&[1.0])).is_err());
    }
}
