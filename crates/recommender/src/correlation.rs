//! Pearson product-moment correlation over paired observations.

/// Pearson correlation coefficient of `(x, y)` pairs.
///
/// Returns `None` when no coefficient can be computed: an empty input, or
/// zero variance in either component (which includes every input with
/// fewer than two pairs). The result is never NaN or infinite.
///
/// Rounding may push the result marginally outside `[-1.0, 1.0]`.
///
/// ```
/// use recommender::correlation::pearson;
///
/// assert_eq!(pearson(&[(1, 1), (2, 2), (3, 3)]), Some(1.0));
/// assert_eq!(pearson(&[(1, 1), (1, 2)]), None);
/// ```
pub fn pearson<T>(pairs: &[(T, T)]) -> Option<f64>
where
    T: Into<f64> + Copy,
{
    let (first_x, first_y): (f64, f64) = match pairs.first() {
        Some(&(x, y)) => (x.into(), y.into()),
        None => return None,
    };
    // Checked exactly: the sums below can leave a non-zero residue for
    // constant fractional input
    if pairs.iter().all(|&(x, _)| Into::<f64>::into(x) == first_x)
        || pairs.iter().all(|&(_, y)| Into::<f64>::into(y) == first_y)
    {
        return None;
    }
    let n = pairs.len() as f64;

    let (sum_x, sum_y, sum_xy, sum_x2, sum_y2) = pairs.iter().fold(
        (0.0, 0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sx2, sy2), &(x, y)| {
            let x: f64 = x.into();
            let y: f64 = y.into();
            (sx + x, sy + y, sxy + x * y, sx2 + x * x, sy2 + y * y)
        },
    );

    let numerator = sum_xy - (sum_x * sum_y) / n;
    let var_x = sum_x2 - (sum_x * sum_x) / n;
    let var_y = sum_y2 - (sum_y * sum_y) / n;

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    let denominator = (var_x * var_y).sqrt();
    let r = numerator / denominator;
    r.is_finite().then_some(r)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swapped(pairs: &[(f64, f64)]) -> Vec<(f64, f64)> {
        pairs.iter().map(|&(x, y)| (y, x)).collect()
    }

    #[test]
    fn test_perfect_positive() {
        assert_eq!(pearson(&[(1, 1), (2, 2), (3, 3)]), Some(1.0));
    }

    #[test]
    fn test_perfect_negative() {
        assert_eq!(pearson(&[(1, 3), (2, 2), (3, 1)]), Some(-1.0));
    }

    #[test]
    fn test_constant_x_is_undefined() {
        assert_eq!(pearson(&[(1, 1), (1, 2)]), None);
        assert_eq!(pearson(&[(4, 1), (4, 5), (4, 3)]), None);
    }

    #[test]
    fn test_constant_y_is_undefined() {
        assert_eq!(pearson(&[(1, 3), (2, 3), (5, 3)]), None);
    }

    #[test]
    fn test_empty_and_single_pair() {
        let empty: [(i32, i32); 0] = [];
        assert_eq!(pearson(&empty), None);
        assert_eq!(pearson(&[(3, 4)]), None);
    }

    #[test]
    fn test_constant_fractional_values() {
        let pairs = vec![(0.1, 1.0), (0.1, 2.0), (0.1, 3.0), (0.1, 4.0), (0.1, 5.0)];
        assert_eq!(pearson(&pairs), None);
    }

    #[test]
    fn test_known_value() {
        // r = 6 / sqrt(60)
        let pairs = [(1, 2), (2, 4), (3, 5), (4, 4), (5, 5)];
        let r = pearson(&pairs).unwrap();
        assert!((r - 0.7745966692414834).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_in_x_and_y() {
        let pairs = [(1.0, 5.0), (4.0, 2.0), (3.0, 3.0), (5.0, 1.0), (2.0, 2.0)];
        assert_eq!(pearson(&pairs), pearson(&swapped(&pairs)));

        let pairs = [(2.0, 1.0), (4.0, 5.0), (1.0, 1.0), (3.0, 4.0)];
        assert_eq!(pearson(&pairs), pearson(&swapped(&pairs)));
    }

    #[test]
    fn test_order_invariant() {
        let a = [(1, 2), (2, 4), (3, 5), (4, 4), (5, 5)];
        let b = [(5, 5), (3, 5), (1, 2), (4, 4), (2, 4)];
        let ra = pearson(&a).unwrap();
        let rb = pearson(&b).unwrap();
        assert!((ra - rb).abs() < 1e-12);
    }

    #[test]
    fn test_result_in_range() {
        let pairs = [(1, 5), (2, 3), (3, 4), (4, 1), (5, 2), (3, 3)];
        let r = pearson(&pairs).unwrap();
        assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&r));
    }
}
