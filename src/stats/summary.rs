//! Descriptive statistics over integer scores.
//!
//! Sums are accumulated exactly as integers; floating point only appears in
//! the final division and square root, so the result does not depend on
//! the order the values arrive in.

use serde::Serialize;

use crate::shared::{DataError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanStdDev {
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

/// Mean and standard deviation of the known values, or `None` when there
/// are none.
pub fn mean_std_dev(data: impl IntoIterator<Item = Option<i64>>) -> Option<MeanStdDev> {
    let mut n: i128 = 0;
    let mut sum: i128 = 0;
    let mut sum_sq: i128 = 0;
    for x in data.into_iter().flatten() {
        let x = i128::from(x);
        n += 1;
        sum += x;
        sum_sq += x * x;
    }
    if n == 0 {
        return None;
    }

    let mean = sum as f64 / n as f64;
    let variance = (n * sum_sq - sum * sum) as f64 / (n * n) as f64;
    Some(MeanStdDev {
        mean,
        std_dev: variance.sqrt(),
    })
}

/// Pearson correlation coefficient over the pairs where both values are
/// known. `None` for an empty sample or when either variable is constant.
pub fn corr_coeff(data: impl IntoIterator<Item = (Option<i64>, Option<i64>)>) -> Option<f64> {
    let mut n: i128 = 0;
    let (mut sx, mut sx2, mut sy, mut sy2, mut sxy) = (0i128, 0i128, 0i128, 0i128, 0i128);
    for pair in data {
        let (Some(x), Some(y)) = pair else {
            continue;
        };
        let (x, y) = (i128::from(x), i128::from(y));
        n += 1;
        sx += x;
        sx2 += x * x;
        sy += y;
        sy2 += y * y;
        sxy += x * y;
    }
    if n == 0 {
        return None;
    }

    let num = n * sxy - sx * sy;
    let den2 = (n * sx2 - sx * sx) * (n * sy2 - sy * sy);
    if den2 == 0 {
        return None;
    }
    Some(num as f64 / (den2 as f64).sqrt())
}

/// Counts of each value in `0..=max`.
///
/// A value outside that range means the scores and the maxima disagree,
/// and is an error rather than a reason to grow the table.
pub fn histogram(values: impl IntoIterator<Item = i64>, max: i64) -> Result<Vec<u32>> {
    let mut counts = vec![0u32; usize::try_from(max).map_or(0, |m| m + 1)];
    for value in values {
        let slot = usize::try_from(value)
            .ok()
            .and_then(|index| counts.get_mut(index));
        match slot {
            Some(count) => *count += 1,
            None => return Err(DataError::ScoreOutOfRange { value, max }),
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn ignores_missing_values() {
        let stats = mean_std_dev(vec![Some(7), None, Some(5)]).unwrap();
        assert!(approx(stats.mean, 6.0));
        assert!(approx(stats.std_dev, 1.0));
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![None, None])]
    fn no_known_values_has_no_mean(#[case] data: Vec<Option<i64>>) {
        assert_eq!(mean_std_dev(data), None);
    }

    #[test]
    fn constant_data_has_zero_spread() {
        let stats = mean_std_dev(vec![Some(3); 4]).unwrap();
        assert!(approx(stats.mean, 3.0));
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn perfectly_correlated_pairs() {
        let r = corr_coeff(vec![(Some(1), Some(2)), (Some(2), Some(4)), (Some(3), Some(6))]);
        assert!(approx(r.unwrap(), 1.0));

        let r = corr_coeff(vec![(Some(1), Some(6)), (Some(2), Some(4)), (Some(3), Some(2))]);
        assert!(approx(r.unwrap(), -1.0));
    }

    #[rstest]
    #[case(vec![(Some(7), None), (None, Some(3))])]
    #[case(vec![])]
    #[case(vec![(Some(2), Some(1)), (Some(2), Some(5))])]
    #[case(vec![(Some(4), Some(1))])]
    fn undefined_correlation(#[case] data: Vec<(Option<i64>, Option<i64>)>) {
        assert_eq!(corr_coeff(data), None);
    }

    #[test]
    fn histogram_counts_each_score() {
        assert_eq!(
            histogram(vec![0, 7, 7, 3], 7),
            Ok(vec![1, 0, 0, 1, 0, 0, 0, 2])
        );
        assert_eq!(histogram(Vec::new(), -1), Ok(Vec::new()));
    }

    #[rstest]
    #[case(8)]
    #[case(-1)]
    #[case(1_000_000_000_000)]
    fn histogram_rejects_impossible_scores(#[case] value: i64) {
        assert_eq!(
            histogram(vec![3, value], 7),
            Err(DataError::ScoreOutOfRange { value, max: 7 })
        );
    }
}
