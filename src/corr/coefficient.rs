//! Pairwise correlation coefficients over pairwise-complete observations.

use super::CorrMethod;
use statrs::statistics::{Data, OrderStatistics, RankTieBreaker};

/// Correlation between two columns using `method`.
///
/// Only rows where both values are finite take part. Returns NaN when fewer
/// than two such rows remain or either side has zero variance on them. The
/// result is clamped into `[-1, 1]`.
pub fn correlation(x: &[f64], y: &[f64], method: CorrMethod) -> f64 {
    let (xs, ys) = complete_pairs(x, y);
    if xs.len() < 2 {
        return f64::NAN;
    }

    let r = match method {
        CorrMethod::Pearson => pearson(&xs, &ys),
        CorrMethod::Spearman => spearman(&xs, &ys),
        CorrMethod::Kendall => kendall(&xs, &ys),
    };
    r.clamp(-1.0, 1.0)
}

/// Pearson product-moment correlation of two equal-length, finite slices.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() < 2 {
        return f64::NAN;
    }
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        f64::NAN
    } else {
        sxy / (sxx * syy).sqrt()
    }
}

/// Spearman correlation: Pearson over average ranks.
pub fn spearman(x: &[f64], y: &[f64]) -> f64 {
    if x.len() < 2 {
        return f64::NAN;
    }
    let rx = Data::new(x.to_vec()).ranks(RankTieBreaker::Average);
    let ry = Data::new(y.to_vec()).ranks(RankTieBreaker::Average);
    pearson(&rx, &ry)
}

/// Kendall tau-b, corrected for ties in either variable.
pub fn kendall(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n < 2 {
        return f64::NAN;
    }
    let (mut concordant, mut discordant) = (0u64, 0u64);
    let (mut ties_x, mut ties_y) = (0u64, 0u64);

    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i] - x[j];
            let dy = y[i] - y[j];
            if dx == 0.0 {
                ties_x += 1;
            }
            if dy == 0.0 {
                ties_y += 1;
            }
            if dx != 0.0 && dy != 0.0 {
                if (dx > 0.0) == (dy > 0.0) {
                    concordant += 1;
                } else {
                    discordant += 1;
                }
            }
        }
    }

    let n_pairs = (n * (n - 1) / 2) as f64;
    let denom = ((n_pairs - ties_x as f64) * (n_pairs - ties_y as f64)).sqrt();
    if denom == 0.0 {
        f64::NAN
    } else {
        (concordant as f64 - discordant as f64) / denom
    }
}

fn complete_pairs(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pearson_known_value() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 3.0, 2.0, 4.0];
        assert_relative_eq!(correlation(&x, &y, CorrMethod::Pearson), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_perfect_linear() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let up = [2.0, 4.0, 6.0, 8.0, 10.0];
        let down = [10.0, 8.0, 6.0, 4.0, 2.0];

        for method in [CorrMethod::Pearson, CorrMethod::Spearman, CorrMethod::Kendall] {
            assert_relative_eq!(correlation(&x, &up, method), 1.0, epsilon = 1e-12);
            assert_relative_eq!(correlation(&x, &down, method), -1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_spearman_monotone() {
        let x = [0.5, 1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v: &f64| v.powi(3)).collect();
        assert!(correlation(&x, &y, CorrMethod::Pearson) < 1.0);
        assert_relative_eq!(correlation(&x, &y, CorrMethod::Spearman), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_spearman_ties() {
        let x = [1.0, 2.0, 2.0, 3.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        let expected = 4.5 / 22.5_f64.sqrt();
        assert_relative_eq!(spearman(&x, &y), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_kendall_known_value() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [3.0, 1.0, 2.0, 5.0, 4.0];
        assert_relative_eq!(kendall(&x, &y), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_kendall_tau_b_ties() {
        // x ties on one pair; tau-b = (5 - 0) / sqrt((6 - 1) * 6)
        let x = [1.0, 1.0, 2.0, 3.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(kendall(&x, &y), 5.0 / 30.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_variance_is_nan() {
        let x = [2.0, 2.0, 2.0];
        let y = [1.0, 2.0, 3.0];
        for method in [CorrMethod::Pearson, CorrMethod::Spearman, CorrMethod::Kendall] {
            assert!(correlation(&x, &y, method).is_nan());
        }
    }

    #[test]
    fn test_pairwise_complete() {
        let x = [1.0, 2.0, f64::NAN, 4.0, 5.0];
        let y = [2.0, 4.0, 100.0, 8.0, 10.0];
        assert_relative_eq!(correlation(&x, &y, CorrMethod::Pearson), 1.0, epsilon = 1e-12);

        let x = [1.0, f64::NAN, f64::NAN];
        let y = [1.0, 2.0, 3.0];
        assert!(correlation(&x, &y, CorrMethod::Pearson).is_nan());
    }

    #[test]
    fn test_fewer_than_two_values_is_nan() {
        let single = [1.5];
        let coefficients: [fn(&[f64], &[f64]) -> f64; 3] = [pearson, spearman, kendall];
        for f in coefficients {
            assert!(f(&[], &[]).is_nan());
            assert!(f(&single, &single).is_nan());
        }
        for method in [CorrMethod::Pearson, CorrMethod::Spearman, CorrMethod::Kendall] {
            assert!(correlation(&[], &[], method).is_nan());
            assert!(correlation(&single, &single, method).is_nan());
        }
    }
}
