//! Statistics Calculator Module
//! Handles statistical computations including descriptive stats and t-tests.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Descriptive statistics for a numeric column, pandas `describe()` style.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl Default for DescriptiveStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Outcome of Welch's unequal-variance t-test.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WelchTest {
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: f64,
}

impl WelchTest {
    fn undefined() -> Self {
        Self {
            statistic: f64::NAN,
            p_value: f64::NAN,
            degrees_of_freedom: f64::NAN,
        }
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> DescriptiveStats {
        let n = values.len();
        if n == 0 {
            return DescriptiveStats::default();
        }

        let sorted = Self::sorted(values);
        let mean = Self::mean(values);
        let std = Self::sample_variance(values, mean).sqrt();

        DescriptiveStats {
            count: n,
            mean,
            std,
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return f64::NAN;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    pub fn median(values: &[f64]) -> f64 {
        Self::percentile(&Self::sorted(values), 50.0)
    }

    /// Unbiased (n - 1) variance; NaN below two values.
    fn sample_variance(values: &[f64], mean: f64) -> f64 {
        let n = values.len();
        if n < 2 {
            return f64::NAN;
        }
        values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        sorted
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Every value tied for the highest frequency, ascending.
    pub fn modes(values: &[f64]) -> Vec<f64> {
        let sorted = Self::sorted(values);

        let mut runs: Vec<(f64, usize)> = Vec::new();
        for v in sorted {
            match runs.last_mut() {
                Some((value, count)) if *value == v => *count += 1,
                _ => runs.push((v, 1)),
            }
        }

        let best = runs.iter().map(|(_, count)| *count).max().unwrap_or(0);
        runs.into_iter()
            .filter(|(_, count)| *count == best)
            .map(|(value, _)| value)
            .collect()
    }

    /// Perform Welch's t-test (independent samples, unequal variance).
    ///
    /// The statistic is positive when `group` has the larger mean.
    pub fn welch_ttest(group_values: &[f64], control_values: &[f64]) -> WelchTest {
        let n1 = group_values.len() as f64;
        let n2 = control_values.len() as f64;

        if n1 < 2.0 || n2 < 2.0 {
            return WelchTest::undefined();
        }

        let mean1 = Self::mean(group_values);
        let mean2 = Self::mean(control_values);
        let var1 = Self::sample_variance(group_values, mean1);
        let var2 = Self::sample_variance(control_values, mean2);

        let se = (var1 / n1 + var2 / n2).sqrt();
        if se == 0.0 {
            return WelchTest::undefined();
        }

        let t = (mean1 - mean2) / se;

        // Welch-Satterthwaite degrees of freedom
        let df_num = (var1 / n1 + var2 / n2).powi(2);
        let df_denom = (var1 / n1).powi(2) / (n1 - 1.0) + (var2 / n2).powi(2) / (n2 - 1.0);
        let df = df_num / df_denom;

        // Two-tailed p-value using t-distribution
        match StudentsT::new(0.0, 1.0, df) {
            Ok(dist) => WelchTest {
                statistic: t,
                p_value: (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0),
                degrees_of_freedom: df,
            },
            Err(_) => WelchTest::undefined(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_matches_pandas_quartiles() {
        let stats = StatsCalculator::compute_descriptive_stats(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert!((stats.p25 - 1.75).abs() < 1e-12);
        assert!((stats.median - 2.5).abs() < 1e-12);
        assert!((stats.p75 - 3.25).abs() < 1e-12);
        assert!((stats.std - 1.290_994_448_735_805_6).abs() < 1e-12);
    }

    #[test]
    fn single_value_has_undefined_std() {
        let stats = StatsCalculator::compute_descriptive_stats(&[7.0]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.median, 7.0);
        assert!(stats.std.is_nan());
    }

    #[test]
    fn single_most_frequent_value_is_the_mode() {
        let modes = StatsCalculator::modes(&[3.2, 1.0, 3.2, 5.5, 3.2, 1.0]);
        assert_eq!(modes, vec![3.2]);
    }

    #[test]
    fn tied_modes_are_all_reported_in_order() {
        let modes = StatsCalculator::modes(&[9.0, 2.0, 9.0, 2.0, 4.0]);
        assert_eq!(modes, vec![2.0, 9.0]);
        assert!(StatsCalculator::modes(&[]).is_empty());
    }

    #[test]
    fn welch_matches_reference_values() {
        // scipy.stats.ttest_ind(a, b, equal_var=False)
        let a = [27.5, 21.0, 19.0, 23.6, 17.0, 17.9, 16.9, 20.1, 21.9, 22.6, 23.1, 19.6, 19.0, 21.7, 21.4];
        let b = [27.1, 22.0, 20.8, 23.4, 23.4, 23.5, 25.8, 22.0, 24.8, 20.2, 21.9, 22.1, 22.9, 20.5, 24.4];
        let test = StatsCalculator::welch_ttest(&a, &b);
        assert!((test.statistic - (-2.46)).abs() < 0.01);
        assert!((test.p_value - 0.021).abs() < 0.002);
        assert!(test.degrees_of_freedom > 24.0 && test.degrees_of_freedom < 26.0);
    }

    #[test]
    fn welch_sign_follows_mean_difference() {
        let high = [10.0, 12.0, 11.0, 13.0];
        let low = [2.0, 3.0, 1.0, 2.5];
        let test = StatsCalculator::welch_ttest(&high, &low);
        assert!(test.statistic > 0.0);
        assert!((0.0..=1.0).contains(&test.p_value));

        let reversed = StatsCalculator::welch_ttest(&low, &high);
        assert!(reversed.statistic < 0.0);
        assert!((reversed.p_value - test.p_value).abs() < 1e-12);
    }

    #[test]
    fn welch_keeps_tiny_p_values_positive() {
        let low: Vec<f64> = (0..10).map(f64::from).collect();
        let high: Vec<f64> = low.iter().map(|v| v + 50.0).collect();
        let test = StatsCalculator::welch_ttest(&high, &low);
        assert!((test.statistic - 36.927).abs() < 0.01);
        assert!(test.p_value > 0.0);
        assert!(test.p_value < 1e-15);
    }

    #[test]
    fn welch_needs_two_values_per_group() {
        let test = StatsCalculator::welch_ttest(&[1.0], &[2.0, 3.0]);
        assert!(test.statistic.is_nan());
        assert!(test.p_value.is_nan());
    }
}
