//! Chart views
//! Aggregations each chart draws from. Pure functions of the observations.

use crate::data::Observation;
use crate::stats::{StatsCalculator, FEMALE, MALE};
use std::collections::BTreeMap;

pub const HISTOGRAM_BINS: usize = 30;
/// Sex categories in the order they are plotted.
pub const SEX_CATEGORIES: [&str; 2] = [FEMALE, MALE];
pub const ALL_AGES: &str = "All ages";
pub const OTHER_LABEL: &str = "Other";
pub const DONUT_TOP_GROUPS: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub left: f64,
    pub right: f64,
    pub count: usize,
}

/// Equal-width bins over ESTIMATE.
#[derive(Debug, Clone)]
pub struct HistogramView {
    pub bins: Vec<HistogramBin>,
    /// First and last bin edge.
    pub min: f64,
    pub max: f64,
}

impl HistogramView {
    /// Returns `None` when there is nothing to bin.
    ///
    /// Bins are half-open except the last, which includes `max`. A flat
    /// range is widened by 0.5 on each side.
    pub fn from_values(values: &[f64], bin_count: usize) -> Option<Self> {
        if values.is_empty() || bin_count == 0 {
            return None;
        }

        let (mut min, mut max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if min == max {
            min -= 0.5;
            max += 0.5;
        }

        let width = (max - min) / bin_count as f64;
        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                left: min + width * i as f64,
                right: if i + 1 == bin_count {
                    max
                } else {
                    min + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for &v in values {
            let idx = (((v - min) / width) as usize).min(bin_count - 1);
            bins[idx].count += 1;
        }

        Some(Self { bins, min, max })
    }

    pub fn from_observations(observations: &[Observation]) -> Option<Self> {
        let values: Vec<f64> = observations.iter().map(|o| o.estimate).collect();
        Self::from_values(&values, HISTOGRAM_BINS)
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMean {
    pub label: String,
    pub mean: f64,
}

/// Mean ESTIMATE per sex, for the sexes present in the data.
pub fn mean_by_sex(observations: &[Observation]) -> Vec<CategoryMean> {
    SEX_CATEGORIES
        .iter()
        .filter_map(|&label| {
            let values: Vec<f64> = observations
                .iter()
                .filter(|o| o.has_label(label))
                .map(|o| o.estimate)
                .collect();
            (!values.is_empty()).then(|| CategoryMean {
                label: label.to_string(),
                mean: StatsCalculator::mean(&values),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonutSlice {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct DonutView {
    pub year: i64,
    pub slices: Vec<DonutSlice>,
}

impl DonutView {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Share of the total in percent.
    pub fn percentage(&self, slice: &DonutSlice) -> f64 {
        slice.value / self.total() * 100.0
    }

    /// Wedge label: the group name, then value and share.
    pub fn label_lines(&self, slice: &DonutSlice) -> (String, String) {
        (
            slice.label.clone(),
            format!("{:.0} ({:.1}%)", slice.value, self.percentage(slice)),
        )
    }
}

pub fn latest_year(observations: &[Observation]) -> Option<i64> {
    observations.iter().map(|o| o.year).max()
}

/// ESTIMATE summed per AGE for one year, leaving out the "All ages" rows.
pub fn totals_by_age(observations: &[Observation], year: i64) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for o in observations.iter().filter(|o| o.year == year) {
        match o.age.as_deref() {
            Some(age) if age != ALL_AGES => *totals.entry(age.to_string()).or_default() += o.estimate,
            _ => {}
        }
    }
    totals
}

/// Age groups of the latest year: the six largest totals plus "Other".
pub fn age_donut(observations: &[Observation]) -> Option<DonutView> {
    let year = latest_year(observations)?;

    let mut groups: Vec<(String, f64)> = totals_by_age(observations, year).into_iter().collect();
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));

    let rest = groups.split_off(groups.len().min(DONUT_TOP_GROUPS));
    let mut slices: Vec<DonutSlice> = groups
        .into_iter()
        .map(|(label, value)| DonutSlice { label, value })
        .collect();
    slices.push(DonutSlice {
        label: OTHER_LABEL.to_string(),
        value: rest.iter().map(|(_, v)| v).sum(),
    });

    Some(DonutView { year, slices })
}

/// Mean ESTIMATE per (YEAR, sex); rows are years ascending.
#[derive(Debug, Clone)]
pub struct HeatmapView {
    pub years: Vec<i64>,
    pub columns: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl HeatmapView {
    pub fn year_by_sex(observations: &[Observation]) -> Option<Self> {
        let mut sums: BTreeMap<(i64, &str), (f64, usize)> = BTreeMap::new();
        for o in observations {
            if let Some(label) = SEX_CATEGORIES.iter().find(|&&l| o.has_label(l)) {
                let entry = sums.entry((o.year, *label)).or_insert((0.0, 0));
                entry.0 += o.estimate;
                entry.1 += 1;
            }
        }
        if sums.is_empty() {
            return None;
        }

        let mut years: Vec<i64> = sums.keys().map(|(year, _)| *year).collect();
        years.dedup();
        let columns: Vec<&str> = SEX_CATEGORIES
            .iter()
            .copied()
            .filter(|label| sums.keys().any(|(_, l)| l == label))
            .collect();

        let cells = years
            .iter()
            .map(|year| {
                columns
                    .iter()
                    .map(|label| {
                        sums.get(&(*year, *label))
                            .map(|(sum, count)| sum / *count as f64)
                    })
                    .collect()
            })
            .collect();

        Some(Self {
            years,
            columns: columns.into_iter().map(str::to_string).collect(),
            cells,
        })
    }

    /// Smallest and largest filled cell.
    pub fn value_range(&self) -> (f64, f64) {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(year: i64, label: &str, age: &str, estimate: f64) -> Observation {
        Observation {
            year,
            stub_label: Some(label.to_string()),
            age: Some(age.to_string()),
            estimate,
        }
    }

    #[test]
    fn histogram_has_thirty_bins_covering_every_value() {
        let values: Vec<f64> = (0..100).map(|i| i as f64 * 0.37).collect();
        let hist = HistogramView::from_values(&values, HISTOGRAM_BINS).unwrap();

        assert_eq!(hist.bins.len(), 30);
        assert_eq!(hist.bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert_eq!(hist.bins[0].left, 0.0);
        assert_eq!(hist.bins[29].right, 99.0 * 0.37);
        // The maximum lands in the closed last bin.
        assert!(hist.bins[29].count >= 1);
    }

    #[test]
    fn histogram_of_constant_values_is_widened() {
        let hist = HistogramView::from_values(&[4.0, 4.0], 30).unwrap();
        assert_eq!((hist.min, hist.max), (3.5, 4.5));
        assert_eq!(hist.bins[15].count, 2);
        assert!(HistogramView::from_values(&[], 30).is_none());
    }

    #[test]
    fn bar_means_are_restricted_to_male_and_female() {
        let rows = vec![
            obs(2018, "Male", "All ages", 20.0),
            obs(2018, "Male", "All ages", 30.0),
            obs(2018, "Female", "All ages", 6.0),
            obs(2018, "Black or African American", "All ages", 99.0),
        ];
        let means = mean_by_sex(&rows);
        assert_eq!(
            means,
            vec![
                CategoryMean { label: "Female".into(), mean: 6.0 },
                CategoryMean { label: "Male".into(), mean: 25.0 },
            ]
        );
    }

    #[test]
    fn donut_keeps_six_groups_and_folds_the_rest_into_other() {
        let ages = [
            "10-14 years",
            "15-24 years",
            "25-34 years",
            "35-44 years",
            "45-64 years",
            "65-74 years",
            "75-84 years",
            "85 years and over",
        ];
        let mut rows: Vec<Observation> = ages
            .iter()
            .enumerate()
            .map(|(i, age)| obs(2018, "Male", age, (i + 1) as f64))
            .collect();
        rows.push(obs(2018, "Female", "All ages", 1000.0));
        rows.push(obs(2017, "Male", "10-14 years", 500.0));

        let donut = age_donut(&rows).unwrap();
        assert_eq!(donut.year, 2018);
        assert_eq!(donut.slices.len(), 7);
        assert_eq!(donut.slices[0].label, "85 years and over");
        assert_eq!(donut.slices[6], DonutSlice { label: "Other".into(), value: 3.0 });

        let all: f64 = totals_by_age(&rows, 2018).values().sum();
        assert_eq!(donut.total(), all);
        assert_eq!(all, 36.0);

        let (name, detail) = donut.label_lines(&donut.slices[0]);
        assert_eq!(name, "85 years and over");
        assert_eq!(detail, "8 (22.2%)");
    }

    #[test]
    fn donut_with_few_groups_has_empty_other() {
        let rows = vec![
            obs(2018, "Male", "15-24 years", 4.0),
            obs(2018, "Female", "15-24 years", 2.0),
            obs(2018, "Male", "25-34 years", 1.0),
        ];
        let donut = age_donut(&rows).unwrap();
        assert_eq!(donut.slices.len(), 3);
        assert_eq!(donut.slices[0], DonutSlice { label: "15-24 years".into(), value: 6.0 });
        assert_eq!(donut.slices[2].value, 0.0);
        assert!(age_donut(&[]).is_none());
    }

    #[test]
    fn heatmap_cells_are_year_sex_means() {
        let rows = vec![
            obs(2001, "Male", "15-24 years", 10.0),
            obs(2001, "Male", "25-34 years", 20.0),
            obs(2000, "Female", "All ages", 4.0),
            obs(2001, "Female", "All ages", 5.0),
            obs(2001, "White", "All ages", 50.0),
        ];
        let heat = HeatmapView::year_by_sex(&rows).unwrap();
        assert_eq!(heat.years, vec![2000, 2001]);
        assert_eq!(heat.columns, vec!["Female", "Male"]);
        assert_eq!(heat.cells[0], vec![Some(4.0), None]);
        assert_eq!(heat.cells[1], vec![Some(5.0), Some(15.0)]);
        assert_eq!(heat.value_range(), (4.0, 15.0));
    }
}
