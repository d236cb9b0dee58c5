//! Analysis pipeline
//! Load -> clean -> summarize -> charts and comparison, in a fixed order.

use crate::charts::{age_donut, mean_by_sex, ChartError, HeatmapView, HistogramView, StaticChartRenderer};
use crate::config::AnalysisConfig;
use crate::data::{Cleaner, DataLoader};
use crate::stats::{SexComparison, Summary};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub summary: &'a Summary,
    pub comparison: &'a SexComparison,
}

/// Hand a rendered chart to the system viewer. Not fatal when it fails.
fn show(path: &Path, enabled: bool) {
    if !enabled {
        return;
    }
    if let Err(e) = open::that(path) {
        warn!(path = %path.display(), error = %e, "could not open chart viewer");
    }
}

pub fn write_report(path: &Path, report: &Report<'_>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote summary report");
    Ok(())
}

/// Run the whole analysis. Returns the rendered chart paths.
pub fn run(config: &AnalysisConfig) -> Result<Vec<PathBuf>> {
    let raw = DataLoader::new()
        .load_csv(&config.input_path)
        .context("failed to load input data")?;
    let table = Cleaner::clean(&raw).context("failed to clean input data")?;
    let observations = table.observations()?;
    info!(rows = table.height(), "observation table ready");

    let summary = Summary::from_table(&table).context("failed to summarize data")?;
    println!("{summary}");

    let renderer = StaticChartRenderer::new(&config.output_dir)?;
    let mut charts = Vec::with_capacity(4);

    let histogram =
        HistogramView::from_observations(&observations).ok_or(ChartError::EmptyView("histogram"))?;
    let path = renderer.render_histogram(&histogram)?;
    show(&path, config.open_charts);
    charts.push(path);

    let path = renderer.render_bar_chart(&mean_by_sex(&observations))?;
    show(&path, config.open_charts);
    charts.push(path);

    let comparison = SexComparison::from_observations(&observations);
    info!(
        male = comparison.male_count,
        female = comparison.female_count,
        "compared sexes"
    );
    println!("\n{comparison}");

    let donut = age_donut(&observations).ok_or(ChartError::EmptyView("donut chart"))?;
    let path = renderer.render_donut(&donut)?;
    show(&path, config.open_charts);
    charts.push(path);

    let heatmap =
        HeatmapView::year_by_sex(&observations).ok_or(ChartError::EmptyView("heatmap"))?;
    let path = renderer.render_heatmap(&heatmap)?;
    show(&path, config.open_charts);
    charts.push(path);

    if config.write_summary_json {
        let report = Report {
            summary: &summary,
            comparison: &comparison,
        };
        write_report(&config.summary_path(), &report)?;
    }

    Ok(charts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn report_is_written_as_json() {
        let raw = df!(
            "YEAR" => &[2017i64, 2017, 2018, 2018],
            "STUB_LABEL" => &["Male", "Female", "Male", "Female"],
            "AGE" => &["All ages", "All ages", "All ages", "All ages"],
            "ESTIMATE" => &[20.0, 5.0, 22.0, 6.0],
        )
        .unwrap();
        let table = Cleaner::clean(&raw).unwrap();
        let summary = Summary::from_table(&table).unwrap();
        let comparison = SexComparison::from_observations(&table.observations().unwrap());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_report(
            &path,
            &Report {
                summary: &summary,
                comparison: &comparison,
            },
        )
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["summary"]["rows"], 4);
        assert_eq!(value["comparison"]["male_count"], 2);
        assert_eq!(value["summary"]["estimate"]["mean"], 13.25);
    }

    const SAMPLE_CSV: &str = "\
INDICATOR, YEAR ,STUB_LABEL,AGE,ESTIMATE
Suicide,2017,Male,All ages,20.1
Suicide,2017,Female,All ages,5.2
Suicide,2017,Male,15-24 years,14.0
Suicide,2017, Female ,15-24 years,4.1
Suicide,2018,Male,All ages,21.0
Suicide,2018,Female,All ages,5.5
Suicide,2018,Male,15-24 years,15.2
Suicide,2018,Female,15-24 years,4.4
Suicide,2018,Male,25-44 years,26.9
Suicide,2018,Female,25-44 years,7.5
Suicide,bad,Male,All ages,19.0
Suicide,2018,Female,45-64 years,
";

    #[test]
    fn run_writes_every_chart_and_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("rates.csv");
        fs::write(&input, SAMPLE_CSV).unwrap();
        let config = AnalysisConfig {
            input_path: input,
            output_dir: dir.path().join("charts"),
            open_charts: false,
            write_summary_json: true,
        };

        let charts = run(&config).unwrap();
        let names: Vec<String> = charts
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "histogram.png",
                "bar_by_sex.png",
                "donut_age.png",
                "heatmap_year_sex.png"
            ]
        );
        let report = config.summary_path();
        for path in charts.iter().chain(std::iter::once(&report)) {
            assert!(fs::metadata(path).unwrap().len() > 0, "{} is empty", path.display());
        }

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(value["summary"]["rows"], 10);
        assert_eq!(value["comparison"]["female_count"], 5);
    }

    #[test]
    fn missing_input_fails_before_any_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            input_path: dir.path().join("nope.csv"),
            output_dir: dir.path().join("charts"),
            open_charts: false,
            write_summary_json: true,
        };
        let err = run(&config).unwrap_err();
        assert!(err.to_string().contains("failed to load input data"));
        assert!(!config.output_dir.exists());
    }
}
