use std::{fmt::Write as _, fs, path::Path};

use iiot_analysis::{
    report::pipeline::run,
    utils::config::AnalyzeArgs,
};
use pretty_assertions::assert_eq;

const HEADER: &str = "Algorithm,Scenario,TaskCount,NodeCount,TotalCost,Makespan,DeadlineHitRate,\
ExecutionTime,EnergyConsumption,FogUtilization,CloudUtilization";

/// Three algorithms over a fixed scenario plus an optional scalability sweep.
fn results_csv(with_scalability: bool) -> String {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    let algorithms = [("HFCO", 1.0), ("GA", 1.4), ("PSO", 1.2)];
    for (a, (name, factor)) in algorithms.iter().enumerate() {
        for rep in 0..3 {
            let r = rep as f64;
            writeln!(
                csv,
                "{},Urban,50,10,{:.2},{:.2},{:.3},{:.1},{:.1},{:.3},{:.3}",
                name,
                100.0 * factor + r,
                20.0 * factor - r * 0.5,
                0.9 - 0.05 * a as f64 + 0.01 * r,
                300.0 * factor + 7.0 * r,
                40.0 + 3.0 * r,
                0.5 + 0.02 * r,
                0.4 - 0.01 * r,
            )
            .unwrap();
        }
        if with_scalability {
            for (tasks, nodes) in [(200, 20), (50, 5), (100, 10)] {
                writeln!(
                    csv,
                    "{},Scalability,{},{},{:.2},{:.2},0.8,{:.1},50.0,0.6,0.3",
                    name,
                    tasks,
                    nodes,
                    tasks as f64 * factor,
                    tasks as f64 * 0.2,
                    tasks as f64 * 3.0 * factor,
                )
                .unwrap();
            }
        }
    }
    csv
}

fn args(results: &Path, output: &Path) -> AnalyzeArgs {
    AnalyzeArgs {
        results_dir: results.to_path_buf(),
        output_dir: output.to_path_buf(),
    }
}

#[test]
fn empty_results_directory_completes_with_every_report_skipped() {
    let results = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let out_dir = output.path().join("analysis_plots");

    let summary = run(&args(results.path(), &out_dir)).unwrap();

    assert_eq!(summary.tables_loaded, 0);
    assert!(summary.written.is_empty());
    assert!(summary.failed.is_empty());
    assert_eq!(summary.skipped.len(), 7);
    assert!(out_dir.is_dir());
}

#[test]
fn missing_results_directory_is_not_fatal() {
    let scratch = tempfile::tempdir().unwrap();
    let summary = run(&args(&scratch.path().join("nowhere"), &scratch.path().join("out"))).unwrap();

    assert_eq!(summary.tables_loaded, 0);
    assert!(summary.failed.is_empty());
}

#[test]
fn full_run_writes_every_artifact() {
    let results = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(results.path().join("comprehensive_results.csv"), results_csv(true)).unwrap();

    let summary = run(&args(results.path(), output.path())).unwrap();

    assert_eq!(summary.tables_loaded, 1);
    assert!(summary.failed.is_empty(), "failed: {:?}", summary.failed);
    assert!(summary.skipped.is_empty(), "skipped: {:?}", summary.skipped);

    for name in [
        "algorithm_comparison.svg",
        "average_performance.svg",
        "scenario_analysis.svg",
        "scalability_analysis.svg",
        "correlation_matrix.svg",
        "scatter_matrix.svg",
        "performance_heatmaps.svg",
        "statistical_summary.svg",
        "statistical_summary.csv",
        "significance_tests.csv",
    ] {
        let path = output.path().join(name);
        assert!(path.is_file(), "{} not written", name);
        assert!(summary.written.contains(&path));
    }

    let svg = fs::read_to_string(output.path().join("algorithm_comparison.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("IIoT Scheduler Algorithm Performance Comparison"));
}

#[test]
fn summary_csv_has_one_sorted_row_per_algorithm() {
    let results = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(results.path().join("comprehensive_results.csv"), results_csv(false)).unwrap();

    run(&args(results.path(), output.path())).unwrap();

    let text = fs::read_to_string(output.path().join("statistical_summary.csv")).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Algorithm,TotalCost_mean,TotalCost_std,TotalCost_min,TotalCost_max,"));
    assert_eq!(lines[0].split(',').count(), 17);
    let algorithms: Vec<&str> = lines[1..].iter().map(|l| l.split(',').next().unwrap()).collect();
    assert_eq!(algorithms, vec!["GA", "HFCO", "PSO"]);
    // HFCO costs 100, 101, 102
    assert!(lines[2].starts_with("HFCO,101,1,100,102,"));
}

#[test]
fn no_scalability_rows_skips_only_that_report() {
    let results = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(results.path().join("comprehensive_results.csv"), results_csv(false)).unwrap();

    let summary = run(&args(results.path(), output.path())).unwrap();

    assert!(summary.failed.is_empty(), "failed: {:?}", summary.failed);
    assert_eq!(
        summary.skipped,
        vec![("scalability analysis".to_string(), "No scalability data found".to_string())]
    );
    assert!(!output.path().join("scalability_analysis.svg").exists());
    assert!(output.path().join("performance_heatmaps.svg").exists());
}

#[test]
fn unreadable_file_does_not_block_the_others() {
    let results = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(results.path().join("comprehensive_results.csv"), results_csv(false)).unwrap();
    fs::write(results.path().join("broken.csv"), "").unwrap();

    let summary = run(&args(results.path(), output.path())).unwrap();

    assert_eq!(summary.tables_loaded, 1);
    assert_eq!(summary.load_failures, 1);
    assert!(output.path().join("statistical_summary.csv").exists());
}

/// `csv` with the named columns removed.
fn without_columns(csv: &str, dropped: &[&str]) -> String {
    let header: Vec<&str> = HEADER.split(',').collect();
    let keep: Vec<usize> = (0..header.len()).filter(|&i| !dropped.contains(&header[i])).collect();
    csv.lines()
        .map(|line| {
            let fields: Vec<&str> = line.split(',').collect();
            let kept: Vec<&str> = keep.iter().map(|&i| fields[i]).collect();
            format!("{}\n", kept.join(","))
        })
        .collect()
}

#[test]
fn missing_metric_columns_skip_only_the_reports_that_need_them() {
    let results = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let csv = without_columns(&results_csv(false), &["EnergyConsumption", "CloudUtilization"]);
    fs::write(results.path().join("comprehensive_results.csv"), csv).unwrap();

    let summary = run(&args(results.path(), output.path())).unwrap();

    assert!(summary.failed.is_empty(), "failed: {:?}", summary.failed);
    let skipped: Vec<&str> = summary.skipped.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(skipped, vec!["scalability analysis", "correlation analysis"]);
    assert!(summary.skipped[1].1.contains("'EnergyConsumption' missing"));

    for name in ["correlation_matrix.svg", "scatter_matrix.svg", "algorithm_comparison.svg"] {
        assert!(!output.path().join(name).exists(), "{} written", name);
    }
    for name in [
        "average_performance.svg",
        "scenario_analysis.svg",
        "performance_heatmaps.svg",
        "statistical_summary.svg",
        "statistical_summary.csv",
        "significance_tests.csv",
    ] {
        assert!(output.path().join(name).is_file(), "{} not written", name);
    }
}
