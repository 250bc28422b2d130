//! Reading process lists and writing timelines and reports to disk.

use std::fs;

use cpu_sched_model::{Policy, PriorityClass, SimConfig, Statistics, io};

mod common;
use common::*;

const CASE: &str = "Process_ID,Arrival_Time,CPU_Burst_Time,Priority
P001,0,5,normal
P002,2,3,high
P003,4,1,low
";

#[test]
fn csv_to_outputs() {
    setup_test();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("case1.csv");
    fs::write(&input, CASE).unwrap();

    let defs = io::read_processes(&input).unwrap();
    assert_eq!(defs.len(), 3);
    assert_eq!(defs[1], def("P002", 2, 3, PriorityClass::High));

    let config = SimConfig::default();
    let outcome = Policy::Fcfs.run(&defs, &config);
    let stats = Statistics::from_outcome(&outcome, "case1", &config.checkpoints);

    let out_dir = dir.path().join("outputs").join("case1");
    let timeline_path = out_dir.join("FCFS_timeline.txt");
    io::write_timeline(&timeline_path, &outcome.timeline).unwrap();
    assert_eq!(
        fs::read_to_string(&timeline_path).unwrap(),
        "[0] - P001 - [5]\n[5] - P002 - [8]\n[8] - P003 - [9]\n"
    );

    let results_path = out_dir.join("FCFS_results.txt");
    io::write_results(&results_path, &stats, &outcome.processes).unwrap();
    let results = fs::read_to_string(&results_path).unwrap();
    assert!(results.starts_with("=== FCFS RESULTS ===\nCase: case1\n"));
    assert!(results.contains("Average Waiting Time: 2.33\n"));
    assert!(results.contains("Maximum Waiting Time: 4\n"));
    assert!(results.contains("T=50: 3 processes completed\n"));
    assert!(results.contains("CPU Efficiency: 100.00%\n"));
    assert!(results.contains("Total Context Switches: 2\n"));
    assert!(results.contains("P003\t4\t1\tlow\t8\t9\t4\t5\n"));
}

#[test]
fn report_compares_all_policies() {
    setup_test();
    let dir = tempfile::tempdir().unwrap();
    let defs = io::parse_processes(CASE).unwrap();
    let config = SimConfig::default();

    let all: Vec<_> = Policy::ALL
        .iter()
        .map(|p| Statistics::from_outcome(&p.run(&defs, &config), "case1", &config.checkpoints))
        .collect();

    let report_path = dir.path().join("reports").join("case1_report.txt");
    io::write_report(&report_path, "case1", &all).unwrap();
    let report = fs::read_to_string(&report_path).unwrap();

    assert!(report.contains("Throughput@200"));
    for stats in &all {
        assert!(report.contains(&stats.algorithm), "{}", stats.algorithm);
    }
    assert!(report.contains("Best Average Waiting Time:"));

    let json_path = dir.path().join("reports").join("case1_stats.json");
    io::write_json(&json_path, &all).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(6));
    assert_eq!(parsed[3]["algorithm"], "Round Robin (Q=4)");
}

#[test]
fn invalid_rows_never_reach_the_engine() {
    let err = io::parse_processes("P1,0,4,high\nP2,soon,4,low\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "line 2: arrival time \"soon\": invalid digit found in string"
    );
}
