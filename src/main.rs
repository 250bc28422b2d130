//! cpusched: run a process list through every scheduling policy and write
//! timelines, per-policy results and a comparison report.

use std::{num::NonZeroU64, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info};

use cpu_sched_model::{
    Outcome, Policy, ProcessDef, SimConfig, Statistics, config::DEFAULT_CHECKPOINTS, io,
    scheduler::DEFAULT_QUANTUM, sim::workload::bernoulli_processes,
};

/// Simulate CPU scheduling policies over a process list.
#[derive(Parser)]
#[command(name = "cpusched")]
struct Cli {
    /// CSV file with Process_ID,Arrival_Time,CPU_Burst_Time,Priority rows.
    input: Option<PathBuf>,

    /// Generate a random workload spanning this many ticks instead of
    /// reading a file.
    #[arg(long, value_name = "TICKS", conflicts_with = "input")]
    random: Option<u64>,

    /// Seed for --random.
    #[arg(long, env = "CPUSCHED_SEED", default_value_t = 42)]
    seed: u64,

    /// Round robin time quantum.
    #[arg(short, long, default_value_t = DEFAULT_QUANTUM)]
    quantum: NonZeroU64,

    /// Throughput checkpoints.
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_CHECKPOINTS)]
    checkpoints: Vec<u64>,

    /// Policies to run (repeatable). Default: all six.
    #[arg(short, long, value_enum)]
    policy: Vec<Policy>,

    /// Directory for timelines and per-policy results.
    #[arg(long, env = "CPUSCHED_OUTPUT_DIR", default_value = "outputs")]
    output_dir: PathBuf,

    /// Directory for the comparison report.
    #[arg(long, env = "CPUSCHED_REPORT_DIR", default_value = "reports")]
    report_dir: PathBuf,

    /// Also write statistics as JSON next to the report.
    #[arg(long)]
    json: bool,

    /// Print each timeline to stdout.
    #[arg(long)]
    dump_timeline: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let (case, defs) = load(cli)?;
    let config = SimConfig {
        quantum: cli.quantum,
        checkpoints: cli.checkpoints.clone(),
    };
    let policies: Vec<Policy> = if cli.policy.is_empty() {
        Policy::ALL.to_vec()
    } else {
        cli.policy.clone()
    };

    info!(%case, processes = defs.len(), "running {} policies", policies.len());

    let case_dir = cli.output_dir.join(&case);
    let mut all = Vec::with_capacity(policies.len());
    let mut failures = 0;

    for policy in policies {
        let outcome = policy.run(&defs, &config);
        let stats = Statistics::from_outcome(&outcome, &case, &config.checkpoints);

        if cli.dump_timeline {
            println!("== {}", outcome.policy);
            print!("{}", outcome.timeline);
        }

        // A failed write must not stop the remaining policies
        if let Err(e) = save(&case_dir, policy, &outcome, &stats) {
            error!(%policy, "{e:#}");
            failures += 1;
        }
        all.push(stats);
    }

    let report = cli.report_dir.join(format!("{case}_report.txt"));
    if let Err(e) = io::write_report(&report, &case, &all) {
        error!("{e}");
        failures += 1;
    }
    if cli.json {
        let path = cli.report_dir.join(format!("{case}_stats.json"));
        if let Err(e) = io::write_json(&path, &all) {
            error!("{e}");
            failures += 1;
        }
    }

    print_summary(&all);

    if failures > 0 {
        bail!("{failures} output step(s) failed");
    }
    Ok(())
}

fn load(cli: &Cli) -> Result<(String, Vec<ProcessDef>)> {
    if let Some(ticks) = cli.random {
        let defs = bernoulli_processes(ticks, 0.3, 0.3, 2, 6, cli.seed);
        if defs.is_empty() {
            bail!("random workload over {ticks} ticks (seed {}) has no processes", cli.seed);
        }
        return Ok((format!("random_{}", cli.seed), defs));
    }

    let Some(path) = cli.input.as_ref() else {
        bail!("missing input: pass a CSV file or --random <TICKS>");
    };
    let defs = io::read_processes(path)
        .with_context(|| format!("failed to load processes from {}", path.display()))?;
    if defs.is_empty() {
        bail!("{} contains no processes", path.display());
    }

    let case = path
        .file_stem()
        .map_or_else(|| "case".to_owned(), |s| s.to_string_lossy().into_owned());
    Ok((case, defs))
}

fn save(dir: &std::path::Path, policy: Policy, outcome: &Outcome, stats: &Statistics) -> Result<()> {
    let stem = policy.file_stem();
    io::write_timeline(&dir.join(format!("{stem}_timeline.txt")), &outcome.timeline)
        .context("writing timeline")?;
    io::write_results(
        &dir.join(format!("{stem}_results.txt")),
        stats,
        &outcome.processes,
    )
    .context("writing results")?;
    Ok(())
}

fn print_summary(all: &[Statistics]) {
    println!(
        "{:<25} {:<12} {:<12} {:<10}",
        "Algorithm", "Avg Wait", "Avg Turn", "CPU Eff%"
    );
    println!("{}", "-".repeat(60));
    for s in all {
        println!(
            "{:<25} {:<12.2} {:<12.2} {:<10.2}",
            s.algorithm, s.avg_waiting, s.avg_turnaround, s.cpu_efficiency
        );
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
