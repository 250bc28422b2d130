//! File boundary: process definitions in, timelines and reports out.
//!
//! Process lists are CSV with the columns
//! `Process_ID,Arrival_Time,CPU_Burst_Time,Priority`. Malformed rows are
//! rejected here so the engine only ever sees valid definitions.

use std::{
    fmt, fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use csv::{Position, ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::{
    core::{PriorityClass, Ticks, Timeline},
    sim::{ProcessDef, ProcessResult},
    stats::Statistics,
};

/// Rows listed in the per-policy results table.
const SAMPLE_ROWS: usize = 10;

#[derive(Debug)]
pub enum Error {
    Io { path: PathBuf, source: io::Error },
    InvalidInput { line: usize, reason: String },
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::InvalidInput { line, reason } => write!(f, "line {line}: {reason}"),
            Self::Json(e) => write!(f, "json: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(e) => Some(e),
            Self::InvalidInput { .. } => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_owned(),
        source,
    }
}

pub fn read_processes(path: &Path) -> Result<Vec<ProcessDef>> {
    let text = fs::read_to_string(path).map_err(io_err(path))?;
    let defs = parse_processes(&text)?;
    info!(path = %path.display(), processes = defs.len(), "loaded processes");
    Ok(defs)
}

const FIELDS: [&str; 4] = ["process id", "arrival time", "burst time", "priority"];

#[derive(Debug, Deserialize)]
struct Row<'a> {
    id: &'a str,
    arrival: Ticks,
    burst: Ticks,
    #[serde(deserialize_with = "priority_class")]
    priority: PriorityClass,
}

// Unknown classes fall back to normal instead of failing the row
fn priority_class<'de, D>(de: D) -> std::result::Result<PriorityClass, D::Error>
where
    D: Deserializer<'de>,
{
    let s: &str = Deserialize::deserialize(de)?;
    Ok(PriorityClass::from(s))
}

pub fn parse_processes(text: &str) -> Result<Vec<ProcessDef>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut defs = Vec::new();

    for record in reader.records() {
        let mut record = record.map_err(|e| Error::InvalidInput {
            line: line_of(e.position()),
            reason: e.to_string(),
        })?;
        let line = line_of(record.position());

        if record.iter().all(str::is_empty) {
            continue;
        }
        if line == 1
            && record
                .iter()
                .any(|f| f.to_ascii_lowercase().contains("process_id"))
        {
            debug!("skipping header");
            continue;
        }
        if record.len() < FIELDS.len() {
            return Err(Error::InvalidInput {
                line,
                reason: format!("expected 4 fields, found {}", record.len()),
            });
        }
        record.truncate(FIELDS.len());

        defs.push(parse_row(&record).map_err(|reason| Error::InvalidInput { line, reason })?);
    }

    Ok(defs)
}

fn line_of(pos: Option<&Position>) -> usize {
    pos.map_or(0, |p| p.line() as usize)
}

fn parse_row(record: &StringRecord) -> std::result::Result<ProcessDef, String> {
    let row: Row = record.deserialize(None).map_err(|e| match e.kind() {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(i) => {
                let i = i as usize;
                format!("{} {:?}: {}", FIELDS[i], record.get(i).unwrap_or(""), err.kind())
            }
            None => err.kind().to_string(),
        },
        _ => e.to_string(),
    })?;

    if row.id.is_empty() {
        return Err("empty process id".into());
    }
    if row.burst == 0 {
        return Err(format!("process {} has zero burst time", row.id));
    }

    Ok(ProcessDef::new(row.id, row.arrival, row.burst, row.priority))
}

fn create(path: &Path) -> Result<io::BufWriter<fs::File>> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_err(dir))?;
    }
    let file = fs::File::create(path).map_err(io_err(path))?;
    Ok(io::BufWriter::new(file))
}

fn finish(path: &Path, mut out: io::BufWriter<fs::File>) -> Result<()> {
    out.flush().map_err(io_err(path))?;
    info!(path = %path.display(), "saved");
    Ok(())
}

pub fn write_timeline(path: &Path, timeline: &Timeline) -> Result<()> {
    let mut out = create(path)?;
    write!(out, "{timeline}").map_err(io_err(path))?;
    finish(path, out)
}

pub fn write_results(path: &Path, stats: &Statistics, results: &[ProcessResult]) -> Result<()> {
    let mut out = create(path)?;
    render_results(&mut out, stats, results).map_err(io_err(path))?;
    finish(path, out)
}

pub fn write_report(path: &Path, case: &str, all: &[Statistics]) -> Result<()> {
    let mut out = create(path)?;
    render_report(&mut out, case, all).map_err(io_err(path))?;
    finish(path, out)
}

pub fn write_json(path: &Path, all: &[Statistics]) -> Result<()> {
    let mut out = create(path)?;
    serde_json::to_writer_pretty(&mut out, all)?;
    finish(path, out)
}

fn time_or_unset(t: Option<Ticks>) -> String {
    t.map_or_else(|| "-1".to_owned(), |t| t.to_string())
}

pub fn render_results(
    out: &mut impl Write,
    stats: &Statistics,
    results: &[ProcessResult],
) -> io::Result<()> {
    writeln!(out, "=== {} RESULTS ===", stats.algorithm)?;
    writeln!(out, "Case: {}", stats.case)?;
    writeln!(out, "Number of processes: {}", stats.processes)?;
    writeln!(out)?;

    writeln!(out, "a) Waiting Times:")?;
    writeln!(out, "-----------------")?;
    writeln!(out, "Average Waiting Time: {:.2}", stats.avg_waiting)?;
    writeln!(out, "Maximum Waiting Time: {}", stats.max_waiting)?;
    writeln!(out)?;

    writeln!(out, "b) Turnaround Times:")?;
    writeln!(out, "--------------------")?;
    writeln!(out, "Average Turnaround Time: {:.2}", stats.avg_turnaround)?;
    writeln!(out, "Maximum Turnaround Time: {}", stats.max_turnaround)?;
    writeln!(out)?;

    writeln!(out, "c) Throughput:")?;
    writeln!(out, "--------------")?;
    for t in &stats.throughput {
        writeln!(out, "T={}: {} processes completed", t.checkpoint, t.completed)?;
    }
    writeln!(out)?;

    writeln!(out, "d) CPU Efficiency:")?;
    writeln!(out, "------------------")?;
    writeln!(out, "CPU Efficiency: {:.2}%", stats.cpu_efficiency)?;
    writeln!(out)?;

    writeln!(out, "e) Context Switches:")?;
    writeln!(out, "--------------------")?;
    writeln!(out, "Total Context Switches: {}", stats.context_switches)?;
    writeln!(out)?;

    writeln!(out, "Sample Process Details (first {SAMPLE_ROWS}):")?;
    writeln!(out, "===================================")?;
    writeln!(out, "PID\tArrival\tBurst\tPriority\tStart\tFinish\tWaiting\tTurnaround")?;
    writeln!(out, "{}", "-".repeat(80))?;

    let mut sorted: Vec<&ProcessResult> = results.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));
    for r in sorted.iter().take(SAMPLE_ROWS) {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.id,
            r.arrival,
            r.burst,
            r.priority,
            time_or_unset(r.start_time),
            r.completion(),
            r.waiting_time,
            r.turnaround_time
        )?;
    }
    if sorted.len() > SAMPLE_ROWS {
        writeln!(out)?;
        writeln!(out, "... and {} more processes", sorted.len() - SAMPLE_ROWS)?;
    }

    Ok(())
}

pub fn render_report(out: &mut impl Write, case: &str, all: &[Statistics]) -> io::Result<()> {
    writeln!(out, "=== CPU SCHEDULING ALGORITHMS REPORT ===")?;
    writeln!(out, "Case: {case}")?;
    writeln!(out, "{}", "=".repeat(80))?;
    writeln!(out)?;

    let last_checkpoint = all
        .iter()
        .find_map(|s| s.throughput.last())
        .map_or_else(|| "Throughput".to_owned(), |t| format!("Throughput@{}", t.checkpoint));

    writeln!(out, "PERFORMANCE COMPARISON:")?;
    writeln!(out, "{}", "=".repeat(100))?;
    writeln!(
        out,
        "{:<25} {:<12} {:<12} {:<10} {:<15}",
        "Algorithm", "Avg Wait", "Avg Turn", "CPU Eff%", last_checkpoint
    )?;
    writeln!(out, "{}", "-".repeat(100))?;
    for s in all {
        writeln!(
            out,
            "{:<25} {:<12.2} {:<12.2} {:<10.2} {:<15}",
            s.algorithm,
            s.avg_waiting,
            s.avg_turnaround,
            s.cpu_efficiency,
            s.final_throughput()
        )?;
    }

    let best_waiting = all.iter().min_by(|a, b| a.avg_waiting.total_cmp(&b.avg_waiting));
    let best_turnaround = all
        .iter()
        .min_by(|a, b| a.avg_turnaround.total_cmp(&b.avg_turnaround));
    // First of equals, like the waiting/turnaround picks
    let best_efficiency = all.iter().reduce(|best, s| {
        if s.cpu_efficiency > best.cpu_efficiency { s } else { best }
    });

    let (Some(waiting), Some(turnaround), Some(efficiency)) =
        (best_waiting, best_turnaround, best_efficiency)
    else {
        return Ok(());
    };

    writeln!(out)?;
    writeln!(out, "ANALYSIS:")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out, "Best Performers:")?;
    writeln!(
        out,
        "- Best Average Waiting Time: {} ({:.2} time units)",
        waiting.algorithm, waiting.avg_waiting
    )?;
    writeln!(
        out,
        "- Best Average Turnaround Time: {} ({:.2} time units)",
        turnaround.algorithm, turnaround.avg_turnaround
    )?;
    writeln!(
        out,
        "- Highest CPU Efficiency: {} ({:.2}%)",
        efficiency.algorithm, efficiency.cpu_efficiency
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_and_skips_header_and_blanks() {
        let text = "Process_ID,Arrival_Time,CPU_Burst_Time,Priority\n\
                    P001, 0, 1, HIGH\n\
                    \n\
                    P002,2,2,whatever\n";
        let defs = parse_processes(text).unwrap();
        assert_eq!(
            defs,
            [
                ProcessDef::new("P001", 0, 1, PriorityClass::High),
                ProcessDef::new("P002", 2, 2, PriorityClass::Normal),
            ]
        );
    }

    #[test]
    fn rejects_malformed_rows_with_line_number() {
        for (text, line) in [
            ("P1,0,3\n", 1),
            ("P1,0,3,low\nP2,x,3,low\n", 2),
            ("P1,-1,3,low\n", 1),
            ("P1,0,0,low\n", 1),
            ("P1,0,-4,low\n", 1),
            (" ,0,4,low\n", 1),
        ] {
            match parse_processes(text) {
                Err(Error::InvalidInput { line: l, .. }) => assert_eq!(l, line, "{text:?}"),
                other => panic!("{text:?} parsed as {other:?}"),
            }
        }
    }

    #[test]
    fn quoted_fields_follow_csv_rules() {
        let text = "\"P,1\",0,3,high\n\"P\"\"2\"\"\", 1 ,2,\"low\"\n";
        let defs = parse_processes(text).unwrap();
        assert_eq!(
            defs,
            [
                ProcessDef::new("P,1", 0, 3, PriorityClass::High),
                ProcessDef::new("P\"2\"", 1, 2, PriorityClass::Low),
            ]
        );
    }

    #[test]
    fn extra_columns_are_ignored() {
        let defs = parse_processes("P1,0,3,low,comment,more\n").unwrap();
        assert_eq!(defs, [ProcessDef::new("P1", 0, 3, PriorityClass::Low)]);
    }

    #[test]
    fn bad_numbers_name_the_field() {
        let err = parse_processes("P1,0,3,low\nP2,soon,3,low\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 2: arrival time \"soon\": invalid digit found in string"
        );
        let err = parse_processes("P1,0,x,low\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 1: burst time \"x\": invalid digit found in string"
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_processes(Path::new("/nonexistent/case.csv")).unwrap_err();
        assert!(err.to_string().starts_with("/nonexistent/case.csv"));
    }
}
