use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fs::{File, create_dir_all};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use symopt_core::{CompileOptions, ConstraintSystem, Environment, enable_logging};
use symopt_expr::{Bounds, ExpressionLike, KMatrix, KVector, VarType};

const DEFAULT_SIZES: [usize; 3] = [10, 25, 50];

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "symopt benchmark runner and reporting interface"
)]
struct Cli {
    /// Log filter passed to the tracing subscriber (for example, debug)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute benchmark scenarios and save a JSONL artifact
    Run(RunArgs),
    /// Render a saved JSONL artifact
    Report(ReportArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Benchmark scenarios to execute
    #[arg(
        long = "scenario",
        value_enum,
        value_delimiter = ',',
        default_value = "matrix-vector,matrix-matrix,compile"
    )]
    scenarios: Vec<Scenario>,

    /// Comma-separated list of problem sizes
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<usize>>,

    /// Number of repetitions per case
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    repetitions: u32,

    /// JSONL output artifact path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct ReportArgs {
    /// Input JSONL benchmark artifact
    #[arg(long)]
    input: PathBuf,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum Scenario {
    /// `KMatrix (n x n) * VariableVector (n)`
    MatrixVector,
    /// `VariableMatrix (n x n) * VariableMatrix (n x n)`
    MatrixMatrix,
    /// Compile `A x <= b` with `A` of size `n x n`
    Compile,
}

impl Scenario {
    fn as_str(self) -> &'static str {
        match self {
            Scenario::MatrixVector => "matrix-vector",
            Scenario::MatrixMatrix => "matrix-matrix",
            Scenario::Compile => "compile",
        }
    }
}

/// One timed stage of one case.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BenchRecord {
    run_id: String,
    scenario: String,
    size: usize,
    repetition: u32,
    variables: usize,
    result_kind: String,
    stage: String,
    duration_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
struct SummaryRow {
    scenario: String,
    size: usize,
    stage: String,
    samples: usize,
    mean_duration_ms: f64,
    max_duration_ms: f64,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    enable_logging(cli.log_level.as_deref())?;

    match cli.command {
        Command::Run(args) => run_command(args),
        Command::Report(args) => {
            let records = load_records_jsonl(&args.input)?;
            render_output(args.format, &records)
        }
    }
}

fn run_command(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let sizes = args.sizes.unwrap_or_else(|| DEFAULT_SIZES.to_vec());
    if sizes.contains(&0) {
        return Err("sizes must be greater than zero".into());
    }

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    let run_id = format!("bench_{millis}");
    let output_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("artifacts/bench/{run_id}.jsonl")));

    let mut records = Vec::new();
    for &scenario in &args.scenarios {
        for &size in &sizes {
            for repetition in 1..=args.repetitions {
                records.extend(execute_case(&run_id, scenario, size, repetition)?);
                tracing::debug!(
                    component = "bench",
                    operation = "execute_case",
                    status = "success",
                    scenario = scenario.as_str(),
                    size,
                    repetition,
                    "Executed benchmark case"
                );
            }
        }
    }

    write_records_jsonl(&output_path, &records)?;
    render_output(args.format, &records)?;
    println!("artifact: {}", output_path.display());
    Ok(())
}

/// Deterministic small integer entries so runs are comparable.
fn coefficient_matrix(size: usize) -> Result<KMatrix, symopt_expr::ExprError> {
    let rows: Vec<Vec<f64>> = (0..size)
        .map(|i| (0..size).map(|j| ((i * size + j) % 7 + 1) as f64).collect())
        .collect();
    KMatrix::from_values(&rows)
}

/// Run one case and return a record per stage, ending with `total`.
fn execute_case(
    run_id: &str,
    scenario: Scenario,
    size: usize,
    repetition: u32,
) -> Result<Vec<BenchRecord>, Box<dyn Error>> {
    let total_started = Instant::now();
    let mut env = Environment::new(scenario.as_str());
    let mut stages = Vec::new();

    let setup_started = Instant::now();
    let result_kind = match scenario {
        Scenario::MatrixVector => {
            let x = env.new_variable_vector(size, VarType::Continuous, Bounds::free())?;
            let a = coefficient_matrix(size)?;
            stages.push(("setup", setup_started.elapsed()));

            let started = Instant::now();
            let product = a.multiply(&x)?;
            stages.push(("multiply", started.elapsed()));
            product.kind().as_str().to_string()
        }
        Scenario::MatrixMatrix => {
            let left = env.new_variable_matrix(size, size, VarType::Continuous, Bounds::free())?;
            let right = env.new_variable_matrix(size, size, VarType::Continuous, Bounds::free())?;
            stages.push(("setup", setup_started.elapsed()));

            let started = Instant::now();
            let product = left.multiply(&right)?;
            stages.push(("multiply", started.elapsed()));
            product.kind().as_str().to_string()
        }
        Scenario::Compile => {
            let bounds = Bounds::new(0.0, 1_000.0);
            let x = env.new_variable_vector(size, VarType::Continuous, bounds)?;
            let b = KVector::from_values(&vec![10_000.0; size])?;
            let mut system = ConstraintSystem::new();
            system.add(coefficient_matrix(size)?.multiply(&x)?.less_eq(&b)?)?;
            stages.push(("setup", setup_started.elapsed()));

            let started = Instant::now();
            let compiled = system.compile(&env, &CompileOptions::new())?;
            stages.push(("compile", started.elapsed()));
            format!("{}x{}", compiled.num_inequalities(), compiled.variables().len())
        }
    };
    stages.push(("total", total_started.elapsed()));

    Ok(stages
        .into_iter()
        .map(|(stage, duration)| BenchRecord {
            run_id: run_id.to_string(),
            scenario: scenario.as_str().to_string(),
            size,
            repetition,
            variables: env.num_variables(),
            result_kind: result_kind.clone(),
            stage: stage.to_string(),
            duration_ms: duration.as_secs_f64() * 1000.0,
        })
        .collect())
}

fn render_output(format: OutputFormat, records: &[BenchRecord]) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Table => print_summary_table(&summarize_records(records)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
    }
    Ok(())
}

fn summarize_records(records: &[BenchRecord]) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<(&str, usize, &str), Vec<f64>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.scenario.as_str(), record.size, record.stage.as_str()))
            .or_default()
            .push(record.duration_ms);
    }

    groups
        .into_iter()
        .map(|((scenario, size, stage), durations)| SummaryRow {
            scenario: scenario.to_string(),
            size,
            stage: stage.to_string(),
            samples: durations.len(),
            mean_duration_ms: durations.iter().sum::<f64>() / durations.len() as f64,
            max_duration_ms: durations.iter().copied().fold(0.0, f64::max),
        })
        .collect()
}

fn print_summary_table(rows: &[SummaryRow]) {
    println!(
        "{:<14} {:>6} {:<10} {:>7} {:>12} {:>12}",
        "scenario", "size", "stage", "samples", "mean_ms", "max_ms"
    );
    for row in rows {
        println!(
            "{:<14} {:>6} {:<10} {:>7} {:>12.3} {:>12.3}",
            row.scenario,
            row.size,
            row.stage,
            row.samples,
            row.mean_duration_ms,
            row.max_duration_ms,
        );
    }
}

fn write_records_jsonl(path: &Path, records: &[BenchRecord]) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

fn load_records_jsonl(path: &Path) -> Result<Vec<BenchRecord>, Box<dyn Error>> {
    let mut records = Vec::new();
    for line in BufReader::new(File::open(path)?).lines() {
        let line = line?;
        if !line.trim().is_empty() {
            records.push(serde_json::from_str(&line)?);
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::{
        BenchRecord, Scenario, execute_case, load_records_jsonl, summarize_records,
        write_records_jsonl,
    };

    fn approx_eq(left: f64, right: f64) {
        assert!((left - right).abs() < 1e-9, "left={left}, right={right}");
    }

    fn record(size: usize, repetition: u32, duration_ms: f64) -> BenchRecord {
        BenchRecord {
            run_id: "run".to_string(),
            scenario: "matrix-vector".to_string(),
            size,
            repetition,
            variables: size,
            result_kind: "polynomial".to_string(),
            stage: "multiply".to_string(),
            duration_ms,
        }
    }

    #[test]
    fn summarize_records_groups_and_averages() {
        let records = vec![record(10, 1, 10.0), record(10, 2, 30.0), record(20, 1, 5.0)];

        let summary = summarize_records(&records);
        assert_eq!(summary.len(), 2);
        let row = &summary[0];
        assert_eq!(row.size, 10);
        assert_eq!(row.samples, 2);
        approx_eq(row.mean_duration_ms, 20.0);
        approx_eq(row.max_duration_ms, 30.0);
    }

    #[test]
    fn every_scenario_records_its_stages() {
        for scenario in [
            Scenario::MatrixVector,
            Scenario::MatrixMatrix,
            Scenario::Compile,
        ] {
            let records = execute_case("run", scenario, 3, 1).unwrap();
            let stages: Vec<&str> = records.iter().map(|r| r.stage.as_str()).collect();
            assert_eq!(stages.len(), 3);
            assert_eq!(stages.last(), Some(&"total"));
            assert!(records.iter().all(|r| r.scenario == scenario.as_str()));
        }
    }

    #[test]
    fn result_kinds_follow_the_products() {
        let kind = |scenario: Scenario, size: usize| {
            execute_case("run", scenario, size, 1).unwrap()[0]
                .result_kind
                .clone()
        };
        assert_eq!(kind(Scenario::MatrixVector, 2), "polynomial");
        assert_eq!(kind(Scenario::MatrixMatrix, 2), "polynomial");
        assert_eq!(kind(Scenario::Compile, 4), "4x4");
    }

    #[test]
    fn jsonl_artifacts_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "symopt-bench-{}-roundtrip.jsonl",
            std::process::id()
        ));
        let records = vec![record(10, 1, 1.5), record(10, 2, 2.5)];
        write_records_jsonl(&path, &records).unwrap();
        let loaded = load_records_jsonl(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.len(), 2);
        approx_eq(loaded[1].duration_ms, 2.5);
        assert_eq!(loaded[0].scenario, "matrix-vector");
    }
}
