use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use runplan_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "runplan")]
#[command(about = "Structured running workouts from CSV training plans", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a plan and show the workout schedule
    Validate {
        /// Path to the CSV training plan
        csv_file: PathBuf,

        /// Monday of week 1 (YYYY-MM-DD)
        #[arg(short, long)]
        start_date: Option<NaiveDate>,
    },

    /// Print the workout documents for every scheduled workout as JSON
    Render {
        /// Path to the CSV training plan
        csv_file: PathBuf,

        /// Monday of week 1 (YYYY-MM-DD)
        #[arg(short, long)]
        start_date: Option<NaiveDate>,
    },

    /// Append the workout documents to a JSONL schedule file
    Export {
        /// Path to the CSV training plan
        csv_file: PathBuf,

        /// Monday of week 1 (YYYY-MM-DD)
        #[arg(short, long)]
        start_date: Option<NaiveDate>,

        /// Schedule file to append to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the workouts already in a schedule file, by date
    Schedule {
        /// Schedule file to read
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    runplan_core::logging::init_for_cli(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Validate {
            csv_file,
            start_date,
        } => {
            let start = resolve_start_date(start_date, &config)?;
            cmd_validate(&csv_file, start, cli.verbose)
        }
        Commands::Render {
            csv_file,
            start_date,
        } => {
            let start = resolve_start_date(start_date, &config)?;
            cmd_render(&csv_file, start, config.export.pretty)
        }
        Commands::Export {
            csv_file,
            start_date,
            output,
        } => {
            let start = resolve_start_date(start_date, &config)?;
            let output = output.unwrap_or_else(|| config.export.output_path.clone());
            cmd_export(&csv_file, start, &output)
        }
        Commands::Schedule { output } => {
            let output = output.unwrap_or_else(|| config.export.output_path.clone());
            cmd_schedule(&output)
        }
    }
}

fn resolve_start_date(cli_date: Option<NaiveDate>, config: &Config) -> Result<NaiveDate> {
    cli_date.or(config.plan.start_date).ok_or_else(|| {
        Error::Config("No start date: pass --start-date or set [plan] start_date".into())
    })
}

fn cmd_validate(csv_file: &Path, start: NaiveDate, verbose: bool) -> Result<()> {
    println!("\nValidating training plan: {}\n", csv_file.display());

    let workouts = parse_training_plan_file(csv_file, start)?;

    if workouts.is_empty() {
        println!("No workouts found in CSV file.");
        return Ok(());
    }

    println!("✓ Valid CSV with {} workouts\n", workouts.len());

    println!("{:>3}  {:<10}  {:<9}  {:<30}  {:>5}", "#", "Date", "Day", "Workout", "Steps");
    println!("{}", "─".repeat(65));
    for (i, entry) in workouts.iter().enumerate() {
        println!(
            "{:>3}  {:<10}  {:<9}  {:<30}  {:>5}",
            i + 1,
            entry.date.format("%Y-%m-%d"),
            entry.date.format("%A"),
            entry.workout.name(),
            entry.workout.steps().len()
        );
    }

    if verbose {
        println!("\nWorkout Details:\n");
        for entry in &workouts {
            println!("{}", entry);
            display_steps(entry.workout.steps(), 1);
            println!();
        }
    }

    Ok(())
}

fn display_steps(steps: &[WorkoutStep], depth: usize) {
    let indent = "    ".repeat(depth);
    for (j, step) in steps.iter().enumerate() {
        match step {
            WorkoutStep::Repeat(group) => {
                println!("{}{}. Repeat x{}", indent, j + 1, group.iterations());
                display_steps(group.steps(), depth + 1);
            }
            WorkoutStep::Executable(step) => {
                println!("{}{}. {}", indent, j + 1, step.step_type_keyword);
            }
        }
    }
}

fn cmd_render(csv_file: &Path, start: NaiveDate, pretty: bool) -> Result<()> {
    let workouts = parse_training_plan_file(csv_file, start)?;
    let documents = serde_json::Value::Array(workouts.iter().map(|w| w.render()).collect());

    let output = if pretty {
        serde_json::to_string_pretty(&documents)?
    } else {
        serde_json::to_string(&documents)?
    };
    println!("{}", output);

    Ok(())
}

fn cmd_export(csv_file: &Path, start: NaiveDate, output: &Path) -> Result<()> {
    let workouts = parse_training_plan_file(csv_file, start)?;

    let mut sink = JsonlScheduleSink::new(output);
    let summary = sink.export(&workouts)?;
    tracing::info!(
        "Exported {} workouts to {:?} ({} already scheduled)",
        summary.written,
        output,
        summary.skipped
    );

    println!("✓ Exported {} workouts", summary.written);
    if summary.skipped > 0 {
        println!("  Skipped {} already scheduled", summary.skipped);
    }
    println!("  Schedule: {}", output.display());

    Ok(())
}

fn cmd_schedule(path: &Path) -> Result<()> {
    let mut entries = read_schedule(path)?;

    if entries.is_empty() {
        println!("No scheduled workouts in {}", path.display());
        return Ok(());
    }

    entries.sort_by(|a, b| a.key.cmp(&b.key));

    println!("{:<10}  {:<9}  {:<30}  {:>5}", "Date", "Day", "Workout", "Steps");
    println!("{}", "─".repeat(60));
    for entry in &entries {
        let steps = entry.document["workout"]["workoutSegments"][0]["workoutSteps"]
            .as_array()
            .map_or(0, Vec::len);
        println!(
            "{:<10}  {:<9}  {:<30}  {:>5}",
            entry.key.date.format("%Y-%m-%d"),
            entry.key.date.format("%A"),
            entry.key.workout_name,
            steps
        );
    }

    Ok(())
}
