use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use grade_calc::config::{Config, HistoryConfig};
use grade_calc::grading::{Blend, GradeError, GradeSettings, GradingPolicy};
use grade_calc::history::{record_best_effort, FileHistory, HistoryEntry};
use grade_calc::request::{evaluate_request, parse_request, resolved_settings, ApiResponse};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_WEIGHT: i32 = 2;
const EXIT_COMPUTATION: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the pre-final grade, exemption and required final exam score
    Evaluate {
        /// JSON request file (reads stdin when omitted or "-")
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the JSON response instead of a table
        #[arg(long)]
        json: bool,

        /// Pre-final share of the final grade, in percent
        #[arg(long)]
        pre_final_weight: Option<f64>,

        /// Final grade needed to pass
        #[arg(long)]
        passing_grade: Option<f64>,

        /// Do not record this evaluation in history
        #[arg(long)]
        no_history: bool,
    },
    /// List recorded evaluations, newest first
    History {
        /// Maximum number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,

        /// Only show entries newer than this (e.g. "7d", "12h")
        #[arg(long, value_parser = humantime::parse_duration)]
        since: Option<Duration>,
    },
    /// Print the effective grading policy as YAML
    Policy,
}

#[derive(Parser, Debug)]
#[command(name = "grade-calc")]
#[command(about = "Weighted grade and final exam calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/grade-calc/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let directive = if verbose {
        "grade_calc=debug"
    } else {
        "grade_calc=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn exit_code(err: &GradeError) -> i32 {
    match err {
        GradeError::Input(_) => EXIT_INPUT,
        GradeError::Weight { .. } => EXIT_WEIGHT,
        GradeError::Computation(_) => EXIT_COMPUTATION,
    }
}

fn read_body(input: Option<&PathBuf>) -> std::io::Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path),
        _ => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            Ok(body)
        }
    }
}

fn print_response(response: &ApiResponse) {
    match serde_json::to_string_pretty(response) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize response: {}", e),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match grade_calc::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate grading policy at startup
    let policy = config.grading.clone().unwrap_or_default();
    if let Err(errors) = grade_calc::grading::validate_policy(&policy) {
        eprintln!("Grading config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let code = match cli.command {
        Commands::Evaluate {
            input,
            json,
            pre_final_weight,
            passing_grade,
            no_history,
        } => {
            let overrides = GradeSettings::new(pre_final_weight, passing_grade);
            run_evaluate(&config, &policy, input, &overrides, json, no_history)
        }
        Commands::History { limit, since } => run_history(&config, limit, since),
        Commands::Policy => match serde_saphyr::to_string(&policy.resolved()) {
            Ok(yaml) => {
                print!("{}", yaml);
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to render policy: {}", e);
                EXIT_CONFIG
            }
        },
    };

    std::process::exit(code);
}

fn run_evaluate(
    config: &Config,
    policy: &GradingPolicy,
    input: Option<PathBuf>,
    overrides: &GradeSettings,
    json: bool,
    no_history: bool,
) -> i32 {
    let body = match read_body(input.as_ref()) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Failed to read request: {}", e);
            return EXIT_INPUT;
        }
    };

    let (settings, outcome) = match parse_request(&body) {
        Ok(request) => {
            let settings = resolved_settings(&request, overrides);
            tracing::debug!(
                "Evaluating {} components (settings: {:?})",
                request.components.len(),
                settings
            );
            (settings, evaluate_request(&request, overrides, policy))
        }
        Err(e) => (overrides.clone(), Err(e)),
    };

    if json {
        print_response(&ApiResponse::from_outcome(&outcome));
    }

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            if !json {
                eprintln!("{}", e);
            }
            return exit_code(&e);
        }
    };

    if !json {
        let blend = Blend::resolve(Some(&settings), policy);
        let use_colors = grade_calc::output::should_use_colors();
        println!(
            "{}",
            grade_calc::output::format_evaluation(
                &result,
                &blend,
                policy.component_floor(),
                use_colors
            )
        );
    }

    let history_config = config.history.clone().unwrap_or_default();
    if history_config.enabled && !no_history {
        match FileHistory::from_config(&history_config) {
            Ok(history) => {
                let entry = HistoryEntry::from_result(&result, Some(&settings));
                record_best_effort(&history, entry);
            }
            Err(e) => tracing::warn!("History unavailable: {:#}", e),
        }
    }

    EXIT_SUCCESS
}

fn run_history(config: &Config, limit: usize, since: Option<Duration>) -> i32 {
    let history_config: HistoryConfig = config.history.clone().unwrap_or_default();
    let state = match FileHistory::from_config(&history_config).and_then(|h| h.load()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("History error: {:#}", e);
            return EXIT_CONFIG;
        }
    };

    let since = since.and_then(|d| chrono::Duration::from_std(d).ok());
    let entries: Vec<_> = state.recent(since).into_iter().take(limit).collect();

    let use_colors = grade_calc::output::should_use_colors();
    println!(
        "{}",
        grade_calc::output::format_history(&entries, use_colors)
    );

    EXIT_SUCCESS
}
