//! Game balance simulator CLI.
//!
//! Run Monte Carlo simulations to analyze game balance.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                      # Default: 1000 runs
//!   cargo run --bin simulate -- -n 100 -e 200    # 100 runs of 200 fights
//!   cargo run --bin simulate -- --seed 42        # Reproducible run

use idle_hero::build_info;
use idle_hero::simulator::{run_simulation, SimConfig};
use idle_hero::GameConfig;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

struct Args {
    sim: SimConfig,
    game_config: Option<PathBuf>,
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("error: {}", message);
            eprintln!("Run with --help for usage.");
            return ExitCode::FAILURE;
        }
    };

    let game = match &args.game_config {
        Some(path) => match GameConfig::load(path) {
            Ok(game) => game,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };
    let config = args.sim;

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              IDLE HERO BALANCE SIMULATOR                      ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Encounters:     {}", config.max_encounters);
    println!("  Stage Advance:  every {} wins", config.stage_advance_wins);
    match &args.game_config {
        Some(path) => println!("  Rules:          {}", path.display()),
        None => println!("  Rules:          built-in defaults"),
    }
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = match run_simulation(&config, &game) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("{}", report.to_text());

    if args.json {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        if let Err(e) = std::fs::write(&filename, report.to_json()) {
            eprintln!("error: failed to write {}: {}", filename, e);
            return ExitCode::FAILURE;
        }
        println!("JSON report saved to: {}", filename);
    }

    ExitCode::SUCCESS
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{} needs a value", flag))
}

fn number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    let raw = value(args, i, flag)?;
    raw.parse()
        .map_err(|_| format!("{} expects a number, got '{}'", flag, raw))
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args {
        sim: SimConfig::default(),
        game_config: None,
        json: false,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-n" | "--runs" => {
                parsed.sim.num_runs = number(args, i, flag)?;
                i += 1;
            }
            "-s" | "--seed" => {
                parsed.sim.seed = Some(number(args, i, flag)?);
                i += 1;
            }
            "-e" | "--encounters" => {
                parsed.sim.max_encounters = number(args, i, flag)?;
                i += 1;
            }
            "-w" | "--advance-wins" => {
                parsed.sim.stage_advance_wins = number::<u32>(args, i, flag)?.max(1);
                i += 1;
            }
            "-c" | "--config" => {
                parsed.game_config = Some(PathBuf::from(value(args, i, flag)?));
                i += 1;
            }
            "--json" => {
                parsed.json = true;
            }
            "-v" | "--verbose" => {
                parsed.sim.verbosity = 2;
            }
            "--quick" => {
                let seed = parsed.sim.seed.unwrap_or(1);
                parsed.sim = SimConfig::quick(seed);
            }
            "-V" | "--version" => {
                println!("{}", build_info::version_line());
                std::process::exit(0);
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => return Err(format!("unknown option '{}'", other)),
        }
        i += 1;
    }

    Ok(parsed)
}

fn print_help() {
    println!("Idle Hero Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>          Number of simulated players (default: 1000)");
    println!("    -s, --seed <S>          Random seed for reproducibility");
    println!("    -e, --encounters <E>    Fights per player (default: 500)");
    println!("    -w, --advance-wins <W>  Wins needed to move up a stage (default: 3)");
    println!("    -c, --config <FILE>     Load rule tables from a JSON file");
    println!("    -v, --verbose           Print one line per run");
    println!("    --json                  Save JSON report");
    println!("    --quick                 Quick check (20 seeded runs of 100 fights)");
    println!("    -V, --version           Print version and build info");
    println!("    -h, --help              Show this help");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=idle_hero=info) to see rule events on stderr.");
}
