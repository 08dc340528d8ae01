// Replays JSONL debug logs through the current portfolio
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all turns
//   --turns <turn1,turn2>  Replay specific turns (comma-separated)
//   --validate <T:M,...>   Check logged moves against expectations
//   --verbose              Log every replayed turn
//   --config <path>        Path to Snake.toml (default: Snake.toml)

use std::env;
use std::process;

use portfolio_snake::config::Config;
use portfolio_snake::replay::ReplayEngine;
use portfolio_snake::types::Direction;

/// What to do with the loaded log
enum Mode {
    All,
    Turns(Vec<i32>),
    Validate(Vec<(i32, Vec<Direction>)>),
}

struct Args {
    log_file: String,
    config_path: String,
    verbose: bool,
    mode: Mode,
}

fn print_usage() {
    eprintln!("Portfolio Snake Replay");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> (--all | --turns <T1,T2,...> | --validate <T:M,...>) [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --verbose               Log every replayed turn");
    eprintln!("  --config <path>         Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  replay battlesnake_debug.jsonl --all");
    eprintln!("  replay battlesnake_debug.jsonl --turns 5,10,15 --verbose");
    eprintln!("  replay battlesnake_debug.jsonl --validate 5:up,10:left|right");
}

fn parse_turns(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

/// Parses `turn:move[|move...]` pairs separated by commas
fn parse_expected_moves(s: &str) -> Result<Vec<(i32, Vec<Direction>)>, String> {
    s.split(',')
        .map(|pair| {
            let (turn, moves) = pair
                .trim()
                .split_once(':')
                .ok_or_else(|| format!("Invalid format '{}'. Expected 'turn:move'", pair))?;

            let turn = turn
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", turn, e))?;
            let moves = moves
                .split('|')
                .map(|m| m.parse::<Direction>())
                .collect::<Result<Vec<_>, _>>()?;

            Ok((turn, moves))
        })
        .collect()
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let log_file = args.get(1).cloned().ok_or("Missing log file")?;
    let mut config_path = "Snake.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        let mut value = |flag: &str| {
            rest.next()
                .cloned()
                .ok_or_else(|| format!("{} requires an argument", flag))
        };

        match arg.as_str() {
            "--all" => mode = Some(Mode::All),
            "--turns" => mode = Some(Mode::Turns(parse_turns(&value("--turns")?)?)),
            "--validate" => {
                mode = Some(Mode::Validate(parse_expected_moves(&value("--validate")?)?))
            }
            "--config" => config_path = value("--config")?,
            "--verbose" => verbose = true,
            other => return Err(format!("Unknown option '{}'", other)),
        }
    }

    let mode = mode.ok_or("Must specify --all, --turns, or --validate")?;

    Ok(Args {
        log_file,
        config_path,
        verbose,
        mode,
    })
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help") {
        print_usage();
        process::exit(0);
    }

    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(1);
        }
    };

    let config = Config::from_file(&args.config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", args.config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Config:   {}", args.config_path);
    println!("Log file: {}", args.log_file);

    let engine = ReplayEngine::new(config, args.verbose);

    let entries = match engine.load_log_file(&args.log_file) {
        Ok(entries) if entries.is_empty() => {
            eprintln!("Error: Log file is empty");
            process::exit(1);
        }
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    println!("Loaded {} log entries\n", entries.len());

    match args.mode {
        Mode::All => {
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Turns(turns) => match engine.replay_turns(&entries, &turns) {
            Ok(results) => engine.print_report(&results),
            Err(e) => {
                eprintln!("Error during replay: {}", e);
                process::exit(1);
            }
        },
        Mode::Validate(expected) => {
            match engine.validate_expected_moves(&entries, &expected) {
                Ok(()) => println!("✓ {} expected move(s) validated", expected.len()),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
