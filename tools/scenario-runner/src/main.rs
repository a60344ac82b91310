//! scenario-runner: run a SALVO engagement scenario headlessly.
//!
//! Usage:
//!   scenario-runner run --scenario scenarios/skirmish.toml --seed 7 --ticks 200
//!   scenario-runner run --scenario skirmish.toml --config tuning.toml --summary-only

use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

use salvo_core::state::EngagementStats;
use salvo_sim::scenario::ScenarioDef;
use salvo_sim::{EngineConfig, SeededRolls};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "scenario-runner: SALVO engagement scenario runner\n\
         \n\
         Commands:\n\
         \n\
         run       Load a TOML scenario and run it tick by tick\n\
         \n\
           --scenario <path>  Scenario file (required)\n\
           --seed <N>         Roll seed (default: the scenario's seed)\n\
           --ticks <N>        Ticks to run (default: the scenario's tick count)\n\
           --config <path>    Engine tuning file, replaces the scenario's [config]\n\
           --summary-only     Skip per-tick JSON lines\n\
         \n\
         Tick reports go to stdout as one JSON object per line; logs go to\n\
         stderr and follow RUST_LOG (default: info).\n\
         \n\
         Examples:\n\
         \n\
           scenario-runner run --scenario scenarios/skirmish.toml\n\
           RUST_LOG=salvo_sim=debug scenario-runner run --scenario scenarios/skirmish.toml --seed 7\n"
    );
}

fn parse_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(&args[i + 1]);
        }
    }
    None
}

fn parse_u64(args: &[String], flag: &str) -> Option<u64> {
    let raw = parse_value(args, flag)?;
    match raw.parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => {
            eprintln!("Error: {flag} expects a non-negative integer, got '{raw}'");
            process::exit(1);
        }
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

// --- Run command ---

fn cmd_run(args: &[String]) {
    let scenario_path = match parse_value(args, "--scenario") {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("Error: --scenario <path> is required");
            process::exit(1);
        }
    };

    let mut def = match ScenarioDef::load(&scenario_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error loading scenario {}: {e}", scenario_path.display());
            process::exit(1);
        }
    };

    if let Some(config_path) = parse_value(args, "--config") {
        def.config = match EngineConfig::load(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config {config_path}: {e}");
                process::exit(1);
            }
        };
    }

    let seed = parse_u64(args, "--seed").unwrap_or(def.seed);
    let ticks = parse_u64(args, "--ticks").unwrap_or(def.ticks);
    let summary_only = has_flag(args, "--summary-only");

    let mut engine = match def.build() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error building scenario: {e}");
            process::exit(1);
        }
    };
    let mut rolls = SeededRolls::from_seed(seed);

    tracing::info!(scenario = %def.name, seed, ticks, "running scenario");

    let result = def.run(&mut engine, ticks, &mut rolls, |report| {
        if summary_only || report.is_quiet() {
            return;
        }
        match serde_json::to_string(report) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("Error serializing tick {}: {e}", report.tick),
        }
    });

    match result {
        Ok(stats) => {
            print_summary(&stats, engine.time().tick);
            for id in engine.ship_ids() {
                let status = if engine.is_destroyed(id) { "destroyed" } else { "active" };
                let hp = engine.defenses(id).map(|d| d.stack.total_hp()).unwrap_or(0.0);
                eprintln!("  {id}: {status}, {hp:.1} hp remaining");
            }
        }
        Err(e) => {
            eprintln!("Simulation aborted at tick {}: {e}", engine.time().tick);
            process::exit(2);
        }
    }
}

fn print_summary(stats: &EngagementStats, ticks: u64) {
    let hit_rate = if stats.beam_shots > 0 {
        f64::from(stats.beam_hits) / f64::from(stats.beam_shots)
    } else {
        0.0
    };
    eprintln!("Ran {ticks} ticks");
    eprintln!(
        "  beams: {} shots, {} hits, {} misses ({:.1}% hit rate)",
        stats.beam_shots,
        stats.beam_hits,
        stats.beam_misses,
        hit_rate * 100.0
    );
    eprintln!(
        "  munitions: {} launched, {} impacted, {} expired",
        stats.munitions_launched, stats.munitions_impacted, stats.munitions_expired
    );
    eprintln!("  ships destroyed: {}", stats.ships_destroyed);
}
