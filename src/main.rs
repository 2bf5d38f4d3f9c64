use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

use weekend_hud::components::modality::ModalityKind;
use weekend_hud::core::session::{Session, Snapshot};
use weekend_hud::data::config::{
    load_session_config, ConfigError, SessionConfig, DEFAULT_CONFIG_PATH,
};
use weekend_hud::systems::hud::SwitchOutcome;
use weekend_hud::ui::clock_face::ClockFace;
use weekend_hud::ui::hud::render_hud;

const HELP: &str = "Commands: tick [dt] [n] | try <idling|marketing|jamming|sleeping> | status | modalities | help | quit";

fn main() {
    init_tracing();
    println!("Starting the weekend...");

    let config = match resolve_config(parse_config_path(env::args().collect())) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load session config: {}", err);
            std::process::exit(1);
        }
    };
    let mut session = match Session::from_config(&config) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    print!("{}", render_hud(&session.snapshot()));
    println!("{}", HELP);
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or("").to_lowercase();

        match cmd.as_str() {
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            "tick" => {
                let dt = match parts.next().map(str::parse::<f32>) {
                    None => 1.0,
                    Some(Ok(dt)) => dt,
                    Some(Err(_)) => {
                        println!("Usage: tick [dt] [n]");
                        continue;
                    }
                };
                let count = match parts.next().map(str::parse::<u32>) {
                    None => 1,
                    Some(Ok(count)) => count.max(1),
                    Some(Err(_)) => {
                        println!("Usage: tick [dt] [n]");
                        continue;
                    }
                };
                for _ in 0..count {
                    let snapshot = session.tick(dt);
                    print_tick_summary(&snapshot);
                }
            }
            "try" => {
                let Some(kind) = parts.next().and_then(ModalityKind::parse) else {
                    println!("Usage: try <idling|marketing|jamming|sleeping>");
                    continue;
                };
                match session.try_activate(kind) {
                    Ok(SwitchOutcome::Unchanged) => println!("Already {}.", kind),
                    Ok(SwitchOutcome::Switched { .. }) => {
                        println!("{}", session.hud().status)
                    }
                    Err(err) => println!("{}", err),
                }
            }
            "status" => print!("{}", render_hud(&session.snapshot())),
            "modalities" => print_modalities(&session.snapshot()),
            _ => println!("Unknown command '{}'. {}", cmd, HELP),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn parse_config_path(args: Vec<String>) -> Option<PathBuf> {
    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            return iter.next().map(PathBuf::from);
        }
    }
    None
}

fn resolve_config(path: Option<PathBuf>) -> Result<SessionConfig, ConfigError> {
    match path {
        Some(path) => load_session_config(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_session_config(DEFAULT_CONFIG_PATH),
        None => Ok(SessionConfig::default()),
    }
}

fn print_tick_summary(snapshot: &Snapshot) {
    println!(
        "{} (+{:.2}h) {}",
        ClockFace::from_time(snapshot.time),
        snapshot.delta_time,
        snapshot.status
    );
    for event in &snapshot.events {
        println!("  - {}", event);
    }
}

fn print_modalities(snapshot: &Snapshot) {
    for modality in &snapshot.modalities {
        let state = if modality.is_open { "open" } else { "closed" };
        match &modality.blocked {
            Some(reason) => println!(
                "{:<10} {:>3} {:<6} ({})",
                modality.kind, modality.counter, state, reason
            ),
            None => println!("{:<10} {:>3} {:<6}", modality.kind, modality.counter, state),
        }
    }
}
