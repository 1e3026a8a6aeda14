//! Replays a recorded face-tracking trace through the gesture engine.

use anyhow::{Context, Result};
use clap::Parser;
use head_scroll::{
    actuator::WebCommand,
    config::{Config, EXAMPLE_CONFIG},
    engine::{EngineEvent, GestureEngine},
    preferences::{load_scroll_preferences, save_scroll_preferences, YamlFileStore},
    trace::{replay, Trace},
};
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Trace file to replay (YAML)
    #[arg(short, long, required_unless_present = "print_config")]
    trace: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Preference file holding user-adjusted scroll settings (YAML)
    #[arg(short, long)]
    prefs: Option<String>,

    /// Print an example configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Print the full report as YAML instead of one line per event
    #[arg(long)]
    yaml: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    // Load configuration if provided
    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    let mut engine = GestureEngine::new(config).context("Invalid configuration")?;

    let mut store = match &args.prefs {
        Some(path) => {
            let store = YamlFileStore::open(path).with_context(|| format!("Failed to open preferences {path}"))?;
            let scroll = load_scroll_preferences(&store, engine.scroll_config(), &engine.config().settings_adjust);
            engine.load_scroll_config(scroll);
            Some(store)
        }
        None => None,
    };

    let trace_path = args.trace.context("No trace file given")?;
    info!("Replaying trace: {}", trace_path);
    let trace = Trace::from_file(&trace_path).with_context(|| format!("Failed to load trace {trace_path}"))?;

    let report = replay(&mut engine, &trace);
    info!("Replayed {} frames, {} events", report.frames, report.events.len());

    if let Some(store) = store.as_mut() {
        if let Some(scroll) = report.events.iter().rev().find_map(|timed| match timed.event {
            EngineEvent::ConfigChanged { scroll } => Some(scroll),
            _ => None,
        }) {
            save_scroll_preferences(store, &scroll).context("Failed to save preferences")?;
            info!("Saved scroll settings to {}", store.path().display());
        }
    }

    if args.yaml {
        print!("{}", serde_yaml::to_string(&report)?);
        return Ok(());
    }

    for timed in &report.events {
        match WebCommand::from_event(&timed.event) {
            Some(command) => println!("{:>9.3}s  {:?} -> {:?}", timed.t, timed.event, command),
            None => println!("{:>9.3}s  {:?}", timed.t, timed.event),
        }
    }

    println!("final:");
    print!("{}", serde_yaml::to_string(&report.final_output)?);

    Ok(())
}
