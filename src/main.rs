//! Face tracking avatar driver: landmarks in, renderer parameters out.

use anyhow::{Context, Result};
use clap::Parser;
use facetrack_avatar::{app::TrackerApp, config::Config};
use log::info;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Landmark input, a JSON lines file or "-" for stdin
    #[arg(short, long)]
    input: Option<String>,

    /// Send records to the renderer over UDP
    #[arg(long)]
    connect: bool,

    /// Renderer endpoint (host:port)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if args.print_config {
        print!("{}", facetrack_avatar::config::EXAMPLE_CONFIG);
        return Ok(());
    }

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Face tracking avatar v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration if provided
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            Config::from_file(path).with_context(|| format!("Invalid configuration file {path}"))?
        }
        None => Config::default(),
    };

    // Command line flags override the file
    if let Some(input) = args.input {
        config.source.input = input;
    }
    if let Some(endpoint) = args.endpoint {
        config.transport.endpoint = endpoint;
    }
    config.transport.enabled |= args.connect;
    config.debug.enabled |= args.debug;

    let stop = Arc::new(AtomicBool::new(false));
    ctrlc::set_handler({
        let stop = stop.clone();
        move || {
            info!("Received Ctrl-C, stopping");
            stop.store(true, Ordering::SeqCst);
        }
    })?;

    // Create and run application
    let mut app = TrackerApp::new(config)?;
    let stats = app.run(&stop)?;
    info!("Sent {} of {} records", stats.records - stats.send_failures, stats.records);

    Ok(())
}
