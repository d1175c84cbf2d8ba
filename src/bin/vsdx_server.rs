use clap::Parser;
use image_to_vsdx::config::load_config;
use image_to_vsdx::server::{run, ServerState};
use log::{error, info, LevelFilter};
use std::io;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

/// Converts detected diagram primitives into .vsdx documents over stdio JSON-RPC
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML converter configuration; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory where converted documents are written
    #[arg(short, long, default_value = "outputs")]
    output_dir: PathBuf,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'info' instead.", args.log_level);
        LevelFilter::Info
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    if let Err(e) = serve(&args) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn serve(args: &Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    std::fs::create_dir_all(&args.output_dir).map_err(|e| {
        anyhow::anyhow!("Failed to create output directory {}: {}", args.output_dir.display(), e)
    })?;

    info!("Starting conversion server, writing to {}", args.output_dir.display());
    let state = ServerState::new(&args.output_dir, config);
    run(&state, io::stdin().lock(), io::stdout().lock())?;
    info!("Server stopped");
    Ok(())
}
