//! slipday - Attendance-earned slip-day tracker
//!
//! Reconciles gradebook exports against a saved roster and keeps per-person
//! slip-day accounting.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use slipday::app::AppContext;
use slipday::cli::{Cli, commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    // Before config loading; the log format follows `--robot` only.
    init_tracing(&cli);
    let ctx = AppContext::from_cli(&cli);
    let robot = ctx.as_ref().map_or(cli.robot, |ctx| ctx.robot_mode);

    match ctx.and_then(|ctx| commands::run(&ctx, &cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if robot {
                // Robot mode: JSON error output to stdout
                let error_json = serde_json::json!({
                    "error": true,
                    "code": e.code(),
                    "message": e.to_string(),
                });
                println!("{}", serde_json::to_string(&error_json).unwrap_or_default());
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,slipday=info",
        1 => "info,slipday=debug",
        2 => "debug,slipday=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.robot {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
