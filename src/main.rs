//! WireGuard Vanity Key Generator CLI
//!
//! Usage:
//!   wg_vanity --prefix wg                        # Public key starting with "wg"
//!   wg_vanity --prefix home --ignore-case        # "home", "HOME", "HoMe", ...
//!   wg_vanity --prefix vpn --jobs 4              # Use 4 worker threads

use std::process;

use clap::Parser;
use crossbeam_channel::{bounded, Receiver};
use tracing_subscriber::EnvFilter;

use wg_vanity::format::format_seconds;
use wg_vanity::config::cli_exit_code;
use wg_vanity::{run_search, Config, HostInfo, SearchResult, Settings, StatusLine};

fn main() {
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(e) => {
            let _ = e.print();
            process::exit(cli_exit_code(&e));
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    init_logging();

    let host = HostInfo::probe();
    let settings = Settings::default();

    if let Some(request) = config.search_request(&settings) {
        let jobs = request.resolve_jobs(&host);
        if let Ok(estimate) = request.validate() {
            println!("WireGuard Vanity Key Generator");
            println!("==============================");
            println!("Prefix:      {}", request.prefix());
            println!("Expected:    {} attempts", estimate.expected_attempts);
            println!("Difficulty:  {}", estimate.difficulty_description());
            println!("Workers:     {}", jobs);
            println!();
        }

        match run_search(&request, &host, StatusLine::stderr(), ctrlc_channel()) {
            Ok(result) => print_result(&result, config.ignore_case),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(e.exit_code());
            }
        }
    }

    println!("{}", host);
}

fn print_result(result: &SearchResult, ignore_case: bool) {
    let elapsed_ms = result.elapsed.as_millis();
    println!("Prefix:      {}", result.prefix);
    println!("Jobs:        {}", result.jobs);
    println!("Ignore case: {}", if ignore_case { "on" } else { "off" });
    println!("Attempts:    {}", result.total_attempts);
    println!(
        "Elapsed:     {}ms ({})",
        elapsed_ms,
        format_seconds(result.elapsed.as_secs_f64())
    );
    println!("Public key:  {}", result.public_key);
    println!("Private key: {}", result.private_key);
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Forwards Ctrl-C to the coordinator so it can tear the pool down.
fn ctrlc_channel() -> Option<Receiver<()>> {
    let (tx, rx) = bounded(1);
    match ctrlc::set_handler(move || {
        let _ = tx.try_send(());
    }) {
        Ok(()) => Some(rx),
        Err(e) => {
            tracing::warn!(error = %e, "failed to install Ctrl-C handler");
            None
        }
    }
}
