#![windows_subsystem = "windows"]
use std::io::{self, BufRead, Write};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ts_core::config::CoreConfig;
use ts_core::protocol;

fn init_logging() {
    // stdout carries protocol responses only
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    init_logging();

    let config = CoreConfig::from_env();
    info!(home = %config.home.display(), "ts-core started");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!(error = %e, "failed to read request line");
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let id = protocol::request_id(&line);
        let result = std::panic::catch_unwind(|| protocol::handle(&line, &config));

        let response = match result {
            Ok(resp) => resp,
            Err(_) => {
                error!(id = %id, "request handler panicked");
                protocol::internal_error(id)
            }
        };

        if writeln!(stdout, "{response}").is_err() {
            break;
        }

        let _ = stdout.flush();
    }
}
