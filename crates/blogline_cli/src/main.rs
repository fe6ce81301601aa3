//! `blogline` console entry point.
//!
//! # Responsibility
//! - Resolve startup configuration and initialize logging.
//! - Open the database named by the connection file.
//! - Hand stdin/stdout to the menu controller until the user quits.
//!
//! # Invariants
//! - Every exit path after logging init records `program_end` and flushes
//!   the log sink.

use anyhow::{anyhow, Context, Result};
use blogline_core::db::open_target;
use blogline_core::{
    core_version, flush_logging, init_logging, load_connection_file, AppConfig, Menu,
    SqliteBlogRepository,
};
use log::{error, info};
use std::io;

fn main() -> Result<()> {
    let working_dir = std::env::current_dir().context("failed to resolve working directory")?;
    let config = AppConfig::from_env(&working_dir);

    init_logging(&config.log_level, &config.log_dir, config.log_to_stderr)
        .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;
    info!(
        "event=program_start module=cli status=ok version={}",
        core_version()
    );

    let result = run(&config);
    match &result {
        Ok(()) => info!("event=program_end module=cli status=ok"),
        Err(err) => error!("event=program_end module=cli status=error error={err:#}"),
    }
    flush_logging();
    result
}

fn run(config: &AppConfig) -> Result<()> {
    let target = load_connection_file(&config.connection_file)?;
    let conn = open_target(&target).context("failed to open database")?;
    let repo = SqliteBlogRepository::try_new(&conn).context("database is not ready")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(repo, stdin.lock(), stdout.lock())
        .run()
        .context("console I/O failed")
}
