//! Standalone driver: JSON requests on stdin, JSON responses on stdout.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use image_selector::{handle_line, SelectorTool};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut tool = SelectorTool::from_env().context("failed to initialize image selector")?;
    log::info!("Working directory: {}", tool.working_directory().display());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read request")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(&mut tool, &line);
        serde_json::to_writer(&mut out, &response)?;
        writeln!(out)?;
        out.flush()?;
    }

    Ok(())
}
