// src/main.rs

use std::fs;

use anyhow::{bail, Context};
use log::{debug, info};
use serde::Serialize;

use shader_scan::config::CONFIG;
use shader_scan::ShaderScanner;

/// One line of output per scanned file.
#[derive(Debug, Serialize)]
struct FileReport<'a> {
    file: &'a str,
    uniforms: Vec<String>,
    attributes: Vec<String>,
}

/// Main entry point for `shader-scan`.
///
/// Scans each shader file named on the command line and prints its flattened
/// uniform and attribute names as one JSON object per line.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let files: Vec<String> = std::env::args().skip(1).collect();
    if files.is_empty() {
        bail!("usage: shader-scan FILE...");
    }

    let scanner = ShaderScanner::from_config(&CONFIG);
    debug!("Scanner options: {:?}", scanner.options());
    info!("Scanning {} file(s)", files.len());

    for file in &files {
        let source = fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))?;
        let report = FileReport {
            file,
            uniforms: scanner.scan_uniforms(&source),
            attributes: scanner.scan_attributes(&source),
        };
        let line = serde_json::to_string(&report).context("Failed to serialize report")?;
        println!("{}", line);
    }

    Ok(())
}
