use crate::cli_args::FlattenArgs;
use anyhow::{Context, Result};
use chrono::Local;
use colored::*;
use log;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use xflatten_core::{self as core, Config};

pub fn handle_flatten_command(args: FlattenArgs, quiet: bool) -> Result<()> {
    let project_root = env::current_dir().context("Failed to determine current directory")?;
    log::info!("Project root determined: {}", project_root.display());

    let config = Config::load(&project_root).context("Failed to load configuration")?;

    let output_path = core::flatten_files(
        &project_root,
        &args.paths,
        args.output.as_deref(),
        args.recursive,
        args.with_imports,
        &config,
    )
    .context("Flatten operation failed")?;

    if !quiet {
        let shown = pathdiff::diff_paths(&output_path, &project_root)
            .unwrap_or_else(|| output_path.clone());
        println!(
            "{} Flattened output written to: {}",
            "✅".green(),
            shown.display().to_string().blue()
        );
    }

    if config.logging.log_to_file {
        if let Err(e) = append_log_line(&project_root, &config, &output_path) {
            log::warn!("Failed to write log file entry: {:#}", e);
        }
    }

    Ok(())
}

fn append_log_line(project_root: &Path, config: &Config, output_path: &Path) -> Result<()> {
    let log_dir = if config.logging.log_dir.is_absolute() {
        config.logging.log_dir.clone()
    } else {
        project_root.join(&config.logging.log_dir)
    };
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let log_path = log_dir.join(&config.logging.log_file);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
    writeln!(
        file,
        "{} [INFO] Flattened output written to {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        output_path.display()
    )
    .with_context(|| format!("Failed to append to log file {}", log_path.display()))?;
    Ok(())
}
