use anyhow::{Context, Result};
use colored::*;
use log;
use std::env;
use std::fs;
use std::path::Path;
use xflatten_core::{CONFIG_FILENAME, Config, MARKER_DIR};

pub const GITIGNORE_ENTRY: &str = ".flatten/";

pub fn handle_init_command(quiet: bool) -> Result<()> {
    let project_root = env::current_dir().context("Failed to determine current directory")?;
    init_project(&project_root)?;

    if !quiet {
        println!(
            "{} Initialized flatten project in {}",
            "✅".green(),
            project_root.display().to_string().blue()
        );
    }
    Ok(())
}

/// Create the `.flatten` marker directory, write the default config and
/// register the directory in `.gitignore`. Re-running keeps an existing
/// config untouched.
pub fn init_project(project_root: &Path) -> Result<()> {
    let marker_dir = project_root.join(MARKER_DIR);
    let config_path = marker_dir.join(CONFIG_FILENAME);

    fs::create_dir_all(&marker_dir).with_context(|| {
        format!("Failed to create marker directory {}", marker_dir.display())
    })?;

    if config_path.is_file() {
        log::info!("Config already exists at {}, keeping it.", config_path.display());
    } else {
        let default_config = serde_json::to_string_pretty(&Config::default())
            .context("Failed to serialize default configuration")?;
        fs::write(&config_path, default_config).with_context(|| {
            format!("Failed to write config file {}", config_path.display())
        })?;
        log::info!("Wrote default config to {}", config_path.display());
    }

    ensure_gitignore_entry(project_root)
}

fn ensure_gitignore_entry(project_root: &Path) -> Result<()> {
    let gitignore_path = project_root.join(".gitignore");
    let existing = if gitignore_path.is_file() {
        fs::read_to_string(&gitignore_path).with_context(|| {
            format!("Failed to read {}", gitignore_path.display())
        })?
    } else {
        String::new()
    };

    if existing.lines().any(|line| line.trim() == GITIGNORE_ENTRY) {
        log::debug!(".gitignore already contains '{}'", GITIGNORE_ENTRY);
        return Ok(());
    }

    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(GITIGNORE_ENTRY);
    updated.push('\n');
    fs::write(&gitignore_path, updated).with_context(|| {
        format!("Failed to update {}", gitignore_path.display())
    })?;
    log::info!("Added '{}' to .gitignore", GITIGNORE_ENTRY);
    Ok(())
}
