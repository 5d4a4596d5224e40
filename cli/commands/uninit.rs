use crate::commands::init::GITIGNORE_ENTRY;
use anyhow::{Context, Result};
use colored::*;
use log;
use std::env;
use std::fs;
use std::path::Path;
use xflatten_core::MARKER_DIR;

pub fn handle_uninit_command(quiet: bool) -> Result<()> {
    let project_root = env::current_dir().context("Failed to determine current directory")?;

    if !project_root.join(MARKER_DIR).is_dir() {
        if !quiet {
            println!(
                "{} Nothing to remove: {} does not exist.",
                "ℹ️".blue(),
                project_root.join(MARKER_DIR).display()
            );
        }
        return Ok(());
    }

    uninit_project(&project_root)?;

    if !quiet {
        println!(
            "{} Removed flatten configuration from {}",
            "✅".green(),
            project_root.display().to_string().blue()
        );
    }
    Ok(())
}

/// Remove the `.flatten` directory and drop its `.gitignore` entry.
pub fn uninit_project(project_root: &Path) -> Result<()> {
    let marker_dir = project_root.join(MARKER_DIR);
    fs::remove_dir_all(&marker_dir).with_context(|| {
        format!("Failed to remove marker directory {}", marker_dir.display())
    })?;
    log::info!("Removed {}", marker_dir.display());

    remove_gitignore_entry(project_root)
}

fn remove_gitignore_entry(project_root: &Path) -> Result<()> {
    let gitignore_path = project_root.join(".gitignore");
    if !gitignore_path.is_file() {
        return Ok(());
    }

    let existing = fs::read_to_string(&gitignore_path)
        .with_context(|| format!("Failed to read {}", gitignore_path.display()))?;
    if !existing.lines().any(|line| line.trim() == GITIGNORE_ENTRY) {
        return Ok(());
    }

    let updated: String = existing
        .lines()
        .filter(|line| line.trim() != GITIGNORE_ENTRY)
        .map(|line| format!("{}\n", line))
        .collect();
    fs::write(&gitignore_path, updated).with_context(|| {
        format!("Failed to update {}", gitignore_path.display())
    })?;
    log::info!("Removed '{}' from .gitignore", GITIGNORE_ENTRY);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::init_project;
    use xflatten_core::{AppError, Config};

    #[test]
    fn init_uninit_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "target/\n").unwrap();

        init_project(dir.path()).unwrap();
        assert!(Config::load(dir.path()).is_ok());

        uninit_project(dir.path()).unwrap();
        assert!(!dir.path().join(MARKER_DIR).exists());
        assert!(matches!(
            Config::load(dir.path()),
            Err(AppError::NotInitialized)
        ));

        let gitignore = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(gitignore, "target/\n");
    }
}
