use crate::config::Config;
use crate::error::Result;
use indexmap::IndexSet;
use log;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Ordered, deduplicated set of absolute file paths. Insertion order
/// reflects argument/discovery order and is preserved in the output.
pub type FileSet = IndexSet<PathBuf>;

/// Expand the user-supplied path/directory/glob inputs into a concrete
/// [`FileSet`], applying extension filtering and directory exclusion.
///
/// An input that matches nothing is not an error by itself; the caller
/// treats an overall empty result as fatal.
pub fn collect_files(inputs: &[String], config: &Config, recursive: bool) -> Result<FileSet> {
    let mut files = FileSet::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            if config.is_supported(path) {
                insert_file(&mut files, path);
            } else {
                log::warn!("Skipping file with unsupported extension: {}", input);
            }
        } else if path.is_dir() {
            collect_from_dir(path, config, recursive, &mut files)?;
        } else if is_glob_pattern(input) {
            collect_from_glob(input, config, recursive, &mut files)?;
        } else {
            log::warn!("Input matched no file, directory, or pattern: {}", input);
        }
    }

    log::info!("Collected {} file(s).", files.len());
    Ok(files)
}

fn collect_from_dir(
    dir: &Path,
    config: &Config,
    recursive: bool,
    files: &mut FileSet,
) -> Result<()> {
    log::debug!(
        "Collecting from directory '{}' (recursive: {})",
        dir.display(),
        recursive
    );
    let max_depth = if recursive { usize::MAX } else { 1 };

    // Sorted traversal keeps the output deterministic across platforms.
    let walker = WalkDir::new(dir)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            if config.is_excluded_dir(&name) {
                log::trace!("Skipping excluded directory: {}", entry.path().display());
                false
            } else {
                true
            }
        });

    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && config.is_supported(entry.path()) {
                    insert_file(files, entry.path());
                }
            }
            Err(e) => {
                log::warn!("Error walking '{}': {}. Skipping entry.", dir.display(), e);
            }
        }
    }
    Ok(())
}

fn collect_from_glob(
    pattern: &str,
    config: &Config,
    recursive: bool,
    files: &mut FileSet,
) -> Result<()> {
    if pattern.contains("**") && !recursive {
        log::warn!(
            "Pattern '{}' uses '**' but --recursive was not given. Skipping pattern.",
            pattern
        );
        return Ok(());
    }

    log::debug!("Expanding glob pattern: {}", pattern);
    for matched in glob::glob(pattern)? {
        match matched {
            Ok(path) => {
                if !path.is_file() {
                    continue;
                }
                if !config.is_supported(&path) {
                    log::trace!("Glob match has unsupported extension: {}", path.display());
                    continue;
                }
                if has_excluded_component(&path, config) {
                    log::trace!("Glob match inside excluded directory: {}", path.display());
                    continue;
                }
                insert_file(files, &path);
            }
            Err(e) => {
                log::warn!("Unreadable glob match for '{}': {}. Skipping.", pattern, e);
            }
        }
    }
    Ok(())
}

fn has_excluded_component(path: &Path, config: &Config) -> bool {
    path.components().any(|c| match c {
        Component::Normal(name) => config.is_excluded_dir(&name.to_string_lossy()),
        _ => false,
    })
}

fn insert_file(files: &mut FileSet, path: &Path) {
    // Canonical absolute paths make deduplication reliable when the same
    // file is reachable through several inputs.
    match fs::canonicalize(path) {
        Ok(absolute) => {
            if !files.insert(absolute) {
                log::trace!("Duplicate file dropped: {}", path.display());
            }
        }
        Err(e) => {
            log::warn!(
                "Failed to canonicalize '{}': {}. Skipping.",
                path.display(),
                e
            );
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}
