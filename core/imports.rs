use crate::aliases::AliasMap;
use crate::config::Config;
use indexmap::IndexSet;
use log;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

// Extensions whose files have a recognized local-import syntax. Other
// file types simply contribute no imports.
const IMPORT_CAPABLE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs"];

// Syntactic pattern matching, not parsing: `import x from "..."`,
// bare `import "..."` and `export ... from "..."`.
static ES_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:import|export)\s+(?:[\w*\s{},$]+?\s+from\s+)?["']([^"']+)["']"#)
        .expect("ES import regex is valid")
});

static CJS_REQUIRE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"require\s*\(\s*["']([^"']+)["']\s*\)"#).expect("require regex is valid")
});

pub fn is_import_capable(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            IMPORT_CAPABLE_EXTENSIONS.iter().any(|e| *e == ext)
        })
        .unwrap_or(false)
}

/// Scan one file for local import targets and resolve each to an existing
/// absolute path, in the order the statements appear in the source.
///
/// Third-party (non-relative, non-alias) targets, dangling targets and
/// paths already in `visited` are skipped. Read failures are recovered
/// locally: a file that cannot be scanned simply yields no imports.
pub fn parse_imports(
    file_path: &Path,
    aliases: &AliasMap,
    visited: &IndexSet<PathBuf>,
    config: &Config,
) -> Vec<PathBuf> {
    if !is_import_capable(file_path) {
        return Vec::new();
    }

    let content = match fs::read_to_string(file_path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!(
                "Failed to read '{}' for import scanning: {}. Skipping.",
                file_path.display(),
                e
            );
            return Vec::new();
        }
    };

    let mut resolved = IndexSet::new();
    for target in extract_targets(&content) {
        let Some(path) = resolve_target(&target, file_path, aliases, config) else {
            log::trace!("Skipping import target: {}", target);
            continue;
        };
        if visited.contains(&path) {
            log::trace!("Import already visited: {}", path.display());
            continue;
        }
        if !resolved.insert(path.clone()) {
            log::trace!("Duplicate import dropped: {}", path.display());
        }
    }

    log::debug!(
        "Resolved {} import(s) from {}",
        resolved.len(),
        file_path.display()
    );
    resolved.into_iter().collect()
}

/// Extract raw import/require target strings in source order.
fn extract_targets(content: &str) -> Vec<String> {
    let mut targets: Vec<(usize, String)> = ES_IMPORT_RE
        .captures_iter(content)
        .chain(CJS_REQUIRE_RE.captures_iter(content))
        .filter_map(|caps| {
            let m = caps.get(1)?;
            Some((m.start(), m.as_str().to_string()))
        })
        .collect();
    targets.sort_by_key(|(pos, _)| *pos);
    targets.into_iter().map(|(_, target)| target).collect()
}

fn resolve_target(
    target: &str,
    importing_file: &Path,
    aliases: &AliasMap,
    config: &Config,
) -> Option<PathBuf> {
    let candidate = if target.starts_with("./") || target.starts_with("../") {
        importing_file.parent()?.join(target)
    } else {
        // No relative marker: alias or third-party package.
        aliases.resolve(target)?
    };

    probe_existing(&candidate, config).and_then(|path| fs::canonicalize(path).ok())
}

/// Find an existing file for a resolved candidate path.
///
/// A candidate with no extension is probed against the supported
/// extensions in configuration order, then as a directory with an
/// `index.<ext>` entry (JS ecosystem convention).
fn probe_existing(candidate: &Path, config: &Config) -> Option<PathBuf> {
    if candidate.is_file() {
        return Some(candidate.to_path_buf());
    }
    if candidate.extension().is_some() {
        return None;
    }

    let name = candidate.file_name()?.to_string_lossy().to_string();
    for ext in &config.supported_extensions {
        let with_ext = candidate.with_file_name(format!("{}{}", name, ext));
        if with_ext.is_file() {
            return Some(with_ext);
        }
    }
    for ext in &config.supported_extensions {
        let index_file = candidate.join(format!("index{}", ext));
        if index_file.is_file() {
            return Some(index_file);
        }
    }
    None
}
