use indexmap::IndexMap;
use log;
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered mapping from alias prefix (e.g. `@`) to a base directory.
///
/// Built once per flatten operation from the configured manifest files
/// (tsconfig.json / jsconfig.json style) and read-only afterwards.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AliasMap {
    entries: IndexMap<String, PathBuf>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, prefix: String, base_dir: PathBuf) {
        self.entries.insert(prefix, base_dir);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, prefix: &str) -> Option<&PathBuf> {
        self.entries.get(prefix)
    }

    /// Resolve an import target against the registered aliases.
    ///
    /// The longest matching prefix wins, so `@components` beats `@` for a
    /// target like `@components/Button`. Returns the substituted path.
    pub fn resolve(&self, target: &str) -> Option<PathBuf> {
        let (prefix, base_dir) = self
            .entries
            .iter()
            .filter(|(prefix, _)| target.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())?;

        let remainder = target[prefix.len()..].trim_start_matches('/');
        if remainder.is_empty() {
            Some(base_dir.clone())
        } else {
            Some(base_dir.join(remainder))
        }
    }
}

/// Build an [`AliasMap`] from zero or more manifest files.
///
/// Manifests are processed in input order; later entries may overwrite an
/// earlier prefix's target. Missing or malformed manifests contribute no
/// aliases and never fail the operation.
pub fn resolve_aliases(project_root: &Path, manifest_paths: &[PathBuf]) -> AliasMap {
    let mut aliases = AliasMap::new();

    for manifest_rel in manifest_paths {
        let manifest_path = if manifest_rel.is_absolute() {
            manifest_rel.clone()
        } else {
            project_root.join(manifest_rel)
        };
        if !manifest_path.is_file() {
            log::debug!("Alias manifest not found: {}", manifest_path.display());
            continue;
        }

        let content = match fs::read_to_string(&manifest_path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!(
                    "Failed to read alias manifest '{}': {}. Skipping.",
                    manifest_path.display(),
                    e
                );
                continue;
            }
        };

        // tsconfig files commonly carry // and /* */ comments
        let stripped = strip_jsonc_comments(&content);
        let value: serde_json::Value = match serde_json::from_str(&stripped) {
            Ok(v) => v,
            Err(e) => {
                log::warn!(
                    "Failed to parse alias manifest '{}': {}. Skipping.",
                    manifest_path.display(),
                    e
                );
                continue;
            }
        };

        register_manifest_aliases(&manifest_path, &value, &mut aliases);
    }

    log::debug!("Resolved {} alias(es).", aliases.len());
    aliases
}

fn register_manifest_aliases(
    manifest_path: &Path,
    value: &serde_json::Value,
    aliases: &mut AliasMap,
) {
    let Some(compiler) = value.get("compilerOptions") else {
        log::debug!(
            "No compilerOptions in manifest: {}",
            manifest_path.display()
        );
        return;
    };
    let Some(manifest_dir) = manifest_path.parent() else {
        return;
    };

    let base_url = compiler
        .get("baseUrl")
        .and_then(serde_json::Value::as_str)
        .unwrap_or(".");

    let Some(paths) = compiler.get("paths").and_then(serde_json::Value::as_object) else {
        return;
    };

    for (pattern, targets) in paths {
        // A pattern mapping to multiple targets uses only the first one.
        let Some(first_target) = targets
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(serde_json::Value::as_str)
        else {
            log::debug!(
                "Skipping alias pattern '{}' with no usable target in {}",
                pattern,
                manifest_path.display()
            );
            continue;
        };

        let prefix = strip_wildcard(pattern);
        let target = strip_wildcard(first_target);
        let mut base_dir = manifest_dir.join(base_url);
        if !target.is_empty() {
            base_dir.push(target);
        }

        log::trace!("Registered alias '{}' -> {}", prefix, base_dir.display());
        aliases.insert(prefix.to_string(), base_dir);
    }
}

fn strip_wildcard(pattern: &str) -> &str {
    pattern
        .strip_suffix("/*")
        .or_else(|| pattern.strip_suffix('*'))
        .unwrap_or(pattern)
        .trim_end_matches('/')
}

/// Strip JSONC comments (`//` line and `/* */` block) while respecting strings.
fn strip_jsonc_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    while i < len {
        let ch = bytes[i];

        if ch == b'"' {
            out.push('"');
            i += 1;
            while i < len {
                let c = bytes[i];
                out.push(c as char);
                i += 1;
                if c == b'\\' && i < len {
                    out.push(bytes[i] as char);
                    i += 1;
                } else if c == b'"' {
                    break;
                }
            }
            continue;
        }

        if ch == b'/' && i + 1 < len && bytes[i + 1] == b'/' {
            while i < len && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }

        if ch == b'/' && i + 1 < len && bytes[i + 1] == b'*' {
            i += 2;
            while i + 1 < len && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                i += 1;
            }
            if i + 1 < len {
                i += 2;
            }
            continue;
        }

        out.push(ch as char);
        i += 1;
    }

    out
}
