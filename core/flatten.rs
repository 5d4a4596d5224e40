use crate::aliases::{self, AliasMap};
use crate::collect::{self, FileSet};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::imports;
use indexmap::IndexSet;
use log;
use std::fs;
use std::path::{Path, PathBuf};

/// One section of the output document: a file path and its raw text.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub content: String,
}

/// Flatten the given inputs into a single output document on disk.
///
/// Returns the path of the written output file. Seed files appear in
/// discovery order, each immediately followed by its one-hop imports when
/// `with_imports` is set. A single shared visited set means a dependency
/// reached by two seeds is attached to whichever seed reaches it first.
pub fn flatten_files(
    project_root: &Path,
    inputs: &[String],
    output_name: Option<&str>,
    recursive: bool,
    with_imports: bool,
    config: &Config,
) -> Result<PathBuf> {
    let seeds: FileSet = collect::collect_files(inputs, config, recursive)?;
    if seeds.is_empty() {
        return Err(AppError::NoFilesMatched);
    }

    let alias_map = if with_imports {
        aliases::resolve_aliases(project_root, &config.alias_manifests)
    } else {
        AliasMap::new()
    };

    let mut visited: IndexSet<PathBuf> = IndexSet::new();
    let mut document: Vec<FileRecord> = Vec::new();

    for seed in &seeds {
        if visited.contains(seed) {
            log::trace!("Seed already included via an earlier import: {}", seed.display());
            continue;
        }
        append_record(seed, &mut visited, &mut document);

        if with_imports && imports::is_import_capable(seed) {
            for dep in imports::parse_imports(seed, &alias_map, &visited, config) {
                // One hop only: imported files are never themselves scanned.
                append_record(&dep, &mut visited, &mut document);
            }
        }
    }

    let rendered = render_document(&document, config.line_limit);
    let output_path = resolve_output_path(project_root, output_name, config);
    write_output(&output_path, &rendered)?;

    log::info!(
        "Flattened {} file(s) into {}",
        document.len(),
        output_path.display()
    );
    Ok(output_path)
}

fn append_record(path: &Path, visited: &mut IndexSet<PathBuf>, document: &mut Vec<FileRecord>) {
    if !visited.insert(path.to_path_buf()) {
        return;
    }
    match fs::read_to_string(path) {
        Ok(content) => document.push(FileRecord {
            path: path.to_path_buf(),
            content,
        }),
        Err(e) => {
            // Unreadable or non-UTF-8 individual files never abort the batch.
            log::warn!("Failed to read '{}': {}. Skipping.", path.display(), e);
        }
    }
}

/// Render the ordered records: a path header, the file's text (truncated
/// to `line_limit` lines with a marker when exceeded), a blank separator.
pub fn render_document(document: &[FileRecord], line_limit: usize) -> String {
    let mut out = String::new();
    for record in document {
        out.push_str("# File path: ");
        out.push_str(&record.path.display().to_string());
        out.push('\n');

        let total_lines = record.content.lines().count();
        if line_limit > 0 && total_lines > line_limit {
            for line in record.content.lines().take(line_limit) {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(&format!(
                "... [truncated: showing {} of {} lines]\n",
                line_limit, total_lines
            ));
        } else {
            out.push_str(&record.content);
            if !record.content.is_empty() && !record.content.ends_with('\n') {
                out.push('\n');
            }
        }
        out.push('\n');
    }
    out
}

/// Determine the final output path.
///
/// A bare `-o NAME` lands under the configured output directory; a name
/// containing a path separator (or an absolute path) is used as given.
fn resolve_output_path(project_root: &Path, output_name: Option<&str>, config: &Config) -> PathBuf {
    let output_dir = if config.output_dir.is_absolute() {
        config.output_dir.clone()
    } else {
        project_root.join(&config.output_dir)
    };

    match output_name {
        Some(name) => {
            let name_path = PathBuf::from(name);
            if name_path.is_absolute() || name_path.components().count() > 1 {
                name_path
            } else {
                output_dir.join(name)
            }
        }
        None => output_dir.join(config.default_output_name(project_root)),
    }
}

/// Write the full content to a sibling temp file, then rename into place,
/// so a failure mid-write never leaves a partial output behind.
fn write_output(output_path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(|e| AppError::DirCreation {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let tmp_path = output_path.with_extension("tmp");
    fs::write(&tmp_path, content).map_err(|e| AppError::FileWrite {
        path: tmp_path.clone(),
        source: e,
    })?;
    fs::rename(&tmp_path, output_path).map_err(|e| AppError::FileWrite {
        path: output_path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn header_count(content: &str) -> usize {
        content
            .lines()
            .filter(|l| l.starts_with("# File path: "))
            .count()
    }

    fn header_position(content: &str, path: &Path) -> usize {
        content
            .find(&format!("# File path: {}", path.display()))
            .unwrap_or_else(|| panic!("no header for {}", path.display()))
    }

    #[test]
    fn single_file_without_imports_yields_one_section() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("test.js");
        write(&file, r#"import dep from "./dep.js";\nconsole.log("test");"#);
        write(&dir.path().join("dep.js"), "export default 1;");

        let output = flatten_files(
            dir.path(),
            &[file.to_string_lossy().to_string()],
            None,
            false,
            false,
            &Config::default(),
        )
        .unwrap();

        let content = fs::read_to_string(output).unwrap();
        assert_eq!(header_count(&content), 1);
    }

    #[test]
    fn with_imports_includes_one_hop_dependency_after_seed() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("test.js");
        let dep = dir.path().join("dep.js");
        write(&seed, "import dep from \"./dep.js\";\nconsole.log(\"test\");");
        write(&dep, "export default function dep() {}");

        let output = flatten_files(
            dir.path(),
            &[seed.to_string_lossy().to_string()],
            None,
            false,
            true,
            &Config::default(),
        )
        .unwrap();

        let content = fs::read_to_string(output).unwrap();
        assert_eq!(header_count(&content), 2);
        assert!(content.contains("console.log(\"test\");"));
        assert!(content.contains("export default function dep() {}"));
        let seed_canon = fs::canonicalize(&seed).unwrap();
        let dep_canon = fs::canonicalize(&dep).unwrap();
        assert!(header_position(&content, &seed_canon) < header_position(&content, &dep_canon));
    }

    #[test]
    fn transitive_imports_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.js");
        let b = dir.path().join("b.js");
        let c = dir.path().join("c.js");
        write(&a, "import b from \"./b.js\";");
        write(&b, "import c from \"./c.js\";");
        write(&c, "export default 3;");

        let output = flatten_files(
            dir.path(),
            &[a.to_string_lossy().to_string()],
            None,
            false,
            true,
            &Config::default(),
        )
        .unwrap();

        let content = fs::read_to_string(output).unwrap();
        assert_eq!(header_count(&content), 2);
        let c_canon = fs::canonicalize(&c).unwrap();
        assert!(!content.contains(&format!("# File path: {}", c_canon.display())));
    }

    #[test]
    fn shared_dependency_attaches_to_first_seed() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.js");
        let b = dir.path().join("b.js");
        let shared = dir.path().join("shared.js");
        write(&a, "import s from \"./shared.js\";");
        write(&b, "import s from \"./shared.js\";");
        write(&shared, "export default 0;");

        let output = flatten_files(
            dir.path(),
            &[
                a.to_string_lossy().to_string(),
                b.to_string_lossy().to_string(),
            ],
            None,
            false,
            true,
            &Config::default(),
        )
        .unwrap();

        let content = fs::read_to_string(output).unwrap();
        assert_eq!(header_count(&content), 3);
        let a_pos = header_position(&content, &fs::canonicalize(&a).unwrap());
        let s_pos = header_position(&content, &fs::canonicalize(&shared).unwrap());
        let b_pos = header_position(&content, &fs::canonicalize(&b).unwrap());
        assert!(a_pos < s_pos && s_pos < b_pos);
    }

    #[test]
    fn empty_collection_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = flatten_files(
            dir.path(),
            &["nothing-here/*.js".to_string()],
            None,
            false,
            false,
            &Config::default(),
        );
        assert!(matches!(result, Err(AppError::NoFilesMatched)));
    }

    #[test]
    fn default_output_path_uses_project_name_and_format() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.js");
        write(&file, "let a = 1;");

        let output = flatten_files(
            dir.path(),
            &[file.to_string_lossy().to_string()],
            None,
            false,
            false,
            &Config::default(),
        )
        .unwrap();

        let project = Config::project_name(dir.path());
        assert!(output.ends_with(
            PathBuf::from(".flatten/output").join(format!("{}_flattened.txt", project))
        ));
        assert!(output.is_file());
    }

    #[test]
    fn bare_output_name_lands_under_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.js");
        write(&file, "let a = 1;");

        let output = flatten_files(
            dir.path(),
            &[file.to_string_lossy().to_string()],
            Some("docs.md"),
            false,
            false,
            &Config::default(),
        )
        .unwrap();

        assert_eq!(
            output,
            dir.path().join(".flatten/output").join("docs.md")
        );
    }

    #[test]
    fn truncation_marker_appended_past_line_limit() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("big.js");
        let body: String = (0..20).map(|i| format!("let x{} = {};\n", i, i)).collect();
        write(&file, &body);

        let config = Config {
            line_limit: 5,
            ..Config::default()
        };
        let output = flatten_files(
            dir.path(),
            &[file.to_string_lossy().to_string()],
            None,
            false,
            false,
            &config,
        )
        .unwrap();

        let content = fs::read_to_string(output).unwrap();
        assert!(content.contains("... [truncated: showing 5 of 20 lines]"));
        assert!(content.contains("let x4 = 4;"));
        assert!(!content.contains("let x5 = 5;"));
    }

    #[test]
    fn rerun_replaces_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.js");
        write(&file, "first version");

        let inputs = [file.to_string_lossy().to_string()];
        let config = Config::default();
        let first = flatten_files(dir.path(), &inputs, None, false, false, &config).unwrap();

        write(&file, "second version");
        let second = flatten_files(dir.path(), &inputs, None, false, false, &config).unwrap();

        assert_eq!(first, second);
        let content = fs::read_to_string(second).unwrap();
        assert!(content.contains("second version"));
        assert!(!content.contains("first version"));
    }

    #[test]
    fn every_header_matches_a_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.js");
        let b = dir.path().join("b.py");
        write(&a, "let a = 1;");
        write(&b, "b = 2");

        let output = flatten_files(
            dir.path(),
            &[
                a.to_string_lossy().to_string(),
                b.to_string_lossy().to_string(),
            ],
            None,
            false,
            false,
            &Config::default(),
        )
        .unwrap();

        let content = fs::read_to_string(output).unwrap();
        for line in content.lines().filter(|l| l.starts_with("# File path: ")) {
            let path = PathBuf::from(line.trim_start_matches("# File path: "));
            assert!(path.is_file(), "header path does not exist: {}", path.display());
        }
        assert_eq!(header_count(&content), 2);
    }
}
