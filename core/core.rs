pub mod aliases;
pub mod collect;
pub mod config;
pub mod error;
pub mod flatten;
pub mod imports;

pub use aliases::{AliasMap, resolve_aliases};
pub use collect::{FileSet, collect_files};
pub use config::{CONFIG_FILENAME, Config, DEFAULT_OUTPUT_DIR, LoggingConfig, MARKER_DIR};
pub use error::{AppError, Result};
pub use flatten::{FileRecord, flatten_files, render_document};
pub use imports::{is_import_capable, parse_imports};
