pub mod assess;
pub mod codes;
pub mod parse;
pub mod score;
pub mod tables;
pub mod validate;

use obdscan_core::error::ObdError;
use obdscan_core::tables::{load_fault_registry, load_range_table, Tables};
use std::path::PathBuf;

/// Built-in tables, with either one replaced by a file when given.
pub fn load_tables(ranges: Option<PathBuf>, codes: Option<PathBuf>) -> Result<Tables, ObdError> {
    let mut loaded = Tables::builtin()?;
    if let Some(path) = ranges {
        tracing::info!(path = %path.display(), "using custom range table");
        loaded.ranges = load_range_table(&path)?;
    }
    if let Some(path) = codes {
        tracing::info!(path = %path.display(), "using custom fault code registry");
        loaded.registry = load_fault_registry(&path)?;
    }
    Ok(loaded)
}
