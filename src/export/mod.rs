//! Result-set persistence.
//!
//! The accumulated result set is written as one pretty-printed JSON
//! document (`{"call": [...], "stream": [...]}`), UTF-8 with non-ASCII
//! characters left unescaped, fully rewritten on every save.

use std::error::Error;
use std::fs;
use std::path::Path;

use crate::runner::ResultSet;

/// Writes `results` to `path`, replacing any previous contents.
pub fn save_results(results: &ResultSet, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(results)?;
    fs::write(path, json)?;
    log::info!("Results written to {}", path.display());
    println!("\nTest results saved to: {}", path.display());
    Ok(())
}

/// Reads a result set previously written by [`save_results`].
pub fn load_results(path: &Path) -> Result<ResultSet, Box<dyn Error>> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
