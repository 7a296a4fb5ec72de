pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;
use tracing::debug;

/// Load a typed input document from `--input <file>` or piped stdin.
///
/// Returns `None` when neither source is present so the caller can fall
/// back to individual flags.
pub fn read_document<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        debug!(path, "reading input file");
        return file::read_json(path).map(Some);
    }
    let piped = stdin::read_stdin()?;
    if piped.is_some() {
        debug!("reading input from stdin");
    }
    Ok(piped)
}
