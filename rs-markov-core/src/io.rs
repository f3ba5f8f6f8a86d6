use std::fs;
use std::path::Path;

use crate::error::{MarkovError, Result};

/// Reads a whole text file into memory.
///
/// - Invalid UTF-8 sequences are replaced, they end up as token separators
/// - Read failures carry the offending path
pub(crate) fn read_text<P: AsRef<Path>>(filename: P) -> Result<String> {
	let path = filename.as_ref();
	let bytes = fs::read(path).map_err(|source| MarkovError::Io { path: path.to_path_buf(), source })?;
	Ok(String::from_utf8_lossy(&bytes).into_owned())
}
