//! JSON I/O handling for CLI
//!
//! - Input: JSON-lines data files
//! - Output: one JSON value per line on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON-lines file; blank lines are skipped.
pub fn read_documents(path: &Path) -> CliResult<Vec<Value>> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .map_err(|e| CliError::input_error(format!("line {}: {}", n + 1, e)))
        })
        .collect()
}

/// Write each value as one line to stdout
pub fn write_lines(values: &[Value]) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for value in values {
        serde_json::to_writer(&mut out, value)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Write a single JSON value to stdout
pub fn write_json(value: &Value) -> CliResult<()> {
    write_lines(std::slice::from_ref(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_documents_skips_blank_lines() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "{\"a\":1}\n\n{\"a\":2}\n").unwrap();

        let docs = read_documents(file.path()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1]["a"], 2);
    }

    #[test]
    fn test_read_documents_reports_line() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "{\"a\":1}\nnot json\n").unwrap();

        let err = read_documents(file.path()).unwrap_err();
        assert!(err.message().starts_with("line 2"));
    }
}
