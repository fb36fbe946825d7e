//! CI step outputs in the `$GITHUB_OUTPUT` format.
//!
//! Single-line values are written as `key=value`; multi-line values use the
//! heredoc form `key<<DELIM` ... `DELIM`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::OutputError;

const HEREDOC_DELIMITER: &str = "ROLE_RELEASE_EOF";

/// Where outputs are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// Append to the file named by `$GITHUB_OUTPUT`.
    GithubOutput(PathBuf),
    /// Print to stdout (local runs and dry runs).
    Stdout,
}

impl OutputSink {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) if !p.as_os_str().is_empty() => OutputSink::GithubOutput(p),
            _ => OutputSink::Stdout,
        }
    }

    /// Write all `(key, value)` pairs in order.
    pub fn write_all(&self, outputs: &[(&str, String)]) -> Result<(), OutputError> {
        let mut rendered = String::new();
        for (key, value) in outputs {
            rendered.push_str(&format_output(key, value)?);
        }

        match self {
            OutputSink::GithubOutput(path) => append_to(path, &rendered),
            OutputSink::Stdout => {
                print!("{}", rendered);
                Ok(())
            }
        }
    }
}

fn append_to(path: &Path, rendered: &str) -> Result<(), OutputError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| OutputError::OpenFailed {
            path: path.display().to_string(),
            source,
        })?;
    file.write_all(rendered.as_bytes())
        .map_err(OutputError::WriteFailed)
}

/// Render one output entry, newline-terminated.
pub fn format_output(key: &str, value: &str) -> Result<String, OutputError> {
    if key.is_empty() || key.contains('=') || key.contains('\n') || key.contains('<') {
        return Err(OutputError::InvalidKey(key.to_string()));
    }

    if !value.contains('\n') && !value.contains('\r') {
        return Ok(format!("{}={}\n", key, value));
    }

    let delimiter = heredoc_delimiter(value);
    Ok(format!("{}<<{}\n{}\n{}\n", key, delimiter, value, delimiter))
}

/// A delimiter that does not occur as a line of `value`.
fn heredoc_delimiter(value: &str) -> String {
    let mut delimiter = HEREDOC_DELIMITER.to_string();
    let mut n = 0;
    while value.lines().any(|line| line.trim_end() == delimiter) {
        n += 1;
        delimiter = format!("{}_{}", HEREDOC_DELIMITER, n);
    }
    delimiter
}
