//! Reading records from files or stdin

use crate::error::{Error, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

const STDIN: &str = "<stdin>";

/// Where records are read from
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    /// `None` and `-` both mean stdin
    pub fn from_arg(path: Option<&Path>) -> Self {
        match path {
            Some(path) if path != Path::new("-") => Input::File(path.to_path_buf()),
            _ => Input::Stdin,
        }
    }

    /// Path used in messages
    pub fn display_path(&self) -> PathBuf {
        match self {
            Input::Stdin => PathBuf::from(STDIN),
            Input::File(path) => path.clone(),
        }
    }

    pub fn is_yaml(&self) -> bool {
        match self {
            Input::Stdin => false,
            Input::File(path) => matches!(
                path.extension().and_then(|s| s.to_str()),
                Some("yaml") | Some("yml")
            ),
        }
    }

    fn open(&self) -> Result<Box<dyn BufRead>> {
        match self {
            Input::Stdin => Ok(Box::new(BufReader::new(io::stdin()))),
            Input::File(path) => {
                if !path.exists() {
                    return Err(Error::FileNotFound { path: path.clone() });
                }
                Ok(Box::new(BufReader::new(File::open(path)?)))
            }
        }
    }

    /// Read one JSON or YAML document
    pub fn read_document(&self) -> Result<Value> {
        let mut content = String::new();
        self.open()?.read_to_string(&mut content)?;

        let (parsed, expected) = if self.is_yaml() {
            (serde_yaml::from_str(&content).map_err(|e| e.to_string()), "YAML")
        } else {
            (serde_json::from_str(&content).map_err(|e| e.to_string()), "JSON")
        };

        parsed.map_err(|e| {
            tracing::debug!(error = %e, "Failed to parse input");
            Error::InvalidFormat {
                path: self.display_path(),
                expected: format!("{} ({})", expected, e),
            }
        })
    }

    /// Read JSON Lines lazily, one value per non-blank line
    pub fn read_lines(&self) -> Result<JsonLines<Box<dyn BufRead>>> {
        Ok(JsonLines::new(self.open()?, self.display_path()))
    }
}

/// Iterator over the values of a JSON Lines stream
pub struct JsonLines<R> {
    lines: io::Lines<R>,
    source: PathBuf,
    line_no: usize,
}

impl<R: BufRead> JsonLines<R> {
    pub fn new(reader: R, source: PathBuf) -> Self {
        Self {
            lines: reader.lines(),
            source,
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for JsonLines<R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(serde_json::from_str(&line).map_err(|e| Error::InvalidFormat {
                path: self.source.clone(),
                expected: format!("JSON Lines (line {}: {})", self.line_no, e),
            }));
        }
    }
}
