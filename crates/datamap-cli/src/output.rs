//! Output formatting and writing utilities
//!
//! Mapped data goes to stdout (or a `--save-to` file) as JSON, pretty JSON
//! or YAML. Status messages go to stderr so they never mix with the data.

use crate::cli::OutputFormat;
use crate::error::{ErrorContext, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, trace};

/// Renders serializable values in an output format
pub trait OutputFormatter {
    /// Format a whole document
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format one item of a stream, so that items can be concatenated
    fn format_item<T: Serialize>(&self, value: &T) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string(value)?)),
            OutputFormat::JsonPretty => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }

    fn format_item<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Yaml => Ok(format!("---\n{}", serde_yaml::to_string(value)?)),
            _ => self.format(value),
        }
    }
}

/// Output writer that handles data formats and status messages
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a writer targeting stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Redirect data to a file, keeping format and message settings
    pub fn to_file(self, path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path).with_context(|| format!("Creating {}", path.display()))?;
        debug!(path = %path.display(), "Writing output to file");
        Ok(Self::with_writer(
            self.format,
            self.use_color,
            self.quiet,
            Box::new(BufWriter::new(file)),
        ))
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        self.writer.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write a whole document in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Writing document");
        self.write(&formatted)?;
        self.flush()
    }

    /// Write one item of a stream in the configured format
    pub fn item<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format_item(value)?;
        self.write(&formatted)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message to stderr
    pub fn info(&self, message: &str) {
        debug!("Output info: {}", message);
        if self.quiet {
            return;
        }
        if self.use_color {
            eprintln!("{} {}", "ℹ".blue(), message);
        } else {
            eprintln!("INFO: {}", message);
        }
    }

    /// Write a success message to stderr
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.use_color {
            eprintln!("{}", message.green());
        } else {
            eprintln!("{}", message);
        }
    }

    /// Write a warning to stderr, even in quiet mode
    pub fn warning(&self, message: &str) {
        if self.use_color {
            eprintln!("{}", message.yellow());
        } else {
            eprintln!("WARNING: {}", message);
        }
    }

    /// Write a table of rows
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        let mut widths = headers.iter().map(|h| h.len()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let render = |cells: Vec<String>| {
            cells
                .iter()
                .enumerate()
                .map(|(i, cell)| format!("{:width$}", cell, width = widths.get(i).copied().unwrap_or(0)))
                .collect::<Vec<_>>()
                .join(" │ ")
                .trim_end()
                .to_string()
        };

        let header_row = render(headers.iter().map(|h| h.to_string()).collect());
        let header_row = if self.use_color {
            header_row.bold().to_string()
        } else {
            header_row
        };
        let separator = widths.iter().map(|w| "─".repeat(*w)).collect::<Vec<_>>().join("─┼─");

        let mut out = format!("{}\n{}\n", header_row, separator);
        for row in rows {
            out.push_str(&render(row));
            out.push('\n');
        }
        self.write(&out)?;
        self.flush()
    }
}
