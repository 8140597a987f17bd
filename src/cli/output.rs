use crate::cli::args::OutputFormat;
use crate::domain::model::{FileRecord, OutputDocument};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use tabled::{Table, Tabled};

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_summary(&mut self, summary: &RunSummary<'_>) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// What a successful run produced
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub library: &'a str,
    pub output: &'a Path,
    pub count: usize,
    pub files: &'a [FileRecord],
}

impl<'a> RunSummary<'a> {
    pub fn new(library: &'a str, output: &'a Path, document: &'a OutputDocument) -> Self {
        Self {
            library,
            output,
            count: document.len(),
            files: &document.files,
        }
    }
}

#[derive(Tabled)]
struct FileTableRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
}

/// Console output writer
pub struct ConsoleWriter<W: Write> {
    format: OutputFormat,
    out: W,
}

impl ConsoleWriter<io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, io::stdout())
    }
}

impl<W: Write> ConsoleWriter<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self { format, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputWriter for ConsoleWriter<W> {
    fn write_summary(&mut self, summary: &RunSummary<'_>) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                writeln!(
                    self.out,
                    "Listed {} file(s) from '{}' into {}",
                    summary.count,
                    summary.library,
                    summary.output.display()
                )?;
            }
            OutputFormat::Json => {
                let output = serde_json::to_string_pretty(summary)?;
                writeln!(self.out, "{}", output)?;
            }
            OutputFormat::Table => {
                if !summary.files.is_empty() {
                    let rows = summary.files.iter().map(|f| FileTableRow {
                        name: f.name.clone(),
                        url: f.url.clone(),
                    });
                    writeln!(self.out, "{}", Table::new(rows))?;
                }
                writeln!(self.out, "{} file(s) written to {}", summary.count, summary.output.display())?;
            }
        }
        Ok(())
    }
}
