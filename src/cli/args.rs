use crate::domain::config::{DEFAULT_LIBRARY_NAME, DEFAULT_OUTPUT_PATH};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Command line arguments for splist
#[derive(Parser, Debug)]
#[command(
    name = "splist",
    version = env!("CARGO_PKG_VERSION"),
    about = "List the files of a SharePoint document library as JSON",
    long_about = "Authenticates with the client-credentials flow (TENANT_ID, CLIENT_ID and CLIENT_SECRET \
                  environment variables), lists every item of a SharePoint document library through \
                  Microsoft Graph and writes {\"files\": [{\"name\", \"url\"}]} to a JSON file."
)]
pub struct Args {
    /// SharePoint site URL, e.g. https://contoso.sharepoint.com/sites/team
    #[arg(long)]
    pub site_url: String,

    /// Document library display name
    #[arg(long, default_value = DEFAULT_LIBRARY_NAME)]
    pub library_name: String,

    /// Output JSON file
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Also list the contents of every folder
    #[arg(short, long)]
    pub recursive: bool,

    /// Write single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Settings file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Console summary format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// Table output
    Table,
}
