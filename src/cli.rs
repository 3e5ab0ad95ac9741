use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vulnharvest::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "vulnharvest",
    version,
    about = "Harvests structured security findings from reports, sources, and tools"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run all enabled plugins against a target path
    Scan {
        /// Path to the target file or directory
        path: PathBuf,

        /// Output format
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Write output to file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Run only the named plugins (repeatable)
        #[arg(long, short)]
        plugin: Vec<String>,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Parse a single extracted-text report file into a structured report
    #[command(name = "parse-report")]
    ParseReport {
        /// Path to the report text file
        file: PathBuf,

        /// Write output to file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List all registered plugins with descriptions
    ListPlugins,

    /// Check which external tools are available
    CheckTools,
}
