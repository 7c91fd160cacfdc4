//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ClassLens - literacy class-profile analyzer
///
/// Fetches a class roster and curriculum profile from a REST endpoint
/// and derives the student performance metrics shown in the class views:
/// overall progress, overall competence, completion counts, and strand
/// cohorts.
///
/// Examples:
///   classlens overview
///   classlens students --search ann
///   classlens student ann-003
///   classlens strand "Letter Naming"
///   classlens report --output class_report.md
///   classlens --base-url http://172.20.10.9:3000 analytics
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Base URL of the class profile API
    ///
    /// Defaults to the config file value or http://localhost:3000.
    #[arg(short, long, value_name = "URL", env = "CLASSLENS_API_URL")]
    pub base_url: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .classlens.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output file path for exported reports
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format for the class report (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands: each one renders a view over the fetched snapshot.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Class overview: mastery key, strand coverage, and cohort sizes
    Overview,
    /// List the roster with per-student derived metrics
    Students {
        /// Filter by case-insensitive substring of name or id
        #[arg(long, value_name = "QUERY")]
        search: Option<String>,
    },
    /// Show one student's detailed strand performance
    Student {
        /// Student id, e.g. ann-003
        id: String,
    },
    /// List the students assessed for one strand
    Strand {
        /// Strand display name, e.g. "Letter Naming"
        name: String,
    },
    /// Class-level analytics across all strands
    Analytics,
    /// Export a class report, or a single student's text report
    Report {
        /// Export the text performance report for one student instead
        #[arg(long, value_name = "ID")]
        student: Option<String>,
    },
    /// Generate a default .classlens.toml configuration file
    InitConfig,
}

/// Output format for the exported class report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref base_url) = self.base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err("Base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            base_url: Some("http://localhost:3000".to_string()),
            config: None,
            timeout: None,
            output: None,
            format: OutputFormat::Markdown,
            verbose: false,
            quiet: false,
            command: Command::Overview,
        }
    }

    #[test]
    fn test_validation_accepts_defaults() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.base_url = Some("localhost:3000".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_subcommand_parsing() {
        let args = Args::try_parse_from(["classlens", "students", "--search", "ann"]).unwrap();
        match args.command {
            Command::Students { search } => assert_eq!(search.as_deref(), Some("ann")),
            other => panic!("unexpected command: {:?}", other),
        }

        let args = Args::try_parse_from(["classlens", "report", "--student", "ann-003"]).unwrap();
        match args.command {
            Command::Report { student } => assert_eq!(student.as_deref(), Some("ann-003")),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
