use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Search a practice-management account for every name on a list and
/// write one HTML conflict report.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File with one search term per line (reads stdin when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub terms: Option<PathBuf>,

    /// Captured results script to sweep against
    #[arg(short, long, value_name = "FILE")]
    pub replay: PathBuf,

    /// RON file overriding waits, limits and the link base address
    #[arg(short, long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Directory the report and its manifest are written to
    #[arg(short, long, value_name = "DIR", default_value = "output")]
    pub output: PathBuf,

    /// Open the finished report in the system viewer
    #[arg(long)]
    pub open: bool,

    /// Where log lines go
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogDestination {
    /// Write to stderr.
    Terminal,
    /// Write to ./sweep.log in the current directory.
    File,
    /// Write to both.
    Both,
}
