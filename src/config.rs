//! Command-line configuration.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing::Level;

use crate::api::DEFAULT_BASE_URL;

/// Log file used when `--log-file` is not given; the terminal is busy drawing.
pub const DEFAULT_LOG_FILE: &str = "covid-dash.log";

/// Terminal COVID-19 dashboard
#[derive(Debug, Parser)]
#[command(name = "covid-dash", version, about)]
pub struct Args {
    /// Base URL of the aggregation API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory holding Natural Earth GeoJSON outlines
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Write logs here instead of ./covid-dash.log
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["covid-dash"]).unwrap();
        assert_eq!(args.base_url, DEFAULT_BASE_URL);
        assert_eq!(args.data_dir, PathBuf::from("data"));
        assert_eq!(args.log_path(), PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(args.log_level(), Level::INFO);
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "covid-dash",
            "--base-url",
            "http://localhost:3000/v3/covid-19",
            "--log-file",
            "/tmp/dash.log",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.base_url, "http://localhost:3000/v3/covid-19");
        assert_eq!(args.log_path(), PathBuf::from("/tmp/dash.log"));
        assert_eq!(args.log_level(), Level::TRACE);
    }
}
