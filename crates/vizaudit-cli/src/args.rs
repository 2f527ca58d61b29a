//! Command-line argument definitions for the vizaudit CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. `-h` selects the hostname, so help is only available as
//! `--help`.

use clap::{ArgAction, Parser};

/// Find visualization objects comparing a static date range against the
/// previous period
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, disable_help_flag = true)]
pub struct Args {
    /// GoodData hostname [default: from config, else secure.gooddata.com]
    #[arg(short = 'h', long)]
    pub hostname: Option<String>,

    /// Login name
    #[arg(short, long)]
    pub user: String,

    /// Password
    #[arg(short, long)]
    pub password: String,

    /// File with one project identifier per line
    #[arg(short, long)]
    pub input: String,

    /// File the matching visualization object URIs are written to
    #[arg(short, long)]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}
