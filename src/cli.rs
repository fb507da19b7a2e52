//! CLI argument definitions using clap derive macros.

use clap::Parser;
use std::path::PathBuf;

/// Fetch a remote file into a local directory.
///
/// Prints a JSON envelope `{"success": bool, "data": {...}}` on stdout.
/// Logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "puller")]
#[command(author, version, about)]
pub struct Args {
    /// URL of the file to fetch
    #[arg(required_unless_present = "list")]
    pub url: Option<String>,

    /// Destination: an absolute directory, `custom`, or empty for the backup directory
    #[arg(short, long, default_value = "")]
    pub directory: String,

    /// Path relative to the application root, used with `--directory custom`
    #[arg(short = 'p', long)]
    pub custom_path: Option<String>,

    /// Application root custom paths are joined to
    #[arg(long, env = "PULLER_ROOT")]
    pub root: Option<PathBuf>,

    /// Directory used when no destination is given
    #[arg(long, env = "PULLER_BACKUP_DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Total request timeout in seconds
    #[arg(long, env = "PULLER_TIMEOUT", default_value_t = 300)]
    pub timeout: u64,

    /// Maximum redirects followed
    #[arg(long, env = "PULLER_MAX_REDIRECTS", default_value_t = 5)]
    pub max_redirects: usize,

    /// Site URL appended to the User-Agent
    #[arg(long, env = "PULLER_SITE_URL")]
    pub site_url: Option<String>,

    /// Host exempt from the non-routable address filter (repeatable)
    #[arg(long = "trust-host")]
    pub trusted_hosts: Vec<String>,

    /// List the existing candidate destinations and exit
    #[arg(long)]
    pub list: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
