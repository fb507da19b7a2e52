//! CLI entry point: one pull per invocation.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use puller::download::DownloadRequest;
use puller::{DownloaderBuilder, ProgressBarOpts, ProgressDisplay};
use serde_json::json;
use tracing::debug;

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode, puller::Error> {
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let mut builder = DownloaderBuilder::new()
        .timeout(Duration::from_secs(args.timeout))
        .max_redirects(args.max_redirects);
    if let Some(root) = args.root {
        builder = builder.application_root(root);
    }
    if let Some(backup_dir) = args.backup_dir {
        builder = builder.backup_directory(backup_dir);
    }
    if let Some(ref site_url) = args.site_url {
        builder = builder.site_url(site_url);
    }
    for host in args.trusted_hosts {
        builder = builder.trusted_host(host);
    }

    let mut opts = if args.no_progress || args.quiet {
        ProgressBarOpts::hidden()
    } else {
        ProgressBarOpts::with_pip_style()
    };
    opts.set_clear(true);
    let display = ProgressDisplay::new(opts);
    let callback = display.callback();
    let downloader = builder.on_progress(move |p| callback(p)).build()?;

    if args.list {
        let choices: Vec<_> = downloader
            .candidate_destinations()
            .await
            .into_iter()
            .map(|c| json!({ "directory": c.absolute, "label": c.relative }))
            .collect();
        println!("{}", json!({ "success": true, "data": choices }));
        return Ok(ExitCode::SUCCESS);
    }

    let request = DownloadRequest::new(
        args.url.as_deref().unwrap_or_default(),
        &args.directory,
        args.custom_path.as_deref(),
    );
    let outcome = downloader.download_remote_file(&request).await;
    display.finish();

    println!("{}", outcome.to_envelope());
    Ok(if outcome.succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
