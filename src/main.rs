use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod config;
mod extract;
mod paths;
mod publish;
mod splice;
mod sync;

use cli::RootArgs;
use config::{config_stub, resolve_config, Overrides};
use sync::{run_sync, SyncMode};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    if args.print_config {
        println!("{}", config_stub()?);
        return Ok(());
    }

    let config = resolve_config(
        args.config.as_deref(),
        Overrides {
            document: args.document,
            source_root: args.source_root,
        },
    )?;
    let mode = if args.check {
        SyncMode::Check
    } else {
        SyncMode::Write
    };

    let report = run_sync(&config, mode)?;
    if report.written {
        tracing::info!(
            sections = %report.summary.matched.join(", "),
            "document updated"
        );
    } else if !report.changed {
        tracing::debug!("document already up to date");
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
