use std::io;

use clap::Parser;
use iextp_cli::{replay::run, Args};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| args.log_level().into()),
        )
        .with_writer(io::stderr)
        .init();
    run(&args)
}
