use std::{
    fs::File,
    io::{self, BufWriter},
    net::{Ipv4Addr, SocketAddr},
    num::NonZeroU64,
    path::PathBuf,
    time::Duration,
};

use anyhow::{anyhow, Context};
use clap::{ArgAction, Parser};

pub mod replay;

/// The input path that reads from standard input.
pub const STDIN_SENTINEL: &str = "-";

#[derive(Debug, Parser)]
#[clap(version, about)]
#[cfg_attr(test, derive(Default))]
pub struct Args {
    #[clap(
        help = "A pcap or pcap-ng capture of IEX-TP segments, optionally gzip- or zstd-compressed. Pass '-' to read from standard input",
        value_name = "FILE",
        required_unless_present = "udp",
        conflicts_with = "udp"
    )]
    pub input: Option<PathBuf>,
    #[clap(
        long,
        value_name = "ADDR",
        help = "Listen for IEX-TP segments on a UDP socket bound to ADDR instead of reading a capture"
    )]
    pub udp: Option<SocketAddr>,
    #[clap(
        long,
        value_name = "GROUP",
        requires = "udp",
        help = "Join the multicast GROUP after binding the UDP socket"
    )]
    pub multicast_group: Option<Ipv4Addr>,
    #[clap(
        long,
        value_name = "IP",
        requires = "multicast_group",
        help = "The address of the local interface on which to join the multicast group"
    )]
    pub interface: Option<Ipv4Addr>,
    #[clap(
        long,
        value_name = "MILLIS",
        requires = "udp",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Stop listening once no datagram has arrived for MILLIS milliseconds"
    )]
    pub read_timeout_ms: Option<u64>,
    #[clap(
        short,
        long,
        help = "Saves the result to FILE. If no path is specified, the output will be written to standard output",
        value_name = "FILE"
    )]
    pub output: Option<PathBuf>,
    #[clap(
        short,
        long,
        action = ArgAction::SetTrue,
        default_value = "false",
        help = "Allow overwriting of existing files, such as the output file"
    )]
    pub force: bool,
    #[clap(
        short,
        long,
        action = ArgAction::SetTrue,
        default_value = "false",
        help = "Consolidate trade reports into OHLCV bars and output them as CSV instead of outputting every message as NDJSON"
    )]
    pub bars: bool,
    #[clap(
        long,
        value_name = "SECONDS",
        default_value_t = 60,
        requires = "bars",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "The length of each bar"
    )]
    pub bar_interval_secs: u64,
    #[clap(
        short = 'l',
        long = "limit",
        value_name = "NUM_MESSAGES",
        help = "Stop after decoding the specified number of messages"
    )]
    pub limit: Option<NonZeroU64>,
    #[clap(
        short,
        long,
        action = ArgAction::Count,
        help = "Log more to standard error: once for info, twice for debug, three times for trace. RUST_LOG takes precedence"
    )]
    pub verbose: u8,
}

impl Args {
    /// Returns the read timeout of the UDP socket, if any.
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }

    /// Returns the length of each bar.
    pub fn bar_interval(&self) -> Duration {
        Duration::from_secs(self.bar_interval_secs)
    }

    /// Returns the default log filter directive for the verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Returns a writeable object where the `iexdump` output will be directed.
pub fn output_from_args(args: &Args) -> anyhow::Result<Box<dyn io::Write>> {
    if let Some(output) = &args.output {
        let output_file = open_output_file(output, args.force)?;
        Ok(Box::new(BufWriter::new(output_file)))
    } else {
        Ok(Box::new(io::stdout().lock()))
    }
}

fn open_output_file(path: &PathBuf, force: bool) -> anyhow::Result<File> {
    let mut options = File::options();
    options.write(true).truncate(true);
    if force {
        options.create(true);
    } else if path.exists() {
        return Err(anyhow!(
            "Output file exists. Pass --force flag to overwrite the existing file."
        ));
    } else {
        options.create_new(true);
    }
    options
        .open(path)
        .with_context(|| format!("Unable to open output file '{}'", path.display()))
}
