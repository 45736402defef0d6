//! A crate for decoding IEX Transport Protocol (IEX-TP) segments carrying the
//! TOPS and DEEP market data protocols, from live UDP feeds or pcap/pcap-ng
//! captures, and for consolidating trades into OHLCV [`Bar`](bars::Bar)s.
//!
//! The usual entry point is a [`Scanner`] over a [`PacketSource`](source::PacketSource):
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use iextp::{source::CaptureSource, Message, ProtocolRegistry, Scanner};
//!
//! # fn main() -> iextp::Result<()> {
//! let source = CaptureSource::from_file("20180127_IEXTP1_TOPS1.6.pcap.gz")?;
//! let mut scanner = Scanner::new(source, Arc::new(ProtocolRegistry::default()));
//! while let Some(msg) = scanner.next_message()? {
//!     if let Message::TradeReport(trade) = msg {
//!         println!("{} {} @ {}", trade.symbol, trade.size, trade.price);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(clippy::missing_errors_doc)]

pub mod bars;
pub mod codec;
pub mod enums;
pub mod error;
pub mod flags;
pub mod message;
pub mod protocol;
pub mod scanner;
pub mod segment;
pub mod sink;
pub mod source;
#[cfg(test)]
mod test_utils;

pub use crate::{
    bars::{make_bar, make_bars, Bar, BarAggregator},
    error::{Error, Result},
    message::{
        AuctionInformationMsg, Message, OfficialPriceMsg, OperationalHaltStatusMsg,
        PriceLevelUpdateMsg, QuoteUpdateMsg, SecurityDirectoryMsg, SecurityEventMsg,
        ShortSalePriceTestStatusMsg, SystemEventMsg, TradeMsg, TradingStatusMsg, UnsupportedMsg,
        WireMessage,
    },
    protocol::{DecodeFn, ProtocolRegistry, ProtocolRegistryBuilder},
    scanner::Scanner,
    segment::{decode_segment, Segment, SegmentHeader},
};

/// The length in bytes of an IEX-TP segment header.
pub const SEGMENT_HEADER_LEN: usize = 40;
/// The length in bytes of the little-endian prefix before each message in a segment.
pub const MESSAGE_LENGTH_PREFIX_LEN: usize = 2;
/// The denominator of fixed-point prices: 4 implied decimal places.
pub const FIXED_PRICE_SCALE: i64 = 10_000;
/// The width in bytes of every symbol field, space-padded on the right.
pub const SYMBOL_LEN: usize = 8;
/// The channel ID shared by the TOPS and DEEP feeds.
pub const CHANNEL_ID: u32 = 1;
