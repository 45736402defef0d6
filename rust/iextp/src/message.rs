//! Message types for the TOPS and DEEP protocols and the [`Message`] tagged union
//! over them.
//!
//! Field types follow the wire: timestamps stay as raw nanoseconds since the UNIX
//! epoch and flag bytes stay as raw bit sets. Typed views are available through
//! methods of the same name as the raw field.

mod methods;
mod wire;

use crate::flags::{PriceLevelEventFlags, QuoteFlags, SaleConditionFlags, SecurityDirectoryFlags};

/// Trait for message types with a fixed little-endian wire layout.
pub trait WireMessage: Sized {
    /// The name of the message type, used in errors.
    const NAME: &'static str;
    /// The minimum length of the message body in bytes, including the message type
    /// byte. Longer bodies are accepted and trailing bytes are ignored.
    const MIN_LEN: usize;

    /// Decodes the message from `buf` without checking its length.
    ///
    /// # Panics
    /// This function panics if `buf` is shorter than [`Self::MIN_LEN`].
    ///
    /// # Errors
    /// This function returns an error if a string field contains non-ASCII bytes.
    fn decode_unchecked(buf: &[u8]) -> crate::Result<Self>;

    /// Decodes the message from the message body `buf`, which starts with the message
    /// type byte.
    ///
    /// # Errors
    /// This function returns [`Error::BufferTooShort`](crate::Error::BufferTooShort) if
    /// `buf` is shorter than [`Self::MIN_LEN`], or an error if a string field contains
    /// non-ASCII bytes.
    fn decode(buf: &[u8]) -> crate::Result<Self> {
        if buf.len() < Self::MIN_LEN {
            return Err(crate::Error::BufferTooShort {
                message: Self::NAME,
                expected: Self::MIN_LEN,
                actual: buf.len(),
            });
        }
        Self::decode_unchecked(buf)
    }
}

/// Indicates an event that applies to the market or the data feed. A single message
/// is sent per channel for each event type within a trading session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SystemEventMsg {
    /// The message type byte.
    pub message_type: u8,
    /// The raw system event code. See [`SystemEventCode`](crate::enums::SystemEventCode).
    pub event: u8,
    /// The event timestamp in nanoseconds since the UNIX epoch.
    pub timestamp: i64,
}

/// A security directory entry. Sent for every listed security in a pre-market spin
/// and afterwards to relay changes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SecurityDirectoryMsg {
    /// The message type byte.
    pub message_type: u8,
    /// Security attribute flags.
    pub flags: SecurityDirectoryFlags,
    /// The update timestamp in nanoseconds since the UNIX epoch.
    pub timestamp: i64,
    /// The security symbol.
    pub symbol: String,
    /// The number of shares that represent a round lot.
    pub round_lot_size: u32,
    /// The corporate action adjusted previous official closing price.
    pub adjusted_poc_price: f64,
    /// The raw Limit Up-Limit Down tier. See [`LuldTier`](crate::enums::LuldTier).
    pub luld_tier: u8,
}

/// The current trading status of a security.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TradingStatusMsg {
    /// The message type byte.
    pub message_type: u8,
    /// The raw trading status. See [`TradingStatusCode`](crate::enums::TradingStatusCode).
    pub status: u8,
    /// The update timestamp in nanoseconds since the UNIX epoch.
    pub timestamp: i64,
    /// The security symbol.
    pub symbol: String,
    /// The halt or order acceptance period reason, empty when trading or paused. See
    /// [`halt_reason`](crate::enums::halt_reason).
    pub reason: String,
}

/// The operational halt status of a security.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OperationalHaltStatusMsg {
    /// The message type byte.
    pub message_type: u8,
    /// The raw halt status. See [`OperationalHaltCode`](crate::enums::OperationalHaltCode).
    pub status: u8,
    /// The update timestamp in nanoseconds since the UNIX epoch.
    pub timestamp: i64,
    /// The security symbol.
    pub symbol: String,
}

/// Whether a Reg SHO Rule 201 short sale price test restriction is in effect for a
/// security.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ShortSalePriceTestStatusMsg {
    /// The message type byte.
    pub message_type: u8,
    /// `true` if the price test restriction is in effect.
    pub in_effect: bool,
    /// The update timestamp in nanoseconds since the UNIX epoch.
    pub timestamp: i64,
    /// The security symbol.
    pub symbol: String,
    /// The raw detail code. See [`ShortSaleDetail`](crate::enums::ShortSaleDetail).
    pub detail: u8,
}

/// An update to the best bid and offer. TOPS only.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QuoteUpdateMsg {
    /// The message type byte.
    pub message_type: u8,
    /// Quote flags.
    pub flags: QuoteFlags,
    /// The quote timestamp in nanoseconds since the UNIX epoch.
    pub timestamp: i64,
    /// The security symbol.
    pub symbol: String,
    /// The size at the bid, in shares.
    pub bid_size: u32,
    /// The bid price.
    pub bid_price: f64,
    /// The ask price.
    pub ask_price: f64,
    /// The size at the ask, in shares.
    pub ask_size: u32,
}

/// A single fill of an order, or a break of an earlier fill. Trade reports and trade
/// breaks share this layout and are distinguished by [`message_type`](Self::message_type).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TradeMsg {
    /// The message type byte.
    pub message_type: u8,
    /// Sale condition flags.
    pub sale_condition: SaleConditionFlags,
    /// The execution timestamp in nanoseconds since the UNIX epoch.
    pub timestamp: i64,
    /// The security symbol.
    pub symbol: String,
    /// The trade size, in shares.
    pub size: u32,
    /// The execution price.
    pub price: f64,
    /// The trade ID, unique within a trading day.
    pub trade_id: i64,
}

/// An official opening or closing price of a listed security.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OfficialPriceMsg {
    /// The message type byte.
    pub message_type: u8,
    /// The raw price type. See [`PriceType`](crate::enums::PriceType).
    pub price_type: u8,
    /// The timestamp of the official price calculation in nanoseconds since the
    /// UNIX epoch.
    pub timestamp: i64,
    /// The security symbol.
    pub symbol: String,
    /// The official price.
    pub price: f64,
}

/// Auction information, sent every second during the auction's lock-in or display
/// only period. Listed securities only.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AuctionInformationMsg {
    /// The message type byte.
    pub message_type: u8,
    /// The raw auction type. See [`AuctionType`](crate::enums::AuctionType).
    pub auction_type: u8,
    /// The update timestamp in nanoseconds since the UNIX epoch.
    pub timestamp: i64,
    /// The security symbol.
    pub symbol: String,
    /// The number of shares paired at the reference price.
    pub paired_shares: u32,
    /// The clearing price within the reference price range using orders on the auction
    /// book.
    pub reference_price: f64,
    /// The clearing price using eligible auction orders.
    pub indicative_clearing_price: f64,
    /// The number of unpaired shares at the reference price.
    pub imbalance_shares: u32,
    /// The raw imbalance side. See [`ImbalanceSide`](crate::enums::ImbalanceSide).
    pub imbalance_side: u8,
    /// The number of automatic extensions an IPO, halt, or volatility auction has
    /// received.
    pub extension_number: u8,
    /// The projected time of the auction match in seconds since the UNIX epoch.
    pub scheduled_auction_time: u32,
    /// The clearing price using orders on the auction book.
    pub auction_book_clearing_price: f64,
    /// The reference price of the auction collar.
    pub collar_reference_price: f64,
    /// The lower threshold price of the auction collar.
    pub lower_auction_collar: f64,
    /// The upper threshold price of the auction collar.
    pub upper_auction_collar: f64,
}

/// An event that applies to a single security. DEEP only.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SecurityEventMsg {
    /// The message type byte.
    pub message_type: u8,
    /// The raw security event code. See [`SecurityEventCode`](crate::enums::SecurityEventCode).
    pub event: u8,
    /// The event timestamp in nanoseconds since the UNIX epoch.
    pub timestamp: i64,
    /// The security symbol.
    pub symbol: String,
}

/// An aggregated size update to a price level of the book. DEEP only. The side is
/// given by the message type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PriceLevelUpdateMsg {
    /// The message type byte.
    pub message_type: u8,
    /// Event flags.
    pub event_flags: PriceLevelEventFlags,
    /// The update timestamp in nanoseconds since the UNIX epoch.
    pub timestamp: i64,
    /// The security symbol.
    pub symbol: String,
    /// The aggregate size at the price level. Zero removes the level.
    pub size: u32,
    /// The price level.
    pub price: f64,
}

/// A message of a type the protocol doesn't know how to decode. The upstream feed may
/// add message types at any time, so these are passed through rather than rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnsupportedMsg {
    /// The message type byte.
    pub message_type: u8,
    /// The entire message body, including the message type byte.
    pub data: Vec<u8>,
}

/// An owned, decoded TOPS or DEEP message.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(tag = "kind"))]
pub enum Message {
    /// A system event message.
    SystemEvent(SystemEventMsg),
    /// A security directory message.
    SecurityDirectory(SecurityDirectoryMsg),
    /// A trading status message.
    TradingStatus(TradingStatusMsg),
    /// An operational halt status message.
    OperationalHaltStatus(OperationalHaltStatusMsg),
    /// A short sale price test status message.
    ShortSalePriceTestStatus(ShortSalePriceTestStatusMsg),
    /// A quote update message. TOPS only.
    QuoteUpdate(QuoteUpdateMsg),
    /// A trade report message.
    TradeReport(TradeMsg),
    /// An official price message.
    OfficialPrice(OfficialPriceMsg),
    /// A trade break message.
    TradeBreak(TradeMsg),
    /// An auction information message.
    AuctionInformation(AuctionInformationMsg),
    /// A security event message. DEEP only.
    SecurityEvent(SecurityEventMsg),
    /// A buy-side or sell-side price level update message. DEEP only.
    PriceLevelUpdate(PriceLevelUpdateMsg),
    /// A message of an unrecognized type.
    Unsupported(UnsupportedMsg),
}
