//! Enums for the single-byte codes used in TOPS and DEEP messages.
//!
//! Messages keep the raw code byte as the authoritative value and expose these enums
//! through fallible accessors, so an unrecognized code never prevents decoding.
use std::fmt::{self, Display, Formatter};

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Converts a raw code byte into its enum, naming the enum in the error.
pub(crate) fn try_code<T>(raw: u8) -> crate::Result<T>
where
    T: TryFromPrimitive<Primitive = u8>,
{
    T::try_from_primitive(raw).map_err(|_| crate::Error::conversion::<T>(format!("{raw:#04X}")))
}

/// The message type discriminant: the first byte of every message body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum MessageType {
    /// [`SystemEventMsg`](crate::SystemEventMsg).
    SystemEvent = 0x53,
    /// [`SecurityDirectoryMsg`](crate::SecurityDirectoryMsg).
    SecurityDirectory = 0x44,
    /// [`TradingStatusMsg`](crate::TradingStatusMsg).
    TradingStatus = 0x48,
    /// [`OperationalHaltStatusMsg`](crate::OperationalHaltStatusMsg).
    OperationalHaltStatus = 0x4F,
    /// [`ShortSalePriceTestStatusMsg`](crate::ShortSalePriceTestStatusMsg).
    ShortSalePriceTestStatus = 0x50,
    /// [`QuoteUpdateMsg`](crate::QuoteUpdateMsg). TOPS only.
    QuoteUpdate = 0x51,
    /// A trade report [`TradeMsg`](crate::TradeMsg).
    TradeReport = 0x54,
    /// A trade break [`TradeMsg`](crate::TradeMsg).
    TradeBreak = 0x42,
    /// [`OfficialPriceMsg`](crate::OfficialPriceMsg).
    OfficialPrice = 0x58,
    /// [`AuctionInformationMsg`](crate::AuctionInformationMsg).
    AuctionInformation = 0x41,
    /// [`SecurityEventMsg`](crate::SecurityEventMsg). DEEP only.
    SecurityEvent = 0x45,
    /// A buy-side [`PriceLevelUpdateMsg`](crate::PriceLevelUpdateMsg). DEEP only.
    PriceLevelUpdateBuySide = 0x38,
    /// A sell-side [`PriceLevelUpdateMsg`](crate::PriceLevelUpdateMsg). DEEP only.
    PriceLevelUpdateSellSide = 0x35,
}

impl MessageType {
    /// Converts the message type to a `&'static str`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MessageType::SystemEvent => "system_event",
            MessageType::SecurityDirectory => "security_directory",
            MessageType::TradingStatus => "trading_status",
            MessageType::OperationalHaltStatus => "operational_halt_status",
            MessageType::ShortSalePriceTestStatus => "short_sale_price_test_status",
            MessageType::QuoteUpdate => "quote_update",
            MessageType::TradeReport => "trade_report",
            MessageType::TradeBreak => "trade_break",
            MessageType::OfficialPrice => "official_price",
            MessageType::AuctionInformation => "auction_information",
            MessageType::SecurityEvent => "security_event",
            MessageType::PriceLevelUpdateBuySide => "price_level_update_buy_side",
            MessageType::PriceLevelUpdateSellSide => "price_level_update_sell_side",
        }
    }
}

impl Display for MessageType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A market-wide or feed-wide event carried by a
/// [`SystemEventMsg`](crate::SystemEventMsg).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum SystemEventCode {
    /// The first message of the trading session, after any transport heartbeats.
    StartOfMessages = 0x4F,
    /// The exchange is open and ready to accept orders.
    StartOfSystemHours = 0x53,
    /// DAY and GTX orders, as well as market and pegged orders, are available for
    /// execution.
    StartOfRegularMarketHours = 0x52,
    /// DAY orders, market orders, and pegged orders are no longer accepted.
    EndOfRegularMarketHours = 0x4D,
    /// The exchange is closed and won't accept new orders this session.
    EndOfSystemHours = 0x45,
    /// The last message of the trading session.
    EndOfMessages = 0x43,
}

/// The trading status of a security.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum TradingStatusCode {
    /// Trading halted across all US equity markets.
    Halted = 0x48,
    /// Halt released into an order acceptance period. Listed securities only.
    OrderAcceptancePeriod = 0x4F,
    /// Trading paused and in an order acceptance period. Listed securities only.
    Paused = 0x50,
    /// Trading on the exchange.
    Trading = 0x54,
}

/// Reason codes for [`TradingStatusMsg::reason`](crate::TradingStatusMsg::reason).
pub mod halt_reason {
    /// Trading halt, news pending.
    pub const NEWS_PENDING: &str = "T1";
    /// IPO issue not yet trading.
    pub const IPO_NOT_YET_TRADING: &str = "IPO1";
    /// IPO issue deferred.
    pub const IPO_DEFERRED: &str = "IPOD";
    /// Market-wide circuit breaker level 3.
    pub const MARKET_CIRCUIT_BREAKER_LEVEL_3: &str = "MCB3";
    /// Reason not available, used for securities listed elsewhere.
    pub const NOT_AVAILABLE: &str = "NA";
    /// Halt news dissemination.
    pub const NEWS_DISSEMINATION: &str = "T2";
    /// IPO new issue order acceptance period.
    pub const IPO_ORDER_ACCEPTANCE_PERIOD: &str = "IPO2";
    /// IPO pre-launch period.
    pub const IPO_PRE_LAUNCH_PERIOD: &str = "IPO3";
    /// Market-wide circuit breaker level 1.
    pub const MARKET_CIRCUIT_BREAKER_LEVEL_1: &str = "MCB1";
    /// Market-wide circuit breaker level 2.
    pub const MARKET_CIRCUIT_BREAKER_LEVEL_2: &str = "MCB2";
}

/// The operational halt status of a security.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum OperationalHaltCode {
    /// Exchange-specific operational trading halt.
    Halted = 0x4F,
    /// Not operationally halted.
    NotHalted = 0x4E,
}

/// Detail of a short sale price test status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum ShortSaleDetail {
    /// No price test in place.
    NoPriceTest = 0x20,
    /// Restriction in effect due to an intraday price drop.
    Activated = 0x41,
    /// Restriction remains in effect from the prior day.
    Continued = 0x43,
    /// Restriction deactivated.
    Deactivated = 0x44,
    /// Detail not available.
    NotAvailable = 0x4E,
}

/// Which official price an [`OfficialPriceMsg`](crate::OfficialPriceMsg) carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum PriceType {
    /// Official opening price.
    Opening = 0x51,
    /// Official closing price.
    Closing = 0x4D,
}

/// The kind of auction described by an
/// [`AuctionInformationMsg`](crate::AuctionInformationMsg).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum AuctionType {
    /// Opening auction.
    Opening = 0x4F,
    /// Closing auction.
    Closing = 0x43,
    /// IPO auction.
    Ipo = 0x49,
    /// Halt auction.
    Halt = 0x48,
    /// Volatility auction.
    Volatility = 0x56,
}

/// The side of an auction imbalance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum ImbalanceSide {
    /// Buy-side imbalance.
    Buy = 0x42,
    /// Sell-side imbalance.
    Sell = 0x53,
    /// No imbalance.
    None = 0x4E,
}

/// An event that applies to a single security.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum SecurityEventCode {
    /// Orders queued during the pre-market session are now available for execution.
    OpeningProcessComplete = 0x4F,
    /// The closing process has completed and ineligible orders were canceled.
    ClosingProcessComplete = 0x43,
}

/// The Limit Up-Limit Down price band tier of a security.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum LuldTier {
    /// Not applicable.
    NotApplicable = 0,
    /// Tier 1 NMS stock.
    Tier1 = 1,
    /// Tier 2 NMS stock.
    Tier2 = 2,
}

/// A side of the book.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Side {
    /// The bid side.
    Buy,
    /// The ask side.
    Sell,
}

impl From<Side> for char {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => 'B',
            Side::Sell => 'S',
        }
    }
}
