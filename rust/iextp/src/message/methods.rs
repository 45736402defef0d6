use time::OffsetDateTime;

use crate::{
    codec::{event_time_to_dt, ts_to_dt},
    enums::{
        try_code, AuctionType, ImbalanceSide, LuldTier, MessageType, OperationalHaltCode,
        PriceType, SecurityEventCode, ShortSaleDetail, Side, SystemEventCode, TradingStatusCode,
    },
};

use super::*;

impl SystemEventMsg {
    /// Tries to convert the raw system event code into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `event` field does not contain a known
    /// [`SystemEventCode`].
    pub fn event(&self) -> crate::Result<SystemEventCode> {
        try_code(self.event)
    }

    /// Parses the raw event timestamp into a datetime.
    pub fn timestamp(&self) -> OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl SecurityDirectoryMsg {
    /// Tries to convert the raw LULD tier into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `luld_tier` field does not contain a
    /// known [`LuldTier`].
    pub fn luld_tier(&self) -> crate::Result<LuldTier> {
        try_code(self.luld_tier)
    }

    /// Parses the raw update timestamp into a datetime.
    pub fn timestamp(&self) -> OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl TradingStatusMsg {
    /// Tries to convert the raw trading status into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `status` field does not contain a known
    /// [`TradingStatusCode`].
    pub fn status(&self) -> crate::Result<TradingStatusCode> {
        try_code(self.status)
    }

    /// Parses the raw update timestamp into a datetime.
    pub fn timestamp(&self) -> OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl OperationalHaltStatusMsg {
    /// Tries to convert the raw halt status into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `status` field does not contain a known
    /// [`OperationalHaltCode`].
    pub fn status(&self) -> crate::Result<OperationalHaltCode> {
        try_code(self.status)
    }

    /// Parses the raw update timestamp into a datetime.
    pub fn timestamp(&self) -> OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl ShortSalePriceTestStatusMsg {
    /// Tries to convert the raw detail code into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `detail` field does not contain a known
    /// [`ShortSaleDetail`].
    pub fn detail(&self) -> crate::Result<ShortSaleDetail> {
        try_code(self.detail)
    }

    /// Parses the raw update timestamp into a datetime.
    pub fn timestamp(&self) -> OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl QuoteUpdateMsg {
    /// Returns `true` if the symbol is available for trading.
    pub const fn is_active(&self) -> bool {
        self.flags.is_active()
    }

    /// Returns `true` if the quote is from the regular market session.
    pub const fn is_regular_market_session(&self) -> bool {
        self.flags.is_regular_market_session()
    }

    /// Parses the raw quote timestamp into a datetime.
    pub fn timestamp(&self) -> OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl TradeMsg {
    /// Returns `true` if this is a trade break rather than a trade report.
    pub fn is_break(&self) -> bool {
        self.message_type == u8::from(MessageType::TradeBreak)
    }

    /// Parses the raw execution timestamp into a datetime.
    pub fn timestamp(&self) -> OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl OfficialPriceMsg {
    /// Tries to convert the raw price type into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `price_type` field does not contain a
    /// known [`PriceType`].
    pub fn price_type(&self) -> crate::Result<PriceType> {
        try_code(self.price_type)
    }

    /// Parses the raw timestamp into a datetime.
    pub fn timestamp(&self) -> OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl AuctionInformationMsg {
    /// Tries to convert the raw auction type into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `auction_type` field does not contain a
    /// known [`AuctionType`].
    pub fn auction_type(&self) -> crate::Result<AuctionType> {
        try_code(self.auction_type)
    }

    /// Tries to convert the raw imbalance side into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `imbalance_side` field does not contain a
    /// known [`ImbalanceSide`].
    pub fn imbalance_side(&self) -> crate::Result<ImbalanceSide> {
        try_code(self.imbalance_side)
    }

    /// Parses the raw scheduled auction time, in seconds, into a datetime.
    pub fn scheduled_auction_time(&self) -> OffsetDateTime {
        event_time_to_dt(self.scheduled_auction_time)
    }

    /// Parses the raw update timestamp into a datetime.
    pub fn timestamp(&self) -> OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl SecurityEventMsg {
    /// Tries to convert the raw security event code into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `event` field does not contain a known
    /// [`SecurityEventCode`].
    pub fn event(&self) -> crate::Result<SecurityEventCode> {
        try_code(self.event)
    }

    /// Parses the raw event timestamp into a datetime.
    pub fn timestamp(&self) -> OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl PriceLevelUpdateMsg {
    /// Returns the side of the book from the message type.
    ///
    /// # Errors
    /// This function returns an error if the `message_type` is neither of the price
    /// level update types.
    pub fn side(&self) -> crate::Result<Side> {
        match try_code::<MessageType>(self.message_type)? {
            MessageType::PriceLevelUpdateBuySide => Ok(Side::Buy),
            MessageType::PriceLevelUpdateSellSide => Ok(Side::Sell),
            other => Err(crate::Error::conversion::<Side>(other)),
        }
    }

    /// Returns `true` if the update is to the bid side of the book.
    pub fn is_buy_side(&self) -> bool {
        self.message_type == u8::from(MessageType::PriceLevelUpdateBuySide)
    }

    /// Returns `true` if the update is to the ask side of the book.
    pub fn is_sell_side(&self) -> bool {
        self.message_type == u8::from(MessageType::PriceLevelUpdateSellSide)
    }

    /// Parses the raw update timestamp into a datetime.
    pub fn timestamp(&self) -> OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl Message {
    /// Returns the raw message type byte.
    pub fn message_type(&self) -> u8 {
        match self {
            Message::SystemEvent(msg) => msg.message_type,
            Message::SecurityDirectory(msg) => msg.message_type,
            Message::TradingStatus(msg) => msg.message_type,
            Message::OperationalHaltStatus(msg) => msg.message_type,
            Message::ShortSalePriceTestStatus(msg) => msg.message_type,
            Message::QuoteUpdate(msg) => msg.message_type,
            Message::TradeReport(msg) | Message::TradeBreak(msg) => msg.message_type,
            Message::OfficialPrice(msg) => msg.message_type,
            Message::AuctionInformation(msg) => msg.message_type,
            Message::SecurityEvent(msg) => msg.message_type,
            Message::PriceLevelUpdate(msg) => msg.message_type,
            Message::Unsupported(msg) => msg.message_type,
        }
    }

    /// Returns the symbol the message applies to, or `None` for system events and
    /// unsupported messages.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Message::SystemEvent(_) | Message::Unsupported(_) => None,
            Message::SecurityDirectory(msg) => Some(&msg.symbol),
            Message::TradingStatus(msg) => Some(&msg.symbol),
            Message::OperationalHaltStatus(msg) => Some(&msg.symbol),
            Message::ShortSalePriceTestStatus(msg) => Some(&msg.symbol),
            Message::QuoteUpdate(msg) => Some(&msg.symbol),
            Message::TradeReport(msg) | Message::TradeBreak(msg) => Some(&msg.symbol),
            Message::OfficialPrice(msg) => Some(&msg.symbol),
            Message::AuctionInformation(msg) => Some(&msg.symbol),
            Message::SecurityEvent(msg) => Some(&msg.symbol),
            Message::PriceLevelUpdate(msg) => Some(&msg.symbol),
        }
    }

    /// Returns the raw timestamp in nanoseconds since the UNIX epoch, or `None` for
    /// unsupported messages.
    pub fn timestamp(&self) -> Option<i64> {
        match self {
            Message::SystemEvent(msg) => Some(msg.timestamp),
            Message::SecurityDirectory(msg) => Some(msg.timestamp),
            Message::TradingStatus(msg) => Some(msg.timestamp),
            Message::OperationalHaltStatus(msg) => Some(msg.timestamp),
            Message::ShortSalePriceTestStatus(msg) => Some(msg.timestamp),
            Message::QuoteUpdate(msg) => Some(msg.timestamp),
            Message::TradeReport(msg) | Message::TradeBreak(msg) => Some(msg.timestamp),
            Message::OfficialPrice(msg) => Some(msg.timestamp),
            Message::AuctionInformation(msg) => Some(msg.timestamp),
            Message::SecurityEvent(msg) => Some(msg.timestamp),
            Message::PriceLevelUpdate(msg) => Some(msg.timestamp),
            Message::Unsupported(_) => None,
        }
    }

    /// Returns a reference to the inner trade if this is a trade report.
    pub fn as_trade_report(&self) -> Option<&TradeMsg> {
        if let Message::TradeReport(trade) = self {
            Some(trade)
        } else {
            None
        }
    }
}

macro_rules! impl_from_msg {
    ($($variant:ident($msg:ty)),+ $(,)?) => {
        $(
            impl From<$msg> for Message {
                fn from(msg: $msg) -> Self {
                    Self::$variant(msg)
                }
            }
        )+
    };
}

impl_from_msg!(
    SystemEvent(SystemEventMsg),
    SecurityDirectory(SecurityDirectoryMsg),
    TradingStatus(TradingStatusMsg),
    OperationalHaltStatus(OperationalHaltStatusMsg),
    ShortSalePriceTestStatus(ShortSalePriceTestStatusMsg),
    QuoteUpdate(QuoteUpdateMsg),
    OfficialPrice(OfficialPriceMsg),
    AuctionInformation(AuctionInformationMsg),
    SecurityEvent(SecurityEventMsg),
    PriceLevelUpdate(PriceLevelUpdateMsg),
    Unsupported(UnsupportedMsg),
);

impl From<TradeMsg> for Message {
    fn from(trade: TradeMsg) -> Self {
        if trade.is_break() {
            Self::TradeBreak(trade)
        } else {
            Self::TradeReport(trade)
        }
    }
}
