//! The DEEP depth-of-book protocol, version 1.0. DEEP shares most message layouts
//! with TOPS, replaces quote updates with price level updates, and adds security
//! events.
use crate::{
    enums::MessageType, AuctionInformationMsg, Message, OfficialPriceMsg,
    OperationalHaltStatusMsg, PriceLevelUpdateMsg, SecurityDirectoryMsg, SecurityEventMsg,
    ShortSalePriceTestStatusMsg, SystemEventMsg, TradeMsg, TradingStatusMsg, WireMessage,
};

use super::{message_type, unsupported};

/// The message protocol ID of DEEP v1.0.
pub const V1_0_PROTOCOL_ID: u16 = 0x8004;
/// The name of the feed.
pub const FEED_NAME: &str = "DEEP";

/// Decodes a DEEP message body.
///
/// # Errors
/// This function returns an error if `buf` is empty or shorter than the layout of its
/// message type. Unknown message types, including the TOPS-only quote update, decode
/// as [`Message::Unsupported`].
pub fn decode(buf: &[u8]) -> crate::Result<Message> {
    let Ok(msg_type) = MessageType::try_from(message_type(buf)?) else {
        return unsupported(buf);
    };
    Ok(match msg_type {
        MessageType::SystemEvent => Message::SystemEvent(SystemEventMsg::decode(buf)?),
        MessageType::SecurityDirectory => {
            Message::SecurityDirectory(SecurityDirectoryMsg::decode(buf)?)
        }
        MessageType::TradingStatus => Message::TradingStatus(TradingStatusMsg::decode(buf)?),
        MessageType::OperationalHaltStatus => {
            Message::OperationalHaltStatus(OperationalHaltStatusMsg::decode(buf)?)
        }
        MessageType::ShortSalePriceTestStatus => {
            Message::ShortSalePriceTestStatus(ShortSalePriceTestStatusMsg::decode(buf)?)
        }
        MessageType::SecurityEvent => Message::SecurityEvent(SecurityEventMsg::decode(buf)?),
        MessageType::PriceLevelUpdateBuySide | MessageType::PriceLevelUpdateSellSide => {
            Message::PriceLevelUpdate(PriceLevelUpdateMsg::decode(buf)?)
        }
        MessageType::TradeReport => Message::TradeReport(TradeMsg::decode(buf)?),
        MessageType::OfficialPrice => Message::OfficialPrice(OfficialPriceMsg::decode(buf)?),
        MessageType::TradeBreak => Message::TradeBreak(TradeMsg::decode(buf)?),
        MessageType::AuctionInformation => {
            Message::AuctionInformation(AuctionInformationMsg::decode(buf)?)
        }
        MessageType::QuoteUpdate => return unsupported(buf),
    })
}
