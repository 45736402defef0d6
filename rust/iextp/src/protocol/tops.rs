//! The TOPS top-of-book protocol, versions 1.5 and 1.6, which share a wire format.
use crate::{
    enums::MessageType, AuctionInformationMsg, Message, OfficialPriceMsg,
    OperationalHaltStatusMsg, QuoteUpdateMsg, SecurityDirectoryMsg, ShortSalePriceTestStatusMsg,
    SystemEventMsg, TradeMsg, TradingStatusMsg, WireMessage,
};

use super::{message_type, unsupported};

/// The message protocol ID of TOPS v1.5.
pub const V1_5_PROTOCOL_ID: u16 = 0x8002;
/// The message protocol ID of TOPS v1.6.
pub const V1_6_PROTOCOL_ID: u16 = 0x8003;
/// The name of the feed.
pub const FEED_NAME: &str = "TOPS";

/// Decodes a TOPS message body.
///
/// # Errors
/// This function returns an error if `buf` is empty or shorter than the layout of its
/// message type. Unknown message types, including DEEP-only ones, decode as
/// [`Message::Unsupported`].
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
        MessageType::QuoteUpdate => Message::QuoteUpdate(QuoteUpdateMsg::decode(buf)?),
        MessageType::TradeReport => Message::TradeReport(TradeMsg::decode(buf)?),
        MessageType::OfficialPrice => Message::OfficialPrice(OfficialPriceMsg::decode(buf)?),
        MessageType::TradeBreak => Message::TradeBreak(TradeMsg::decode(buf)?),
        MessageType::AuctionInformation => {
            Message::AuctionInformation(AuctionInformationMsg::decode(buf)?)
        }
        MessageType::SecurityEvent
        | MessageType::PriceLevelUpdateBuySide
        | MessageType::PriceLevelUpdateSellSide => return unsupported(buf),
    })
}
