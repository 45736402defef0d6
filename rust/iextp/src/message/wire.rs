use crate::codec::{parse_event_time, parse_price, parse_string, parse_timestamp, FromLittleEndianSlice};

use super::*;

fn parse_symbol(buf: &[u8]) -> crate::Result<String> {
    parse_string(&buf[10..10 + crate::SYMBOL_LEN])
}

impl WireMessage for SystemEventMsg {
    const NAME: &'static str = "SystemEventMsg";
    const MIN_LEN: usize = 10;

    fn decode_unchecked(buf: &[u8]) -> crate::Result<Self> {
        Ok(Self {
            message_type: buf[0],
            event: buf[1],
            timestamp: parse_timestamp(&buf[2..10]),
        })
    }
}

impl WireMessage for SecurityDirectoryMsg {
    const NAME: &'static str = "SecurityDirectoryMsg";
    const MIN_LEN: usize = 31;

    fn decode_unchecked(buf: &[u8]) -> crate::Result<Self> {
        Ok(Self {
            message_type: buf[0],
            flags: buf[1].into(),
            timestamp: parse_timestamp(&buf[2..10]),
            symbol: parse_symbol(buf)?,
            round_lot_size: u32::from_le_slice(&buf[18..22]),
            adjusted_poc_price: parse_price(&buf[22..30]),
            luld_tier: buf[30],
        })
    }
}

impl WireMessage for TradingStatusMsg {
    const NAME: &'static str = "TradingStatusMsg";
    const MIN_LEN: usize = 22;

    fn decode_unchecked(buf: &[u8]) -> crate::Result<Self> {
        Ok(Self {
            message_type: buf[0],
            status: buf[1],
            timestamp: parse_timestamp(&buf[2..10]),
            symbol: parse_symbol(buf)?,
            reason: parse_string(&buf[18..22])?,
        })
    }
}

impl WireMessage for OperationalHaltStatusMsg {
    const NAME: &'static str = "OperationalHaltStatusMsg";
    const MIN_LEN: usize = 18;

    fn decode_unchecked(buf: &[u8]) -> crate::Result<Self> {
        Ok(Self {
            message_type: buf[0],
            status: buf[1],
            timestamp: parse_timestamp(&buf[2..10]),
            symbol: parse_symbol(buf)?,
        })
    }
}

impl WireMessage for ShortSalePriceTestStatusMsg {
    const NAME: &'static str = "ShortSalePriceTestStatusMsg";
    const MIN_LEN: usize = 19;

    fn decode_unchecked(buf: &[u8]) -> crate::Result<Self> {
        Ok(Self {
            message_type: buf[0],
            in_effect: buf[1] != 0,
            timestamp: parse_timestamp(&buf[2..10]),
            symbol: parse_symbol(buf)?,
            detail: buf[18],
        })
    }
}

impl WireMessage for QuoteUpdateMsg {
    const NAME: &'static str = "QuoteUpdateMsg";
    const MIN_LEN: usize = 42;

    fn decode_unchecked(buf: &[u8]) -> crate::Result<Self> {
        Ok(Self {
            message_type: buf[0],
            flags: buf[1].into(),
            timestamp: parse_timestamp(&buf[2..10]),
            symbol: parse_symbol(buf)?,
            bid_size: u32::from_le_slice(&buf[18..22]),
            bid_price: parse_price(&buf[22..30]),
            ask_price: parse_price(&buf[30..38]),
            ask_size: u32::from_le_slice(&buf[38..42]),
        })
    }
}

impl WireMessage for TradeMsg {
    const NAME: &'static str = "TradeMsg";
    const MIN_LEN: usize = 38;

    fn decode_unchecked(buf: &[u8]) -> crate::Result<Self> {
        Ok(Self {
            message_type: buf[0],
            sale_condition: buf[1].into(),
            timestamp: parse_timestamp(&buf[2..10]),
            symbol: parse_symbol(buf)?,
            size: u32::from_le_slice(&buf[18..22]),
            price: parse_price(&buf[22..30]),
            trade_id: i64::from_le_slice(&buf[30..38]),
        })
    }
}

impl WireMessage for OfficialPriceMsg {
    const NAME: &'static str = "OfficialPriceMsg";
    const MIN_LEN: usize = 26;

    fn decode_unchecked(buf: &[u8]) -> crate::Result<Self> {
        Ok(Self {
            message_type: buf[0],
            price_type: buf[1],
            timestamp: parse_timestamp(&buf[2..10]),
            symbol: parse_symbol(buf)?,
            price: parse_price(&buf[18..26]),
        })
    }
}

impl WireMessage for AuctionInformationMsg {
    const NAME: &'static str = "AuctionInformationMsg";
    const MIN_LEN: usize = 80;

    fn decode_unchecked(buf: &[u8]) -> crate::Result<Self> {
        Ok(Self {
            message_type: buf[0],
            auction_type: buf[1],
            timestamp: parse_timestamp(&buf[2..10]),
            symbol: parse_symbol(buf)?,
            paired_shares: u32::from_le_slice(&buf[18..22]),
            reference_price: parse_price(&buf[22..30]),
            indicative_clearing_price: parse_price(&buf[30..38]),
            imbalance_shares: u32::from_le_slice(&buf[38..42]),
            imbalance_side: buf[42],
            extension_number: buf[43],
            scheduled_auction_time: parse_event_time(&buf[44..48]),
            auction_book_clearing_price: parse_price(&buf[48..56]),
            collar_reference_price: parse_price(&buf[56..64]),
            lower_auction_collar: parse_price(&buf[64..72]),
            upper_auction_collar: parse_price(&buf[72..80]),
        })
    }
}

impl WireMessage for SecurityEventMsg {
    const NAME: &'static str = "SecurityEventMsg";
    const MIN_LEN: usize = 18;

    fn decode_unchecked(buf: &[u8]) -> crate::Result<Self> {
        Ok(Self {
            message_type: buf[0],
            event: buf[1],
            timestamp: parse_timestamp(&buf[2..10]),
            symbol: parse_symbol(buf)?,
        })
    }
}

impl WireMessage for PriceLevelUpdateMsg {
    const NAME: &'static str = "PriceLevelUpdateMsg";
    const MIN_LEN: usize = 30;

    fn decode_unchecked(buf: &[u8]) -> crate::Result<Self> {
        Ok(Self {
            message_type: buf[0],
            event_flags: buf[1].into(),
            timestamp: parse_timestamp(&buf[2..10]),
            symbol: parse_symbol(buf)?,
            size: u32::from_le_slice(&buf[18..22]),
            price: parse_price(&buf[22..30]),
        })
    }
}

impl WireMessage for UnsupportedMsg {
    const NAME: &'static str = "UnsupportedMsg";
    const MIN_LEN: usize = 1;

    fn decode_unchecked(buf: &[u8]) -> crate::Result<Self> {
        Ok(Self {
            message_type: buf[0],
            data: buf.to_vec(),
        })
    }
}
