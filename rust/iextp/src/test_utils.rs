//! Builders for byte-level fixtures: message bodies, segments, and captures.
use crate::{enums::MessageType, FIXED_PRICE_SCALE, SYMBOL_LEN};

/// Builds a message body field by field, little-endian.
pub struct MessageBuilder {
    buf: Vec<u8>,
}

impl MessageBuilder {
    pub fn new(message_type: impl Into<u8>) -> Self {
        Self {
            buf: vec![message_type.into()],
        }
    }

    pub fn u8(mut self, val: u8) -> Self {
        self.buf.push(val);
        self
    }

    pub fn u32(mut self, val: u32) -> Self {
        self.buf.extend_from_slice(&val.to_le_bytes());
        self
    }

    pub fn i64(mut self, val: i64) -> Self {
        self.buf.extend_from_slice(&val.to_le_bytes());
        self
    }

    pub fn price(self, price: f64) -> Self {
        self.i64((price * FIXED_PRICE_SCALE as f64).round() as i64)
    }

    pub fn symbol(mut self, symbol: &str) -> Self {
        let mut field = [b' '; SYMBOL_LEN];
        field[..symbol.len()].copy_from_slice(symbol.as_bytes());
        self.buf.extend_from_slice(&field);
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

pub fn trade_report_bytes(symbol: &str, ts: i64, size: u32, price: f64, trade_id: i64) -> Vec<u8> {
    MessageBuilder::new(MessageType::TradeReport)
        .u8(0)
        .i64(ts)
        .symbol(symbol)
        .u32(size)
        .price(price)
        .i64(trade_id)
        .build()
}

pub fn quote_update_bytes(
    symbol: &str,
    ts: i64,
    bid_size: u32,
    bid_price: f64,
    ask_price: f64,
    ask_size: u32,
) -> Vec<u8> {
    MessageBuilder::new(MessageType::QuoteUpdate)
        .u8(0)
        .i64(ts)
        .symbol(symbol)
        .u32(bid_size)
        .price(bid_price)
        .price(ask_price)
        .u32(ask_size)
        .build()
}

pub fn price_level_update_bytes(
    message_type: MessageType,
    symbol: &str,
    ts: i64,
    size: u32,
    price: f64,
) -> Vec<u8> {
    MessageBuilder::new(message_type)
        .u8(1)
        .i64(ts)
        .symbol(symbol)
        .u32(size)
        .price(price)
        .build()
}

pub fn system_event_bytes(code: u8, ts: i64) -> Vec<u8> {
    MessageBuilder::new(MessageType::SystemEvent)
        .u8(code)
        .i64(ts)
        .build()
}

/// Builds a segment: a 40-byte header followed by length-prefixed messages.
#[derive(Clone)]
pub struct SegmentBuilder {
    pub version: u8,
    pub protocol_id: u16,
    pub channel_id: u32,
    pub session_id: u32,
    pub stream_offset: i64,
    pub first_sequence_number: i64,
    pub send_time: i64,
    pub message_count: Option<u16>,
    pub payload_length: Option<u16>,
    messages: Vec<Vec<u8>>,
}

impl SegmentBuilder {
    pub fn new(protocol_id: u16) -> Self {
        Self {
            version: 1,
            protocol_id,
            channel_id: crate::CHANNEL_ID,
            session_id: 0x4320_0000,
            stream_offset: 0,
            first_sequence_number: 1,
            send_time: 1_517_070_600_000_000_000,
            message_count: None,
            payload_length: None,
            messages: Vec::new(),
        }
    }

    pub fn message(mut self, body: Vec<u8>) -> Self {
        self.messages.push(body);
        self
    }

    pub fn first_sequence_number(mut self, seq: i64) -> Self {
        self.first_sequence_number = seq;
        self
    }

    pub fn message_count(mut self, count: u16) -> Self {
        self.message_count = Some(count);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut payload = Vec::new();
        for msg in self.messages.iter() {
            payload.extend_from_slice(&(msg.len() as u16).to_le_bytes());
            payload.extend_from_slice(msg);
        }
        let mut buf = Vec::with_capacity(crate::SEGMENT_HEADER_LEN + payload.len());
        buf.push(self.version);
        buf.push(0);
        buf.extend_from_slice(&self.protocol_id.to_le_bytes());
        buf.extend_from_slice(&self.channel_id.to_le_bytes());
        buf.extend_from_slice(&self.session_id.to_le_bytes());
        buf.extend_from_slice(
            &self
                .payload_length
                .unwrap_or(payload.len() as u16)
                .to_le_bytes(),
        );
        buf.extend_from_slice(
            &self
                .message_count
                .unwrap_or(self.messages.len() as u16)
                .to_le_bytes(),
        );
        buf.extend_from_slice(&self.stream_offset.to_le_bytes());
        buf.extend_from_slice(&self.first_sequence_number.to_le_bytes());
        buf.extend_from_slice(&self.send_time.to_le_bytes());
        buf.extend_from_slice(&payload);
        buf
    }
}

const SRC_IP: [u8; 4] = [10, 0, 0, 1];
const DST_IP: [u8; 4] = [233, 215, 21, 4];
const DST_PORT: u16 = 10_378;

/// Wraps `payload` in IPv4 and UDP headers. Checksums are left zeroed.
pub fn ipv4_udp_packet(payload: &[u8]) -> Vec<u8> {
    let udp_len = 8 + payload.len() as u16;
    let total_len = 20 + udp_len;
    let mut buf = Vec::with_capacity(total_len as usize);
    // IPv4: version 4, IHL 5
    buf.extend_from_slice(&[0x45, 0x00]);
    buf.extend_from_slice(&total_len.to_be_bytes());
    // identification, flags: don't fragment
    buf.extend_from_slice(&[0x00, 0x00, 0x40, 0x00]);
    // TTL, protocol UDP, checksum
    buf.extend_from_slice(&[64, 17, 0, 0]);
    buf.extend_from_slice(&SRC_IP);
    buf.extend_from_slice(&DST_IP);
    // UDP
    buf.extend_from_slice(&DST_PORT.to_be_bytes());
    buf.extend_from_slice(&DST_PORT.to_be_bytes());
    buf.extend_from_slice(&udp_len.to_be_bytes());
    buf.extend_from_slice(&[0, 0]);
    buf.extend_from_slice(payload);
    buf
}

/// Wraps `payload` in Ethernet, IPv4, and UDP headers.
pub fn ethernet_udp_frame(payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&[0x01, 0x00, 0x5E, 0x57, 0x15, 0x04]);
    buf.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
    // ether type IPv4
    buf.extend_from_slice(&[0x08, 0x00]);
    buf.extend_from_slice(&ipv4_udp_packet(payload));
    buf
}

/// An Ethernet frame carrying an ARP request, which has no application payload.
pub fn ethernet_arp_frame() -> Vec<u8> {
    let mut buf = vec![0xFF; 6];
    buf.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
    buf.extend_from_slice(&[0x08, 0x06]);
    buf.extend_from_slice(&[0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01]);
    buf.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
    buf.extend_from_slice(&SRC_IP);
    buf.extend_from_slice(&[0; 6]);
    buf.extend_from_slice(&DST_IP);
    buf
}

pub const LINKTYPE_ETHERNET: u32 = 1;
pub const LINKTYPE_RAW: u32 = 101;

/// Builds a classic little-endian, microsecond-resolution pcap file.
pub fn pcap_bytes(link_type: u32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&0xA1B2_C3D4_u32.to_le_bytes());
    buf.extend_from_slice(&2_u16.to_le_bytes());
    buf.extend_from_slice(&4_u16.to_le_bytes());
    // thiszone, sigfigs
    buf.extend_from_slice(&[0; 8]);
    buf.extend_from_slice(&65_535_u32.to_le_bytes());
    buf.extend_from_slice(&link_type.to_le_bytes());
    for (i, frame) in frames.iter().enumerate() {
        buf.extend_from_slice(&1_517_070_600_u32.to_le_bytes());
        buf.extend_from_slice(&(i as u32).to_le_bytes());
        buf.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        buf.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        buf.extend_from_slice(frame);
    }
    buf
}

fn pcapng_block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let padded_len = (body.len() + 3) / 4 * 4;
    let total_len = (12 + padded_len) as u32;
    let mut buf = Vec::with_capacity(total_len as usize);
    buf.extend_from_slice(&block_type.to_le_bytes());
    buf.extend_from_slice(&total_len.to_le_bytes());
    buf.extend_from_slice(body);
    buf.resize(8 + padded_len, 0);
    buf.extend_from_slice(&total_len.to_le_bytes());
    buf
}

/// Builds a little-endian pcap-ng file with a single section and interface. Frames
/// are written as enhanced packet blocks.
pub fn pcapng_bytes(link_type: u16, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = Vec::new();
    // section header: byte order magic, version 1.0, unknown section length
    let mut shb = Vec::new();
    shb.extend_from_slice(&0x1A2B_3C4D_u32.to_le_bytes());
    shb.extend_from_slice(&1_u16.to_le_bytes());
    shb.extend_from_slice(&0_u16.to_le_bytes());
    shb.extend_from_slice(&(-1_i64).to_le_bytes());
    buf.extend_from_slice(&pcapng_block(0x0A0D_0D0A, &shb));
    // interface description
    let mut idb = Vec::new();
    idb.extend_from_slice(&link_type.to_le_bytes());
    idb.extend_from_slice(&0_u16.to_le_bytes());
    idb.extend_from_slice(&65_535_u32.to_le_bytes());
    buf.extend_from_slice(&pcapng_block(0x0000_0001, &idb));
    for (i, frame) in frames.iter().enumerate() {
        let mut epb = Vec::new();
        epb.extend_from_slice(&0_u32.to_le_bytes());
        // timestamp high and low, microseconds
        epb.extend_from_slice(&0x0005_63D0_u32.to_le_bytes());
        epb.extend_from_slice(&(i as u32).to_le_bytes());
        epb.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        epb.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        epb.extend_from_slice(frame);
        buf.extend_from_slice(&pcapng_block(0x0000_0006, &epb));
    }
    buf
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    use std::io::Write;

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

pub fn zstd(bytes: &[u8]) -> Vec<u8> {
    ::zstd::stream::encode_all(bytes, 0).unwrap()
}
