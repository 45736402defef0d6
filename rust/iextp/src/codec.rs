//! Field codecs for the primitive IEX-TP data types: little-endian integers,
//! timestamps, fixed-point prices, and space-padded ASCII strings.
//!
//! All functions are pure and expect the caller to have checked the buffer length
//! against the fixed layout of the enclosing message.

use std::mem;

use time::OffsetDateTime;

use crate::FIXED_PRICE_SCALE;

pub(crate) trait FromLittleEndianSlice {
    /// Reads `Self` from the start of `slice`.
    ///
    /// # Panics
    /// Panics if `slice` is shorter than `Self`.
    fn from_le_slice(slice: &[u8]) -> Self;
}

macro_rules! impl_from_le_slice {
    ($($t:ty),+) => {
        $(
            impl FromLittleEndianSlice for $t {
                fn from_le_slice(slice: &[u8]) -> Self {
                    let mut bytes = [0; mem::size_of::<$t>()];
                    bytes.copy_from_slice(&slice[..mem::size_of::<$t>()]);
                    Self::from_le_bytes(bytes)
                }
            }
        )+
    };
}

impl_from_le_slice!(u16, u32, u64, i64);

/// Parses a full timestamp: 8 bytes, a signed count of nanoseconds since the UNIX
/// epoch.
pub fn parse_timestamp(buf: &[u8]) -> i64 {
    i64::from_le_slice(buf)
}

/// Parses an event time: 4 bytes, an unsigned count of seconds since the UNIX
/// epoch.
pub fn parse_event_time(buf: &[u8]) -> u32 {
    u32::from_le_slice(buf)
}

/// Parses a price: 8 bytes, a signed fixed-point number with 4 implied decimal
/// places.
pub fn parse_price(buf: &[u8]) -> f64 {
    i64::from_le_slice(buf) as f64 / FIXED_PRICE_SCALE as f64
}

/// Parses a fixed-width ASCII string, left justified and space filled on the
/// right. Only trailing spaces are removed.
///
/// # Errors
/// This function returns an error if `buf` contains non-ASCII bytes.
pub fn parse_string(buf: &[u8]) -> crate::Result<String> {
    if !buf.is_ascii() {
        return Err(crate::Error::InvalidString {
            bytes: buf.to_vec(),
        });
    }
    let end = buf
        .iter()
        .rposition(|&b| b != b' ')
        .map_or(0, |last| last + 1);
    // ASCII is always valid UTF-8
    Ok(buf[..end].iter().map(|&b| b as char).collect())
}

/// Converts a nanosecond timestamp into a UTC datetime.
pub fn ts_to_dt(ts: i64) -> OffsetDateTime {
    // the full range of i64 nanoseconds is within the range of `OffsetDateTime`
    OffsetDateTime::UNIX_EPOCH + time::Duration::nanoseconds(ts)
}

/// Converts a seconds-resolution event time into a UTC datetime.
pub fn event_time_to_dt(secs: u32) -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH + time::Duration::seconds(i64::from(secs))
}

#[cfg(test)]
mod tests {
    use rstest::*;
    use time::macros::datetime;

    use super::*;

    #[test]
    fn test_parse_timestamp() {
        let ts = 1_517_070_600_123_456_789_i64;
        assert_eq!(parse_timestamp(&ts.to_le_bytes()), ts);
        assert_eq!(ts_to_dt(ts), datetime!(2018-01-27 16:30:00.123456789 UTC));
    }

    #[test]
    fn test_parse_negative_timestamp() {
        let ts = -1_000_000_000_i64;
        assert_eq!(parse_timestamp(&ts.to_le_bytes()), ts);
        assert_eq!(ts_to_dt(ts), datetime!(1969-12-31 23:59:59 UTC));
    }

    #[test]
    fn test_parse_event_time() {
        let secs = 1_517_070_600_u32;
        assert_eq!(parse_event_time(&secs.to_le_bytes()), secs);
        assert_eq!(event_time_to_dt(secs), datetime!(2018-01-27 16:30:00 UTC));
    }

    #[rstest]
    #[case::whole(1_000_000, 100.0)]
    #[case::fractional(995_000, 99.5)]
    #[case::four_places(1_234, 0.1234)]
    #[case::zero(0, 0.0)]
    #[case::negative(-25_000, -2.5)]
    fn test_parse_price(#[case] raw: i64, #[case] exp: f64) {
        assert_eq!(parse_price(&raw.to_le_bytes()), exp);
    }

    #[rstest]
    #[case::padded(b"AAPL    ", "AAPL")]
    #[case::full(b"ZIEXT.AB", "ZIEXT.AB")]
    #[case::blank(b"        ", "")]
    #[case::inner_space(b"BRK A   ", "BRK A")]
    #[case::leading_space(b"  IBM   ", "  IBM")]
    fn test_parse_string(#[case] bytes: &[u8], #[case] exp: &str) {
        assert_eq!(parse_string(bytes).unwrap(), exp);
    }

    #[test]
    fn test_parse_string_non_ascii() {
        let res = parse_string(b"AB\xC3\xA9    ");
        assert!(matches!(res, Err(crate::Error::InvalidString { bytes }) if bytes.len() == 8));
    }

    #[test]
    fn test_from_le_slice_ignores_trailing() {
        assert_eq!(u16::from_le_slice(&[0x04, 0x80, 0xFF]), 0x8004);
        assert_eq!(u32::from_le_slice(&[1, 0, 0, 0, 9]), 1);
    }
}
