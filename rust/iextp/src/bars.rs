//! Consolidation of trade reports into OHLCV bars.
use std::{collections::BTreeMap, time::Duration};

use time::OffsetDateTime;
use tracing::debug;

use crate::{codec::ts_to_dt, Message, TradeMsg};

/// An open, high, low, close, and volume aggregate of trades in one symbol.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Bar {
    /// The symbol of every trade in the bar.
    pub symbol: String,
    /// The start of the bar as a number of nanoseconds since the UNIX epoch.
    pub open_time: i64,
    /// The end of the bar as a number of nanoseconds since the UNIX epoch.
    pub close_time: i64,
    /// The price of the first trade.
    pub open: f64,
    /// The highest trade price.
    pub high: f64,
    /// The lowest trade price.
    pub low: f64,
    /// The price of the last trade.
    pub close: f64,
    /// The total number of shares traded.
    pub volume: i64,
}

impl Bar {
    /// Returns the start of the bar as a UTC datetime.
    pub fn open_time(&self) -> OffsetDateTime {
        ts_to_dt(self.open_time)
    }

    /// Returns the end of the bar as a UTC datetime.
    pub fn close_time(&self) -> OffsetDateTime {
        ts_to_dt(self.close_time)
    }

    fn new(first: &TradeMsg) -> Self {
        Self {
            symbol: first.symbol.clone(),
            open_time: first.timestamp,
            close_time: first.timestamp,
            open: first.price,
            high: 0.0,
            low: 0.0,
            close: 0.0,
            volume: 0,
        }
    }

    fn update(&mut self, trade: &TradeMsg) {
        if trade.price > self.high {
            self.high = trade.price;
        }
        // zero means unset: trade prices are always positive
        if self.low == 0.0 || trade.price < self.low {
            self.low = trade.price;
        }
        self.close_time = trade.timestamp;
        self.close = trade.price;
        self.volume += i64::from(trade.size);
    }
}

/// Folds trades in one symbol into a [`Bar`] after sorting them by timestamp. Trades
/// with equal timestamps keep their relative order.
///
/// Returns `None` if `trades` is empty. The symbol is taken from the first trade
/// without checking the rest.
pub fn make_bar(trades: &[TradeMsg]) -> Option<Bar> {
    fold(trades.iter().collect())
}

/// Groups trades by symbol and folds each group into a [`Bar`] with [`make_bar()`].
/// Bars are returned in ascending order of symbol.
pub fn make_bars(trades: &[TradeMsg]) -> Vec<Bar> {
    let mut by_symbol: BTreeMap<&str, Vec<&TradeMsg>> = BTreeMap::new();
    for trade in trades {
        by_symbol.entry(trade.symbol.as_str()).or_default().push(trade);
    }
    by_symbol.into_values().filter_map(fold).collect()
}

fn fold(mut trades: Vec<&TradeMsg>) -> Option<Bar> {
    trades.sort_by_key(|trade| trade.timestamp);
    let mut bar = Bar::new(trades.first()?);
    for trade in trades {
        bar.update(trade);
    }
    Some(bar)
}

/// Accumulates trade reports into bars over fixed windows aligned to multiples of the
/// interval since the UNIX epoch.
///
/// Windows are half-open: a trade exactly at the end of a window starts the next
/// one. Bars take the bounds of their window as their open and close times rather
/// than the times of their first and last trades.
#[derive(Clone, Debug)]
pub struct BarAggregator {
    interval: i64,
    window_start: Option<i64>,
    pending: Vec<TradeMsg>,
}

impl BarAggregator {
    /// The default bar interval.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

    /// Creates a new [`BarAggregator`] with windows of length `interval`.
    ///
    /// # Panics
    /// This function panics if `interval` is zero or doesn't fit in an `i64` number of
    /// nanoseconds.
    pub fn new(interval: Duration) -> Self {
        let interval = i64::try_from(interval.as_nanos())
            .ok()
            .filter(|&interval| interval > 0)
            .unwrap_or_else(|| panic!("invalid bar interval {interval:?}"));
        Self {
            interval,
            window_start: None,
            pending: Vec::new(),
        }
    }

    /// Returns the window length.
    pub fn interval(&self) -> Duration {
        Duration::from_nanos(self.interval as u64)
    }

    /// Adds a trade, returning the bars of the previous window if the trade is at or
    /// past its end. Otherwise returns an empty `Vec`.
    pub fn push(&mut self, trade: TradeMsg) -> Vec<Bar> {
        let mut bars = Vec::new();
        match self.window_start {
            Some(start) if self.in_window(start, trade.timestamp) => {}
            _ => {
                bars = self.flush();
                self.window_start = Some(
                    trade
                        .timestamp
                        .saturating_sub(trade.timestamp.rem_euclid(self.interval)),
                );
            }
        }
        self.pending.push(trade);
        bars
    }

    /// Adds a message if it's a trade report. See [`push()`](Self::push).
    pub fn push_message(&mut self, msg: &Message) -> Vec<Bar> {
        match msg.as_trade_report() {
            Some(trade) => self.push(trade.clone()),
            None => Vec::new(),
        }
    }

    /// Returns the bars of the current, possibly partial, window and resets the
    /// aggregator.
    pub fn finish(&mut self) -> Vec<Bar> {
        let bars = self.flush();
        self.window_start = None;
        bars
    }

    // The last window before `i64::MAX` is unbounded.
    fn in_window(&self, start: i64, ts: i64) -> bool {
        start.checked_add(self.interval).map_or(true, |end| ts < end)
    }

    fn flush(&mut self) -> Vec<Bar> {
        let Some(start) = self.window_start else {
            return Vec::new();
        };
        let mut bars = make_bars(&self.pending);
        for bar in bars.iter_mut() {
            bar.open_time = start;
            bar.close_time = start.saturating_add(self.interval);
        }
        debug!(
            window_start = start,
            trades = self.pending.len(),
            bars = bars.len(),
            "Flushed bar window"
        );
        self.pending.clear();
        bars
    }
}

impl Default for BarAggregator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;
    use crate::{test_utils::trade_report_bytes, WireMessage};

    const MINUTE: i64 = 60_000_000_000;
    const OPEN: i64 = 1_517_070_600_000_000_000;

    fn trade(symbol: &str, ts: i64, size: u32, price: f64) -> TradeMsg {
        TradeMsg::decode(&trade_report_bytes(symbol, ts, size, price, ts)).unwrap()
    }

    #[test]
    fn test_make_bar() {
        let trades = vec![
            trade("ZIEXT", OPEN + 1, 100, 10.0),
            trade("ZIEXT", OPEN + 2, 200, 12.5),
            trade("ZIEXT", OPEN + 3, 50, 9.0),
        ];
        let bar = make_bar(&trades).unwrap();
        assert_eq!(
            bar,
            Bar {
                symbol: "ZIEXT".to_owned(),
                open_time: OPEN + 1,
                close_time: OPEN + 3,
                open: 10.0,
                high: 12.5,
                low: 9.0,
                close: 9.0,
                volume: 350,
            }
        );
    }

    #[test]
    fn test_make_bar_sorts_by_timestamp() {
        let trades = vec![
            trade("ZIEXT", OPEN + 3, 100, 9.0),
            trade("ZIEXT", OPEN + 1, 100, 10.0),
            trade("ZIEXT", OPEN + 2, 100, 12.5),
        ];
        let bar = make_bar(&trades).unwrap();
        assert_eq!(bar.open, 10.0);
        assert_eq!(bar.close, 9.0);
        assert_eq!(bar.open_time, OPEN + 1);
        assert_eq!(bar.close_time, OPEN + 3);
    }

    #[test]
    fn test_make_bar_stable_ties() {
        let trades = vec![
            trade("ZIEXT", OPEN, 100, 10.0),
            trade("ZIEXT", OPEN, 100, 11.0),
        ];
        let bar = make_bar(&trades).unwrap();
        assert_eq!(bar.open, 10.0);
        assert_eq!(bar.close, 11.0);
    }

    #[test]
    fn test_make_bar_empty() {
        assert!(make_bar(&[]).is_none());
    }

    #[test]
    fn test_make_bars() {
        let trades = vec![
            trade("ZVZZT", OPEN + 1, 100, 20.0),
            trade("ZIEXT", OPEN + 2, 100, 10.0),
            trade("ZVZZT", OPEN + 3, 300, 21.0),
        ];
        let bars = make_bars(&trades);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].symbol, "ZIEXT");
        assert_eq!(bars[0].volume, 100);
        assert_eq!(bars[1].symbol, "ZVZZT");
        assert_eq!(bars[1].volume, 400);
        assert_eq!(bars[1].high, 21.0);
        assert_eq!(bars[1].low, 20.0);
    }

    #[test]
    fn test_open_time() {
        let bar = make_bar(&[trade("ZIEXT", OPEN, 1, 1.0)]).unwrap();
        assert_eq!(bar.open_time(), time::macros::datetime!(2018-01-27 16:30 UTC));
    }

    #[test]
    fn test_aggregator() {
        let mut target = BarAggregator::default();
        assert!(target.push(trade("ZIEXT", OPEN + 5, 100, 10.0)).is_empty());
        assert!(target.push(trade("ZVZZT", OPEN + 10, 100, 20.0)).is_empty());
        assert!(target.push(trade("ZIEXT", OPEN + MINUTE - 1, 100, 11.0)).is_empty());
        let bars = target.push(trade("ZIEXT", OPEN + MINUTE, 100, 12.0));
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].symbol, "ZIEXT");
        assert_eq!(bars[0].open_time, OPEN);
        assert_eq!(bars[0].close_time, OPEN + MINUTE);
        assert_eq!(bars[0].close, 11.0);
        assert_eq!(bars[0].volume, 200);
        assert_eq!(bars[1].symbol, "ZVZZT");
        let last = target.finish();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].open_time, OPEN + MINUTE);
        assert_eq!(last[0].open, 12.0);
        assert!(target.finish().is_empty());
    }

    #[test]
    fn test_aggregator_skips_empty_windows() {
        let mut target = BarAggregator::new(Duration::from_secs(60));
        target.push(trade("ZIEXT", OPEN, 100, 10.0));
        let bars = target.push(trade("ZIEXT", OPEN + 10 * MINUTE + 1, 100, 10.0));
        assert_eq!(bars.len(), 1);
        let bars = target.finish();
        assert_eq!(bars[0].open_time, OPEN + 10 * MINUTE);
    }

    #[test]
    fn test_aggregator_window_at_max_timestamp() {
        let mut target = BarAggregator::default();
        assert!(target.push(trade("ZIEXT", i64::MAX - 5, 100, 10.0)).is_empty());
        assert!(target.push(trade("ZIEXT", i64::MAX - 5, 100, 11.0)).is_empty());
        assert!(target.push(trade("ZIEXT", i64::MAX, 100, 12.0)).is_empty());
        let bars = target.finish();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close_time, i64::MAX);
        assert_eq!(bars[0].volume, 300);
        assert_eq!(bars[0].close, 12.0);
    }

    #[test]
    fn test_aggregator_window_at_min_timestamp() {
        let mut target = BarAggregator::default();
        assert!(target.push(trade("ZIEXT", i64::MIN, 100, 10.0)).is_empty());
        assert!(target.push(trade("ZIEXT", i64::MIN + 1, 100, 11.0)).is_empty());
        let bars = target.finish();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].open_time, i64::MIN);
        assert_eq!(bars[0].volume, 200);
    }

    #[rstest]
    #[case::trade_break(crate::message::Message::TradeBreak(trade("ZIEXT", OPEN, 100, 10.0)))]
    #[case::unsupported(crate::message::Message::Unsupported(crate::UnsupportedMsg { message_type: 0x7A, data: vec![0x7A] }))]
    fn test_aggregator_ignores_non_trades(#[case] msg: Message) {
        let mut target = BarAggregator::default();
        assert!(target.push_message(&msg).is_empty());
        assert!(target.finish().is_empty());
    }

    #[test]
    #[should_panic]
    fn test_zero_interval() {
        BarAggregator::new(Duration::ZERO);
    }
}
