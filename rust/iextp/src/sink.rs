//! Destinations for decoded messages and bars.
use std::{io, sync::mpsc};

use crate::{source::PacketSource, Bar, BarAggregator, Message, Scanner};

/// Trait for types that consume decoded messages one at a time, in wire order.
pub trait MessageSink {
    /// Consumes one message.
    ///
    /// # Errors
    /// This function returns an error if the message can't be delivered.
    fn send_message(&mut self, msg: Message) -> crate::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    /// This function returns an error if the buffered output can't be delivered.
    fn flush(&mut self) -> crate::Result<()> {
        Ok(())
    }
}

/// Trait for types that consume bars one at a time.
pub trait BarSink {
    /// Consumes one bar.
    ///
    /// # Errors
    /// This function returns an error if the bar can't be delivered.
    fn send_bar(&mut self, bar: Bar) -> crate::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    /// This function returns an error if the buffered output can't be delivered.
    fn flush(&mut self) -> crate::Result<()> {
        Ok(())
    }
}

impl MessageSink for Vec<Message> {
    fn send_message(&mut self, msg: Message) -> crate::Result<()> {
        self.push(msg);
        Ok(())
    }
}

impl BarSink for Vec<Bar> {
    fn send_bar(&mut self, bar: Bar) -> crate::Result<()> {
        self.push(bar);
        Ok(())
    }
}

fn disconnected(context: &str) -> crate::Error {
    crate::Error::io(
        io::Error::new(io::ErrorKind::BrokenPipe, "receiver disconnected"),
        context,
    )
}

impl MessageSink for mpsc::Sender<Message> {
    fn send_message(&mut self, msg: Message) -> crate::Result<()> {
        self.send(msg).map_err(|_| disconnected("sending message"))
    }
}

impl BarSink for mpsc::Sender<Bar> {
    fn send_bar(&mut self, bar: Bar) -> crate::Result<()> {
        self.send(bar).map_err(|_| disconnected("sending bar"))
    }
}

impl<S> MessageSink for &mut S
where
    S: MessageSink + ?Sized,
{
    fn send_message(&mut self, msg: Message) -> crate::Result<()> {
        (**self).send_message(msg)
    }

    fn flush(&mut self) -> crate::Result<()> {
        MessageSink::flush(&mut **self)
    }
}

impl<S> BarSink for &mut S
where
    S: BarSink + ?Sized,
{
    fn send_bar(&mut self, bar: Bar) -> crate::Result<()> {
        (**self).send_bar(bar)
    }

    fn flush(&mut self) -> crate::Result<()> {
        BarSink::flush(&mut **self)
    }
}

/// Adapts a closure into a [`MessageSink`] or [`BarSink`].
///
/// # Example
/// ```
/// use iextp::{sink::{FnSink, MessageSink}, Message, UnsupportedMsg};
///
/// # fn main() -> iextp::Result<()> {
/// let mut count = 0;
/// let mut sink = FnSink(|_msg: Message| -> iextp::Result<()> {
///     count += 1;
///     Ok(())
/// });
/// sink.send_message(Message::Unsupported(UnsupportedMsg {
///     message_type: 0x7A,
///     data: vec![0x7A],
/// }))?;
/// drop(sink);
/// assert_eq!(count, 1);
/// # Ok(())
/// # }
/// ```
pub struct FnSink<F>(pub F);

impl<F> MessageSink for FnSink<F>
where
    F: FnMut(Message) -> crate::Result<()>,
{
    fn send_message(&mut self, msg: Message) -> crate::Result<()> {
        (self.0)(msg)
    }
}

impl<F> BarSink for FnSink<F>
where
    F: FnMut(Bar) -> crate::Result<()>,
{
    fn send_bar(&mut self, bar: Bar) -> crate::Result<()> {
        (self.0)(bar)
    }
}

/// A [`MessageSink`] that consolidates trade reports into bars with a
/// [`BarAggregator`] and forwards each completed window's bars to a [`BarSink`].
/// Other messages are dropped.
pub struct BarConsolidator<B> {
    aggregator: BarAggregator,
    bars: B,
}

impl<B> BarConsolidator<B>
where
    B: BarSink,
{
    /// Creates a new [`BarConsolidator`] writing bars from `aggregator` to `bars`.
    pub fn new(aggregator: BarAggregator, bars: B) -> Self {
        Self { aggregator, bars }
    }

    /// Sends the bars of the final window and returns the inner sink.
    ///
    /// # Errors
    /// This function returns an error if the inner sink fails.
    pub fn finish(mut self) -> crate::Result<B> {
        for bar in self.aggregator.finish() {
            self.bars.send_bar(bar)?;
        }
        BarSink::flush(&mut self.bars)?;
        Ok(self.bars)
    }
}

impl<B> MessageSink for BarConsolidator<B>
where
    B: BarSink,
{
    fn send_message(&mut self, msg: Message) -> crate::Result<()> {
        for bar in self.aggregator.push_message(&msg) {
            self.bars.send_bar(bar)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> crate::Result<()> {
        BarSink::flush(&mut self.bars)
    }
}

/// Drives `scanner` until its source is exhausted, sending every message to `sink`
/// in wire order, then flushes `sink`. Returns the number of messages sent.
///
/// # Errors
/// This function returns an error if the scanner or the sink fails. Messages sent
/// before the error remain in `sink`.
pub fn replay<S, K>(scanner: &mut Scanner<S>, mut sink: K) -> crate::Result<u64>
where
    S: PacketSource,
    K: MessageSink,
{
    let mut count = 0;
    while let Some(msg) = scanner.next_message()? {
        sink.send_message(msg)?;
        count += 1;
    }
    sink.flush()?;
    Ok(count)
}
