use std::{io, num::NonZeroU64, sync::Arc};

use iextp::{
    sink::{replay, BarConsolidator, BarSink, MessageSink},
    source::{CaptureSource, PacketSource, UdpSource},
    Bar, BarAggregator, Message, ProtocolRegistry, Scanner,
};
use tracing::info;

use crate::{output_from_args, Args, STDIN_SENTINEL};

/// Writes each message as a line of JSON.
pub struct JsonSink<W: io::Write> {
    writer: W,
}

impl<W: io::Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: io::Write> MessageSink for JsonSink<W> {
    fn send_message(&mut self, msg: Message) -> iextp::Result<()> {
        serde_json::to_writer(&mut self.writer, &msg)
            .map_err(|e| iextp::Error::io(e.into(), "serializing message to JSON"))?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| iextp::Error::io(e, "writing message"))
    }

    fn flush(&mut self) -> iextp::Result<()> {
        self.writer
            .flush()
            .map_err(|e| iextp::Error::io(e, "flushing output"))
    }
}

/// Writes bars as CSV with a header row.
pub struct CsvBarSink<W: io::Write> {
    writer: csv::Writer<W>,
}

impl<W: io::Write> CsvBarSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }
}

impl<W: io::Write> BarSink for CsvBarSink<W> {
    fn send_bar(&mut self, bar: Bar) -> iextp::Result<()> {
        self.writer
            .serialize(bar)
            .map_err(|e| iextp::Error::io(e.into(), "serializing bar to CSV"))
    }

    fn flush(&mut self) -> iextp::Result<()> {
        self.writer
            .flush()
            .map_err(|e| iextp::Error::io(e, "flushing output"))
    }
}

/// Ends the stream once the live source's read timeout elapses.
struct IdleTimeout(UdpSource);

impl PacketSource for IdleTimeout {
    fn next_payload(&mut self) -> iextp::Result<Option<Vec<u8>>> {
        match self.0.next_payload() {
            Err(e) if e.is_timeout() => {
                info!("No datagram received before the read timeout, stopping");
                Ok(None)
            }
            res => res,
        }
    }
}

/// Replays the source selected by `args` to the output selected by `args`.
pub fn run(args: &Args) -> anyhow::Result<()> {
    let registry = Arc::new(ProtocolRegistry::default());
    if let Some(addr) = args.udp {
        let mut builder = UdpSource::builder()
            .bind_addr(addr)
            .read_timeout(args.read_timeout());
        if let Some(group) = args.multicast_group {
            builder = builder.multicast_group(group);
        }
        if let Some(interface) = args.interface {
            builder = builder.interface(interface);
        }
        let source = IdleTimeout(builder.build()?);
        write_output(Scanner::new(source, registry), args)
    } else {
        match args.input.as_deref() {
            Some(path) if path.as_os_str() != STDIN_SENTINEL => write_output(
                Scanner::new(CaptureSource::from_file(path)?, registry),
                args,
            ),
            _ => write_output(
                Scanner::new(
                    CaptureSource::inferred_with_buffer(io::stdin().lock())?,
                    registry,
                ),
                args,
            ),
        }
    }
}

fn write_output<S: PacketSource>(mut scanner: Scanner<S>, args: &Args) -> anyhow::Result<()> {
    let writer = output_from_args(args)?;
    let res = if args.bars {
        let mut consolidator = BarConsolidator::new(
            BarAggregator::new(args.bar_interval()),
            CsvBarSink::new(writer),
        );
        write_messages(&mut scanner, &mut consolidator, args.limit)
            .and_then(|count| consolidator.finish().map(|_| count))
    } else {
        write_messages(&mut scanner, JsonSink::new(writer), args.limit)
    };
    match res {
        Ok(count) => {
            info!(count, "Finished replay");
            Ok(())
        }
        // Handle broken pipe as a non-error.
        Err(iextp::Error::Io { source, .. }) if source.kind() == io::ErrorKind::BrokenPipe => {
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn write_messages<S: PacketSource, K: MessageSink>(
    scanner: &mut Scanner<S>,
    mut sink: K,
    limit: Option<NonZeroU64>,
) -> iextp::Result<u64> {
    let Some(limit) = limit else {
        return replay(scanner, sink);
    };
    let mut count = 0;
    while let Some(msg) = scanner.next_message()? {
        sink.send_message(msg)?;
        count += 1;
        if count >= limit.get() {
            break;
        }
    }
    sink.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use iextp::UnsupportedMsg;

    use super::*;

    #[test]
    fn test_json_sink() {
        let mut buf = Vec::new();
        let mut sink = JsonSink::new(&mut buf);
        sink.send_message(Message::Unsupported(UnsupportedMsg {
            message_type: 0x7A,
            data: vec![0x7A, 0x01],
        }))
        .unwrap();
        MessageSink::flush(&mut sink).unwrap();
        drop(sink);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "{\"kind\":\"Unsupported\",\"message_type\":122,\"data\":[122,1]}\n"
        );
    }

    #[test]
    fn test_csv_bar_sink() {
        let mut buf = Vec::new();
        let mut sink = CsvBarSink::new(&mut buf);
        sink.send_bar(Bar {
            symbol: "ZIEXT".to_owned(),
            open_time: 0,
            close_time: 60_000_000_000,
            open: 10.0,
            high: 12.5,
            low: 9.0,
            close: 9.0,
            volume: 350,
        })
        .unwrap();
        BarSink::flush(&mut sink).unwrap();
        drop(sink);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "symbol,open_time,close_time,open,high,low,close,volume\nZIEXT,0,60000000000,10.0,12.5,9.0,9.0,350\n"
        );
    }
}
