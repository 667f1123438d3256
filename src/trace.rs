// Tracing definitions
//

use std::io;

use gloo_console as console;
use tracing::{subscriber::set_global_default, Level, Metadata, Subscriber};
use tracing_subscriber::{
    filter,
    fmt::MakeWriter,
    layer::{Layer, SubscriberExt},
    Registry,
};

use crate::error::Result;

pub struct TracingSubscriber {
    crate_level: Level,
    default_level: Level,
}

impl Default for TracingSubscriber {
    fn default() -> Self {
        Self {
            crate_level: Level::INFO,
            default_level: Level::WARN,
        }
    }
}

impl TracingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn crate_level(mut self, value: Level) -> Self {
        self.crate_level = value;
        self
    }

    #[allow(unused)]
    pub fn default_level(mut self, value: Level) -> Self {
        self.default_level = value;
        self
    }

    /// Routes events to the browser console.
    pub fn set_global_default(self) -> Result<()> {
        set_global_default(self.build(ConsoleMakeWriter))?;
        Ok(())
    }

    pub fn build<W>(self, writer: W) -> impl Subscriber + Send + Sync
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let target_filter = filter::Targets::new()
            .with_target(env!("CARGO_CRATE_NAME"), self.crate_level)
            .with_default(self.default_level);

        // std has no clock on wasm32-unknown-unknown
        Registry::default().with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(writer)
                .with_filter(target_filter),
        )
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Console method an event ends up in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Debug,
}

impl From<Level> for ConsoleMethod {
    fn from(level: Level) -> Self {
        match level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }
}

/// Buffers one formatted event and hands it to the console on drop.
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }

    // None for blank output, so nothing reaches the console
    fn take_line(&mut self) -> Option<String> {
        let buffer = std::mem::take(&mut self.buffer);
        let line = String::from_utf8_lossy(&buffer);
        let line = line.trim_end();

        (!line.is_empty()).then(|| line.to_owned())
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let Some(line) = self.take_line() else {
            return;
        };

        match ConsoleMethod::from(self.level) {
            ConsoleMethod::Error => console::error!(line),
            ConsoleMethod::Warn => console::warn!(line),
            ConsoleMethod::Info => console::info!(line),
            ConsoleMethod::Debug => console::debug!(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::assert_none;
    use std::io::Write;

    // console calls only exist in the browser, so every writer here
    // must be empty by the time it drops

    #[test]
    fn level_picks_console_method() {
        assert_eq!(ConsoleMethod::from(Level::ERROR), ConsoleMethod::Error);
        assert_eq!(ConsoleMethod::from(Level::WARN), ConsoleMethod::Warn);
        assert_eq!(ConsoleMethod::from(Level::INFO), ConsoleMethod::Info);
        assert_eq!(ConsoleMethod::from(Level::DEBUG), ConsoleMethod::Debug);
        assert_eq!(ConsoleMethod::from(Level::TRACE), ConsoleMethod::Debug);
    }

    #[test]
    fn writer_follows_event_level() {
        tracing::subscriber::with_default(Registry::default(), || {
            let span = tracing::warn_span!("flush");
            let meta = span.metadata().expect("registry enables every span");

            assert_eq!(ConsoleMakeWriter.make_writer_for(meta).level, Level::WARN);
        });

        assert_eq!(ConsoleMakeWriter.make_writer().level, Level::INFO);
    }

    #[test]
    fn writes_are_buffered_into_one_line() {
        let mut writer = ConsoleMakeWriter.make_writer();
        write!(writer, "theme update ").unwrap();
        writeln!(writer, "sent").unwrap();

        assert_eq!(writer.take_line().as_deref(), Some("theme update sent"));
        // already taken, so dropping emits nothing
        assert_none!(writer.take_line());
    }

    #[test]
    fn blank_output_is_not_emitted() {
        let mut writer = ConsoleWriter::new(Level::ERROR);
        assert_none!(writer.take_line());

        writeln!(writer, "  ").unwrap();
        assert_none!(writer.take_line());
    }
}
