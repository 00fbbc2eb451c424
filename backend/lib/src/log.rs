//! Logging setup for the market backend
//!
//! - JSON logging in Bunyan format or human-readable text
//! - `auto` picks JSON when stdout is not a TTY, text otherwise
//! - Bunyan output has its `log.` field prefix renamed to `market_log.`, a prefix
//!   reserved by common log ingestion tools

use std::io::Write;

use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::{config::LogFormat, constants::service::SERVICE_NAME};

/// Filter used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "info";

/// Writer replacing the `"log.` prefix of Bunyan fields with `"market_log.`
struct PrefixReplacingWriter<W: Write> {
    inner: W,
}

impl<W: Write> PrefixReplacingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for PrefixReplacingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match std::str::from_utf8(buf) {
            Ok(s) => {
                let replaced = s.replace("\"log.", "\"market_log.");
                self.inner.write_all(replaced.as_bytes())?;
                Ok(buf.len())
            }
            Err(_) => self.inner.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

struct PrefixReplacingMakeWriter;

impl<'a> MakeWriter<'a> for PrefixReplacingMakeWriter {
    type Writer = PrefixReplacingWriter<std::io::Stdout>;

    fn make_writer(&'a self) -> Self::Writer {
        PrefixReplacingWriter::new(std::io::stdout())
    }
}

/// Install the global tracing subscriber for the given format.
///
/// Panics if a global subscriber is already installed.
pub fn initialize_logging(log_format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match log_format.resolve() {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new(
                    SERVICE_NAME.to_string(),
                    PrefixReplacingMakeWriter,
                ))
                .init();
        }
        LogFormat::Text | LogFormat::Auto => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renames_log_prefixed_fields() {
        let mut writer = PrefixReplacingWriter::new(Vec::new());
        writer
            .write_all(br#"{"log.target":"market","msg":"see log.keep"}"#)
            .unwrap();

        assert_eq!(
            String::from_utf8(writer.inner).unwrap(),
            r#"{"market_log.target":"market","msg":"see log.keep"}"#
        );
    }
}
