//! Console and log-file output
//!
//! The console shows bare messages; the log file gets the same events with
//! an RFC 3339 timestamp and their structured fields. The file is appended
//! to and never rotated.

use std::fmt::Debug;
use std::path::Path;

use tracing::field::Field;
use tracing::Subscriber;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::{debug_fn, Writer};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::error::{ClaimError, Result};

/// Install the global subscriber writing to stdout and `log_file`
pub fn init(log_file: &Path) -> Result<()> {
    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .ok_or_else(|| ClaimError::config(format!("log file has no name: {}", log_file.display())))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)
        .map_err(|e| ClaimError::io(e.to_string(), Some(log_file.to_string_lossy().to_string())))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(false)
        .with_timer(ChronoUtc::rfc_3339());

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer(std::io::stdout))
        .with(file)
        .try_init()
        .map_err(|e| ClaimError::internal(format!("Failed to install logger: {}", e)))
}

/// Layer printing only each event's message, without level, time or fields
fn console_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .without_time()
        .with_target(false)
        .with_level(false)
        .with_ansi(false)
        .fmt_fields(debug_fn(message_only))
}

fn message_only(writer: &mut Writer<'_>, field: &Field, value: &dyn Debug) -> std::fmt::Result {
    if field.name() == "message" {
        write!(writer, "{:?}", value)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io::Write;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_console_prints_bare_message() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::registry().with(console_layer(move || writer.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(username = "abcde", account = "a@example.com", "Processing abcde with a@example.com...");
        });

        let output = String::from_utf8(captured.0.lock().clone()).unwrap();
        assert_eq!(output.trim(), "Processing abcde with a@example.com...");
        assert!(!output.contains('\u{1b}'));
    }
}
