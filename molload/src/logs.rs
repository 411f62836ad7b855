//! Run logging.
//!
//! Two streams share one `tracing` subscriber:
//! - the *basic* stream (target `molload`) carries settings, paths and summaries;
//! - the *event* stream (target `event`) carries what an operator watching the
//!   dataset needs to see: processing start, record failures, fatal problems.
//!
//! Filtering follows `RUST_LOG`, defaulting to `info`.

use tracing::{error, info, warn};

/// Target of the basic stream.
pub const BASIC_TARGET: &str = "molload";

/// Target of the event stream.
pub const EVENT_TARGET: &str = "event";

/// Install the global subscriber. Safe to call more than once.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Basic stream, informational.
pub fn log_info(msg: impl AsRef<str>) {
    info!(target: BASIC_TARGET, "{}", msg.as_ref());
}

/// Event stream, informational.
pub fn log_event(msg: impl AsRef<str>) {
    info!(target: EVENT_TARGET, "{}", msg.as_ref());
}

/// Event stream, recoverable problem.
pub fn log_event_warning(msg: impl AsRef<str>) {
    warn!(target: EVENT_TARGET, "{}", msg.as_ref());
}

/// Event stream, fatal problem.
pub fn log_event_error(msg: impl AsRef<str>) {
    error!(target: EVENT_TARGET, "{}", msg.as_ref());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_streams_use_their_own_targets() {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            log_info("settings echoed");
            log_event_warning("record failed");
        });

        let text = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains(" molload: settings echoed"));
        assert!(text.contains(" event: record failed"));
        assert!(!text.contains("molload::logs"));
    }
}
