//! Shared tracing/logging initialization.
//!
//! Hosts embedding the dispatcher and the `cmdtree` binary set up
//! `tracing_subscriber` the same way: an env-filter plus optional JSON output.
//! Log lines always go to stderr so they never mix with command output.

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Install the global tracing subscriber described by `logging`, writing to stderr.
///
/// `RUST_LOG` takes precedence over `logging.filter`. Fails instead of
/// panicking when a global subscriber is already installed.
pub fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    init_tracing_with_writer(logging, std::io::stderr)
}

/// Same as [`init_tracing`], with an explicit destination for both formats.
pub fn init_tracing_with_writer<W>(logging: &LoggingConfig, writer: W) -> Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| logging.filter.clone()),
    );
    let installed = if logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .try_init()
    };
    installed.map_err(|e| Error::Tracing(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    // The only test in this binary that installs a global subscriber.
    #[test]
    fn json_logs_reach_the_given_writer_and_second_install_fails() {
        let captured = Captured::default();
        let sink = captured.clone();
        let logging = LoggingConfig {
            filter: "trace".to_string(),
            json: true,
        };

        init_tracing_with_writer(&logging, move || sink.clone()).unwrap();
        tracing::error!(command = "warn", "handler failed");

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let line = output.lines().find(|line| line.contains("handler failed")).unwrap();
        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(event["level"], "ERROR");
        assert_eq!(event["fields"]["command"], "warn");

        let again = init_tracing(&LoggingConfig::default());
        assert!(matches!(again, Err(Error::Tracing(_))));
    }
}
