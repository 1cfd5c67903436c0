//! logging
//!
//! Subscriber setup and the error counter behind the exit status.
//!
//! Every data violation is logged at ERROR, so the number of ERROR events
//! after a run is the number of problems found. [`ErrorCounter`] counts them
//! regardless of the display filter, so `--quiet` hides output without
//! changing the exit status.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Environment variable overriding the display filter.
pub const LOG_ENV: &str = "BILARA_CHECK_LOG";

/// Counts ERROR events. Clones share the count.
#[derive(Debug, Clone, Default)]
pub struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// ERROR events seen so far.
    pub fn count(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }
}

fn default_directive(debug: bool, quiet: bool) -> &'static str {
    if debug {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    }
}

/// Install the global subscriber and return its error counter.
///
/// Output goes to stderr. `$BILARA_CHECK_LOG` overrides the level chosen by
/// the flags. If a subscriber is already installed the counter is returned
/// unattached and counts nothing.
pub fn init(debug: bool, quiet: bool) -> ErrorCounter {
    let counter = ErrorCounter::new();
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug, quiet)));

    let display = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    let _ = tracing_subscriber::registry()
        .with(display)
        .with(counter.clone())
        .try_init();
    counter
}
