use std::io::{self, Write};

use indicatif::ProgressBar;
use tracing_subscriber::fmt::MakeWriter;

/// Whether `NO_COLOR` is set to a non-empty value.
pub(crate) fn no_color_env_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}

pub(crate) fn should_disable_color(
    no_color_flag: bool,
    no_color_env: bool,
    stdout_is_terminal: bool,
) -> bool {
    no_color_flag || no_color_env || !stdout_is_terminal
}

/// Log sink for stdout that hides `bar` while each event is written.
#[derive(Clone)]
pub(crate) struct SuspendingStdout {
    bar: ProgressBar,
}

impl SuspendingStdout {
    pub(crate) fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

/// One formatted event, flushed to stdout under `ProgressBar::suspend` on drop.
pub(crate) struct SuspendedEvent {
    bar: ProgressBar,
    buf: Vec<u8>,
}

impl Write for SuspendedEvent {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for SuspendedEvent {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        self.bar.suspend(|| {
            let mut out = io::stdout().lock();
            let _ = out.write_all(&self.buf);
            let _ = out.flush();
        });
    }
}

impl<'a> MakeWriter<'a> for SuspendingStdout {
    type Writer = SuspendedEvent;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendedEvent {
            bar: self.bar.clone(),
            buf: Vec::new(),
        }
    }
}

/// Install the stdout subscriber. `RUST_LOG` overrides `default_level`.
pub(crate) fn init_tracing(default_level: &str, no_color: bool, bar: &ProgressBar) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(SuspendingStdout::new(bar.clone()))
        .with_ansi(!no_color)
        .with_env_filter(filter)
        .try_init();
}
