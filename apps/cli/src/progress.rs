//! Terminal progress display and the log writer that shares its line.

use std::io::{self, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tgcatalog_crawler::ProgressReporter;
use tracing_subscriber::fmt::MakeWriter;

// ---------------------------------------------------------------------------
// Log writer
// ---------------------------------------------------------------------------

/// `MakeWriter` that hides the progress bar while a log event is written.
///
/// Each event is buffered and flushed to `inner` inside
/// [`ProgressBar::suspend`], so log lines land above the bar instead of
/// through it.
pub(crate) struct SuspendingWriter<M> {
    bar: ProgressBar,
    inner: M,
}

impl<M> SuspendingWriter<M> {
    pub(crate) fn new(bar: ProgressBar, inner: M) -> Self {
        Self { bar, inner }
    }
}

impl<'a, M> MakeWriter<'a> for SuspendingWriter<M>
where
    M: MakeWriter<'a> + 'a,
{
    type Writer = SuspendedEvent<'a, M>;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendedEvent {
            bar: &self.bar,
            inner: &self.inner,
            buf: Vec::new(),
        }
    }
}

/// One buffered log event; written out when dropped.
pub(crate) struct SuspendedEvent<'a, M: MakeWriter<'a>> {
    bar: &'a ProgressBar,
    inner: &'a M,
    buf: Vec<u8>,
}

impl<'a, M: MakeWriter<'a>> Write for SuspendedEvent<'a, M> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a, M: MakeWriter<'a>> Drop for SuspendedEvent<'a, M> {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let inner = self.inner;
        let buf = &self.buf;
        self.bar.suspend(|| {
            let mut out = inner.make_writer();
            let _ = out.write_all(buf);
            let _ = out.flush();
        });
    }
}

// ---------------------------------------------------------------------------
// CliProgress
// ---------------------------------------------------------------------------

/// CLI progress reporter: a spinner while paginating, a bar over detail pages.
pub(crate) struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Start drawing `bar` on stderr as a spinner.
    ///
    /// `bar` is the same handle the console log writer suspends.
    pub(crate) fn new(bar: ProgressBar) -> Self {
        bar.set_draw_target(ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .expect("valid spinner template")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn listing_page(&self, page_num: u32, new_links: usize, total_links: usize) {
        self.bar.set_message(format!(
            "Listing page {page_num}: +{new_links} ({total_links} links)"
        ));
    }

    fn detail_visited(&self, url: &str, current: usize, total: usize) {
        let total = total as u64;
        if self.bar.length() != Some(total) {
            self.bar.set_length(total);
            self.bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} [{bar:30}] {pos}/{len} {msg}")
                    .expect("valid bar template")
                    .progress_chars("=> "),
            );
        }
        self.bar.set_position(current as u64);
        self.bar.set_message(url.to_string());
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}
