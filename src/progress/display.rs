//! Terminal rendering of [`Progress`] events.

use super::{Progress, ProgressBarOpts, ProgressCallback};

use indicatif::ProgressBar;
use std::sync::{Arc, OnceLock};

/// Renders a single transfer as an indicatif progress bar.
///
/// The bar is created lazily on the first event, once it is known whether
/// the server advertised a size.
#[derive(Debug, Clone)]
pub struct ProgressDisplay {
    opts: ProgressBarOpts,
    bar: Arc<OnceLock<ProgressBar>>,
}

impl ProgressDisplay {
    /// Create a display using the given bar options.
    pub fn new(opts: ProgressBarOpts) -> Self {
        Self {
            opts,
            bar: Arc::new(OnceLock::new()),
        }
    }

    /// Update the bar with a progress event.
    pub fn update(&self, progress: Progress) {
        let bar = self
            .bar
            .get_or_init(|| self.opts.to_progress_bar(progress.total));
        bar.set_position(progress.downloaded);
    }

    /// A callback feeding this display, for `DownloaderBuilder::on_progress`.
    pub fn callback(&self) -> ProgressCallback {
        let display = self.clone();
        Arc::new(move |progress| display.update(progress))
    }

    /// Finish the bar, clearing or keeping it based on configuration.
    pub fn finish(&self) {
        if let Some(bar) = self.bar.get() {
            if self.opts.clear {
                bar.finish_and_clear();
            } else {
                bar.finish();
            }
        }
    }
}
