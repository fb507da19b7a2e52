//! Progress module: real byte counts, reported as the body is written.
//!
//! The core operation calls a [`ProgressCallback`] after every chunk that
//! reaches the disk. Rendering is left to the caller; [`ProgressDisplay`]
//! is the indicatif rendering used by the command line host.
//!
//! # Examples
//!
//! ```rust
//! use puller::downloader::DownloaderBuilder;
//!
//! let downloader = DownloaderBuilder::new()
//!     .on_progress(|progress| {
//!         if let Some(percent) = progress.percent() {
//!             eprintln!("{percent}%");
//!         }
//!     })
//!     .build();
//! ```

pub mod display;
pub mod style;

pub use display::ProgressDisplay;
pub use style::ProgressBarOpts;

use std::sync::Arc;

/// Snapshot of a running transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Bytes written to disk so far.
    pub downloaded: u64,
    /// Bytes advertised by the server, if any.
    pub total: Option<u64>,
}

impl Progress {
    /// Whole percentage done, when the total is known and non-zero.
    pub fn percent(&self) -> Option<u8> {
        match self.total {
            Some(total) if total > 0 => {
                Some((self.downloaded.min(total) * 100 / total) as u8)
            }
            _ => None,
        }
    }
}

/// Callback type for progress events.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        let p = |downloaded, total| Progress { downloaded, total };
        assert_eq!(p(0, Some(200)).percent(), Some(0));
        assert_eq!(p(100, Some(200)).percent(), Some(50));
        assert_eq!(p(200, Some(200)).percent(), Some(100));
        assert_eq!(p(300, Some(200)).percent(), Some(100));
        assert_eq!(p(10, Some(0)).percent(), None);
        assert_eq!(p(10, None).percent(), None);
    }
}
