//! Progress bar styling options.

use indicatif::{ProgressBar, ProgressStyle};

/// Define the options for a progress bar.
#[derive(Debug, Clone)]
pub struct ProgressBarOpts {
    /// Progress bar template string.
    template: String,
    /// Progression characters set.
    ///
    /// There must be at least 3 characters for the following states:
    /// "filled", "current", and "to do".
    progress_chars: String,
    /// Enable or disable the progress bar.
    pub(crate) enabled: bool,
    /// Clear the progress bar once completed.
    pub(crate) clear: bool,
}

impl Default for ProgressBarOpts {
    fn default() -> Self {
        Self::with_pip_style()
    }
}

impl ProgressBarOpts {
    /// Template which looks like the Python package installer pip.
    ///
    /// `━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━ 211.23 KiB/211.23 KiB 1008.31 KiB/s eta 0s`
    pub const TEMPLATE_PIP: &'static str =
        "{bar:40.green/black} {bytes:>11.green}/{total_bytes:<11.green} {bytes_per_sec:>13.red} eta {eta:.blue}";
    /// Template used while the total size is unknown.
    pub const TEMPLATE_SPINNER: &'static str =
        "{spinner:.green} {bytes:>11.green} {bytes_per_sec:>13.red} {elapsed:.blue}";
    /// Use a line as progress characters: `"━╾╴─"`.
    pub const CHARS_LINE: &'static str = "━╾╴─";

    /// Create a new [`ProgressBarOpts`] which looks like Python pip.
    pub fn with_pip_style() -> Self {
        Self {
            template: Self::TEMPLATE_PIP.into(),
            progress_chars: Self::CHARS_LINE.into(),
            enabled: true,
            clear: false,
        }
    }

    /// Create a new [`ProgressBarOpts`] which hides the progress bar.
    pub fn hidden() -> Self {
        Self {
            enabled: false,
            ..Self::with_pip_style()
        }
    }

    /// Set to `true` to clear the progress bar upon completion.
    pub fn set_clear(&mut self, clear: bool) {
        self.clear = clear;
    }

    /// Create a [`ProgressStyle`] for a transfer of known or unknown size.
    ///
    /// An invalid template falls back to the indicatif default.
    pub fn to_progress_style(&self, sized: bool) -> ProgressStyle {
        let template = if sized {
            self.template.as_str()
        } else {
            Self::TEMPLATE_SPINNER
        };
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(&self.progress_chars)
    }

    /// Create a [`ProgressBar`] based on the provided options.
    pub fn to_progress_bar(&self, len: Option<u64>) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }
        let pb = match len {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::no_length(),
        };
        pb.with_style(self.to_progress_style(len.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_bar() {
        assert!(ProgressBarOpts::hidden().to_progress_bar(Some(10)).is_hidden());
    }

    #[test]
    fn test_bar_length() {
        let pb = ProgressBarOpts::with_pip_style().to_progress_bar(Some(1024));
        assert_eq!(pb.length(), Some(1024));
        let pb = ProgressBarOpts::with_pip_style().to_progress_bar(None);
        assert_eq!(pb.length(), None);
    }
}
