// Per-file progress display
use indicatif::{ProgressBar, ProgressBarIter, ProgressStyle};
use std::io::Read;
use std::time::Instant;

/// Spinner showing bytes moved for one file. Total size is not known up front.
pub struct ProgressTracker {
    progress_bar: ProgressBar,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(description: &str, visible: bool) -> Self {
        let progress_bar = if visible {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {bytes} ({binary_bytes_per_sec}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        progress_bar.set_style(style);
        progress_bar.set_message(description.to_string());

        Self {
            progress_bar,
            start_time: Instant::now(),
        }
    }

    /// Counts every byte read through the returned reader.
    pub fn wrap_read<R: Read>(&self, reader: R) -> ProgressBarIter<R> {
        self.progress_bar.wrap_read(reader)
    }

    pub fn transferred(&self) -> u64 {
        self.progress_bar.position()
    }

    pub fn finish(&self) {
        let elapsed = self.start_time.elapsed();
        let total = self.transferred();

        let avg_speed = if elapsed.as_secs() > 0 {
            total / elapsed.as_secs()
        } else {
            total
        };

        self.progress_bar
            .finish_with_message(format!("Transfer completed (avg speed: {})", format_speed(avg_speed)));
    }

    pub fn finish_with_error(&self, error: &str) {
        self.progress_bar.abandon_with_message(format!("Transfer failed: {}", error));
    }
}

pub fn format_speed(bytes_per_sec: u64) -> String {
    if bytes_per_sec < 1024 {
        format!("{} B/s", bytes_per_sec)
    } else if bytes_per_sec < 1024 * 1024 {
        format!("{:.2} KB/s", bytes_per_sec as f64 / 1024.0)
    } else if bytes_per_sec < 1024 * 1024 * 1024 {
        format!("{:.2} MB/s", bytes_per_sec as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB/s", bytes_per_sec as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
