//! Progress bar utilities for CLI operations

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar counting uploaded batches
pub fn create_batch_progress(total_batches: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_batches);
    let style = ProgressStyle::default_bar()
        .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} batches ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Create a spinner for indeterminate operations
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_batch_progress() {
        let pb = create_batch_progress(7, "Uploading");
        assert_eq!(pb.length(), Some(7));
        pb.inc(1);
        assert_eq!(pb.position(), 1);
    }

    #[test]
    fn test_create_spinner() {
        let pb = create_spinner("Validating...");
        assert!(!pb.is_finished());
        pb.finish();
        assert!(pb.is_finished());
    }
}
