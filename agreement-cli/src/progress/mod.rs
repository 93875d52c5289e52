//! Progress reporting module

use agreement_core::Stage;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for pipeline stages
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    quiet: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: None,
            quiet,
        }
    }

    /// Initialize progress bar for a run with `total_stages` stages
    pub fn init_stages(&mut self, total_stages: u64) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total_stages);
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} stages {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    /// Record that `stage` has started; the previous stage counts as done
    pub fn stage_started(&self, stage: Stage) {
        if let Some(pb) = &self.progress_bar {
            if !pb.message().is_empty() {
                pb.inc(1);
            }
            pb.set_message(stage.label());
        }
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(pb.length().unwrap_or(0));
            pb.finish_with_message("Complete");
        }
    }

    /// Remove the bar after a failed run
    pub fn abandon(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.abandon_with_message("Failed");
        }
    }
}
