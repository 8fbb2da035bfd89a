use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Spinner shown while a command waits; replaced by log lines when not
/// attached to a terminal.
pub struct Activity {
    spinner: Option<ProgressBar>,
}

impl Activity {
    pub fn start(message: impl Into<String>, enabled: bool) -> Self {
        let message = message.into();
        if !enabled || !is_interactive() {
            tracing::info!(operation = "progress", message = %message, "Progress update");
            return Self { spinner: None };
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "))
        {
            spinner.set_style(style);
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self {
            spinner: Some(spinner),
        }
    }

    /// Countdown bar for the roulette animation.
    pub fn countdown(message: impl Into<String>, duration: Duration, enabled: bool) -> Self {
        let message = message.into();
        if !enabled || !is_interactive() {
            tracing::info!(operation = "progress", message = %message, "Progress update");
            return Self { spinner: None };
        }

        let bar = ProgressBar::new(duration.as_millis() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.magenta} {msg} [{wide_bar:.magenta/blue}]")
            .map(|s| s.progress_chars("█▉▊▋▌▍▎▏  "))
        {
            bar.set_style(style);
        }
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(50));
        Self { spinner: Some(bar) }
    }

    pub fn tick_to(&self, elapsed: Duration) {
        if let Some(bar) = &self.spinner {
            bar.set_position(elapsed.as_millis() as u64);
        }
    }

    pub fn finish(self) {
        if let Some(spinner) = self.spinner {
            spinner.finish_and_clear();
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
