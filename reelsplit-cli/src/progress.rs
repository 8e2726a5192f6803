// ============================================================================
// reelsplit-cli/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: Spinners and summary output for the terminal
//
// Neither yt-dlp nor the extraction stage reports a usable total up front, so
// each stage is shown as a spinner that is finished with a check mark or a
// cross. Styling goes through `console` and degrades to plain text when the
// output is not a terminal.
//
// AI-ASSISTANT-INFO: CLI-specific progress reporting utilities

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::time::Duration;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// A spinner for one pipeline stage.
pub struct StageSpinner {
    bar: ProgressBar,
    label: String,
}

impl StageSpinner {
    pub fn start(label: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_message(label.to_string());
        bar.enable_steady_tick(TICK_INTERVAL);
        Self {
            bar,
            label: label.to_string(),
        }
    }

    pub fn succeed(self, detail: impl Display) {
        self.bar.finish_and_clear();
        println!("{} {}: {}", style("✓").green().bold(), self.label, detail);
    }

    pub fn fail(self) {
        self.bar.finish_and_clear();
        eprintln!("{} {}", style("✗").red().bold(), self.label);
    }
}

/// Runs `f` behind a spinner, finishing it according to the outcome.
pub fn with_spinner<T, E>(
    label: &str,
    f: impl FnOnce() -> Result<T, E>,
    detail: impl FnOnce(&T) -> String,
) -> Result<T, E> {
    let spinner = StageSpinner::start(label);
    match f() {
        Ok(value) => {
            spinner.succeed(detail(&value));
            Ok(value)
        }
        Err(e) => {
            spinner.fail();
            Err(e)
        }
    }
}

/// Prints a section heading.
pub fn print_section(text: &str) {
    println!("\n{}", style(text).bold().bright());
}

/// Prints an info line with a styled label.
pub fn print_info<T: Display>(label: &str, value: T) {
    println!("  {:<12} {}", style(format!("{label}:")).cyan(), value);
}
