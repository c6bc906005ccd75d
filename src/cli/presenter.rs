//! CLI presenter for output formatting
//!
//! Transcripts and assistant replies go to stdout; everything else
//! (spinner, status, errors) goes to stderr.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::assistant::{CommandSequence, Device, Settings};

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Handle to the active spinner, for callbacks that outlive a borrow
    pub fn spinner_handle(&self) -> Option<ProgressBar> {
        self.spinner.clone()
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// The user's side of a turn
    pub fn user_line(&self, text: &str) {
        println!("{} {}", "you ›".bold(), text);
    }

    /// One line of the assistant's reply
    pub fn assistant_line(&self, text: &str) {
        println!("{} {}", "assistant ›".green().bold(), text);
    }

    /// Spinner text while the microphone is open
    pub fn format_recording(&self, elapsed_ms: u64) -> String {
        format!(
            "{} {}  (Enter or Ctrl-C to stop)",
            "Recording".red().bold(),
            format_elapsed(elapsed_ms)
        )
    }

    /// Device list, one line per device
    pub fn devices(&self, devices: &[Device]) {
        if devices.is_empty() {
            println!("{}", "(no devices)".dimmed());
            return;
        }
        for device in devices {
            println!("{}", Self::format_device(device));
        }
    }

    /// Device list on stderr, for use after a chat turn
    pub fn devices_brief(&self, devices: &[Device]) {
        for device in devices {
            eprintln!("  {}", Self::format_device(device).dimmed());
        }
    }

    pub fn format_device(device: &Device) -> String {
        let marker = if device.is_on {
            "●".green()
        } else {
            "○".normal()
        };
        format!(
            "{} {} {} {}",
            marker,
            device.name.bold(),
            format!("[{}]", device.id).dimmed(),
            device.status_line()
        )
    }

    /// Current settings as key/value lines
    pub fn settings(&self, settings: &Settings) {
        self.key_value("voice_answers", &settings.voice_answers.to_string());
        self.key_value("auto_confirm", &settings.auto_confirm.to_string());
        self.key_value("noise_suppression", &settings.noise_suppression.to_string());
        self.key_value("emergency_commands", &settings.emergency_commands.to_string());
        self.key_value("voice_timbre", or_not_set(&settings.voice_timbre));
        self.key_value("speech_speed", &settings.speech_speed.to_string());
        self.key_value("volume", &settings.volume.to_string());
        self.key_value("tone", or_not_set(&settings.tone));
    }

    pub fn service_words(&self, words: &[String]) {
        if words.is_empty() {
            self.key_value("service_words", "(none)");
        } else {
            self.key_value("service_words", &words.join(", "));
        }
    }

    pub fn sequences<'a>(&self, sequences: impl IntoIterator<Item = &'a CommandSequence>) {
        let mut any = false;
        for sequence in sequences {
            println!("{}", Self::format_sequence(sequence));
            any = true;
        }
        if !any {
            println!("{}", "(no sequences)".dimmed());
        }
    }

    /// `name: step → step`, with the description in parentheses when set
    pub fn format_sequence(sequence: &CommandSequence) -> String {
        let mut line = format!("{}: {}", sequence.name.bold(), sequence.steps.join(" → "));
        if !sequence.description.is_empty() {
            line.push_str(&format!(" {}", format!("({})", sequence.description).dimmed()));
        }
        line
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

fn or_not_set(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

/// `m:ss` for a recording timer
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let secs = elapsed_ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}
