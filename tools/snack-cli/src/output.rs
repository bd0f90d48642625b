//! Output formatting for the CLI.

use console::{style, StyledObject, Term};
use indicatif::{ProgressBar, ProgressStyle};
use snack_commerce::checkout::{CheckoutStep, NoticeLevel, Notifier, Severity};
use snack_commerce::Money;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
    term: Term,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            verbose,
            json,
            term: Term::stderr(),
        }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a plain line.
    pub fn line(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{}", msg);
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Create a spinner for indeterminate progress.
    ///
    /// Hidden in JSON mode and when stderr is not a terminal.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json || !self.term.is_term() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Shows checkout notifications as CLI messages.
pub struct ConsoleNotifier<'a> {
    output: &'a Output,
}

impl<'a> ConsoleNotifier<'a> {
    pub fn new(output: &'a Output) -> Self {
        Self { output }
    }
}

impl Notifier for ConsoleNotifier<'_> {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success => self.output.success(message),
            NoticeLevel::Warning => self.output.warn(message),
            NoticeLevel::Error => self.output.error(message),
        }
    }
}

/// Severity label in its presentation colour.
pub fn severity_badge(severity: Severity) -> StyledObject<&'static str> {
    let label = severity.as_str();
    match severity {
        Severity::Critical => style(label).red().bold(),
        Severity::Warning => style(label).yellow(),
        Severity::Info => style(label).blue(),
    }
}

/// Checkout step label in its status colour.
pub fn step_badge(step: CheckoutStep) -> String {
    match step {
        CheckoutStep::Complete => style(step.display_name()).green().to_string(),
        CheckoutStep::Analyzing => style(step.display_name()).yellow().to_string(),
        CheckoutStep::Error => style(step.display_name()).red().to_string(),
        CheckoutStep::Idle => style(step.display_name()).dim().to_string(),
    }
}

/// Format a price for table cells.
pub fn format_price(price: &Money) -> String {
    price.display()
}

/// Join tags for table cells, `-` when empty.
pub fn format_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        "-".to_string()
    } else {
        tags.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tags() {
        assert_eq!(format_tags(&[]), "-");
        assert_eq!(
            format_tags(&["Dairy".to_string(), "Nuts".to_string()]),
            "Dairy, Nuts"
        );
    }

    #[test]
    fn test_severity_badge_keeps_label() {
        assert_eq!(
            console::strip_ansi_codes(&severity_badge(Severity::Critical).to_string()),
            "critical"
        );
    }
}
