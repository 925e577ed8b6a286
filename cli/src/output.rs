//! Styled terminal output.
//!
//! Write failures on stdout are ignored; there is nowhere better to report
//! them.

use console::{Term, style};
use serde::Serialize;
use std::fmt::Display;

pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn line(&self, text: &str) {
        drop(self.term.write_line(text));
    }

    /// Green checkmark prefix.
    pub fn success(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("✓").green().bold()));
    }

    /// Red cross prefix.
    pub fn error(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("✗").red().bold()));
    }

    /// Yellow warning sign prefix.
    pub fn warning(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("⚠").yellow().bold()));
    }

    pub fn print(&self, message: impl Display) {
        self.line(&message.to_string());
    }

    pub fn newline(&self) {
        self.line("");
    }

    pub fn header(&self, message: impl Display) {
        self.line(&style(message).bold().cyan().to_string());
    }

    pub fn labeled_indent(&self, label: impl Display, value: impl Display, indent: usize) {
        let spaces = " ".repeat(indent);
        self.line(&format!("{spaces}{}: {value}", style(label).dim()));
    }

    pub fn dim(&self, message: impl Display) {
        self.line(&style(message).dim().to_string());
    }

    /// Header line for one analyzed image.
    pub fn record_header(&self, index: usize, source: impl Display) {
        self.line(&format!(
            "\n{} {}",
            style(format!("#{}", index + 1)).dim(),
            style(source).white().bold()
        ));
    }

    /// A before/after pair, the new value emphasized.
    pub fn change(&self, label: impl Display, before: impl Display, after: impl Display) {
        self.line(&format!(
            "  {}: {} → {}",
            style(label).dim(),
            before,
            style(after).green().bold()
        ));
    }

    /// Keys whose values differ, highlighted.
    pub fn differing_keys<'a>(&self, keys: impl IntoIterator<Item = &'a str>) {
        let keys: Vec<String> = keys
            .into_iter()
            .map(|k| style(k).yellow().bold().to_string())
            .collect();
        if keys.is_empty() {
            self.success("All parameters match");
        } else {
            self.warning(format!("Differs: {}", keys.join(", ")));
        }
    }

    /// Pretty JSON to stdout.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
        self.line(&serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
