//! Output surface: the status line, its history and transient toasts.

use std::collections::VecDeque;

const MAX_HISTORY: usize = 200;
const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub level: OutputLevel,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct OutputState {
    history: VecDeque<OutputLine>,
    toasts: VecDeque<OutputLine>,
    pushed: u64,
}

impl OutputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent line, shown in the status area.
    pub fn message(&self) -> Option<&OutputLine> {
        self.history.back()
    }

    pub fn history(&self) -> impl Iterator<Item = &OutputLine> {
        self.history.iter()
    }

    /// Number of lines ever pushed; pair with [`OutputState::since`].
    pub fn mark(&self) -> u64 {
        self.pushed
    }

    /// Lines pushed after `mark` that are still in the history.
    pub fn since(&self, mark: u64) -> impl Iterator<Item = &OutputLine> {
        let fresh = self.pushed.saturating_sub(mark).min(self.history.len() as u64) as usize;
        self.history.iter().skip(self.history.len() - fresh)
    }

    pub fn toasts(&self) -> impl Iterator<Item = &OutputLine> {
        self.toasts.iter()
    }

    pub fn take_toasts(&mut self) -> Vec<OutputLine> {
        self.toasts.drain(..).collect()
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(OutputLevel::Info, text.into());
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(OutputLevel::Success, text.into());
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.push(OutputLevel::Warning, text.into());
    }

    /// Failures also raise a toast.
    pub fn error(&mut self, text: impl Into<String>) {
        let line = OutputLine {
            level: OutputLevel::Error,
            text: text.into(),
        };
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(line.clone());
        self.push_line(line);
    }

    /// Replaces everything with a block of text, e.g. build output.
    pub fn replace(&mut self, level: OutputLevel, text: impl Into<String>) {
        self.history.clear();
        self.push(level, text.into());
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.history.is_empty() || !self.toasts.is_empty();
        self.history.clear();
        self.toasts.clear();
        changed
    }

    fn push(&mut self, level: OutputLevel, text: String) {
        self.push_line(OutputLine { level, text });
    }

    fn push_line(&mut self, line: OutputLine) {
        match line.level {
            OutputLevel::Error => tracing::warn!(output = %line.text, "error reported"),
            _ => tracing::debug!(output = %line.text),
        }
        if self.history.len() == MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(line);
        self.pushed += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/output.rs"]
mod tests;
