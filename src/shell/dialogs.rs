//! Pickers answered on the terminal.
//!
//! Prompts go to stderr; an empty answer dismisses the picker.

use std::io::{self, Write};
use std::path::PathBuf;

use arcade_ide::kernel::services::ports::Dialogs;

pub struct StdinDialogs {
    cwd: PathBuf,
}

impl StdinDialogs {
    pub fn new(cwd: PathBuf) -> Self {
        Self { cwd }
    }

    fn ask(&self, prompt: &str) -> Option<PathBuf> {
        let mut stderr = io::stderr();
        let _ = write!(stderr, "{}: ", prompt);
        let _ = stderr.flush();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => answer_to_path(&self.cwd, &line),
            Err(e) => {
                tracing::warn!(error = %e, "picker read failed");
                None
            }
        }
    }
}

/// Blank answers cancel; relative answers are taken from `cwd`.
pub fn answer_to_path(cwd: &std::path::Path, answer: &str) -> Option<PathBuf> {
    let answer = answer.trim();
    if answer.is_empty() {
        return None;
    }
    let path = PathBuf::from(answer);
    if path.is_absolute() {
        Some(path)
    } else {
        Some(cwd.join(path))
    }
}

impl Dialogs for StdinDialogs {
    fn pick_save_path(&self, suggested_name: &str) -> Option<PathBuf> {
        self.ask(&format!("Save as (e.g. {}, empty to cancel)", suggested_name))
    }

    fn pick_open_file(&self) -> Option<PathBuf> {
        self.ask("Open file (empty to cancel)")
    }

    fn pick_folder(&self) -> Option<PathBuf> {
        self.ask("Open folder (empty to cancel)")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shell/dialogs.rs"]
mod tests;
