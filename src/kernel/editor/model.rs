use std::fmt;
use std::path::{Path, PathBuf};

use crate::kernel::language::{LanguageMode, PreviewKind};
use crate::models::{Selection, TextBuffer};

/// Identity of a text model. Two models never share a URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelUri {
    File(PathBuf),
    Untitled(String),
}

impl ModelUri {
    pub fn for_document(path: Option<&Path>, name: &str) -> Self {
        match path {
            Some(path) => Self::File(path.to_path_buf()),
            None => Self::Untitled(name.to_string()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Untitled(_) => None,
        }
    }
}

impl fmt::Display for ModelUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => {
                let path = path.to_string_lossy().replace('\\', "/");
                if path.starts_with('/') {
                    write!(f, "file://{}", path)
                } else {
                    write!(f, "file:///{}", path)
                }
            }
            Self::Untitled(name) => write!(f, "untitled:{}", name),
        }
    }
}

/// Cursor, selection and scroll of a model; carried across a rebind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub cursor: (usize, usize),
    pub selection: Option<Selection>,
    pub scroll_line: usize,
}

#[derive(Clone)]
pub struct TextModel {
    uri: ModelUri,
    language: LanguageMode,
    buffer: TextBuffer,
    scroll_line: usize,
}

impl fmt::Debug for TextModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextModel")
            .field("uri", &self.uri)
            .field("language", &self.language)
            .field("len_chars", &self.buffer.len_chars())
            .field("cursor", &self.buffer.cursor())
            .finish()
    }
}

impl TextModel {
    pub(super) fn new(uri: ModelUri, language: LanguageMode, content: &str) -> Self {
        Self {
            uri,
            language,
            buffer: TextBuffer::from_text(content),
            scroll_line: 0,
        }
    }

    pub fn uri(&self) -> &ModelUri {
        &self.uri
    }

    pub fn language(&self) -> LanguageMode {
        self.language
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn content(&self) -> String {
        self.buffer.text()
    }

    /// Applies an edit. Returns whether the content changed.
    pub fn apply_edit(&mut self, start_char: usize, end_char: usize, text: &str) -> bool {
        self.buffer.replace_chars(start_char, end_char, text)
    }

    pub fn set_cursor(&mut self, row: usize, col: usize) -> bool {
        let prev = self.buffer.cursor();
        self.buffer.set_cursor(row, col);
        self.buffer.clear_selection();
        prev != self.buffer.cursor()
    }

    pub fn set_selection(&mut self, selection: Selection) {
        let cursor = selection.cursor();
        self.buffer.set_cursor(cursor.0, cursor.1);
        self.buffer.set_selection(Some(selection));
    }

    pub fn scroll_line(&self) -> usize {
        self.scroll_line
    }

    pub fn scroll_to(&mut self, line: usize) -> bool {
        let line = line.min(self.buffer.len_lines().saturating_sub(1));
        let changed = line != self.scroll_line;
        self.scroll_line = line;
        changed
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            cursor: self.buffer.cursor(),
            selection: self.buffer.selection().copied(),
            scroll_line: self.scroll_line,
        }
    }

    pub fn restore_view_state(&mut self, state: &ViewState) {
        self.buffer.set_cursor(state.cursor.0, state.cursor.1);
        self.buffer.set_selection(state.selection);
        self.scroll_to(state.scroll_line);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSurface {
    pub path: PathBuf,
    pub kind: PreviewKind,
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/model.rs"]
mod tests;
