use std::path::Path;

/// Editing mode of a text model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LanguageMode {
    Makefile,
    C,
    Json,
    PlainText,
}

impl LanguageMode {
    pub fn language_id(self) -> &'static str {
        match self {
            Self::Makefile => "makefile",
            Self::C => "c",
            Self::Json => "json",
            Self::PlainText => "plaintext",
        }
    }

    /// Content check applied before a document in this mode is written.
    pub fn validate(self, content: &str) -> Result<(), String> {
        match self {
            Self::Json => validate_json(content),
            Self::Makefile | Self::C | Self::PlainText => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviewKind {
    Image,
    Audio,
}

impl PreviewKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Text(LanguageMode),
    Preview(PreviewKind),
}

impl FileKind {
    pub fn classify(name: &str) -> Self {
        if name.eq_ignore_ascii_case("makefile") {
            return Self::Text(LanguageMode::Makefile);
        }

        let ext = match name.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => return Self::Text(LanguageMode::PlainText),
        };
        match ext.as_str() {
            "c" | "h" => Self::Text(LanguageMode::C),
            "json" => Self::Text(LanguageMode::Json),
            "png" => Self::Preview(PreviewKind::Image),
            "wav" => Self::Preview(PreviewKind::Audio),
            _ => Self::Text(LanguageMode::PlainText),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        Self::classify(&name)
    }

    /// Language a text model for this path gets. Previews have none.
    pub fn language(self) -> Option<LanguageMode> {
        match self {
            Self::Text(mode) => Some(mode),
            Self::Preview(_) => None,
        }
    }
}

pub fn validate_json(content: &str) -> Result<(), String> {
    serde_json::from_str::<serde_json::Value>(content)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/language.rs"]
mod tests;
