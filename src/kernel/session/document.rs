use std::path::{Path, PathBuf};

use crate::kernel::editor::{ModelId, PreviewId};
use crate::kernel::language::PreviewKind;

/// Stable handle of an open document (a tab).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl DocumentId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentBody {
    Text { model: ModelId },
    Preview { surface: PreviewId, kind: PreviewKind },
}

/// What to do once a save has landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AfterSave {
    #[default]
    Nothing,
    Close,
    Run,
}

impl AfterSave {
    /// Keeps the stronger follow-up when two save requests are merged.
    pub fn merge(self, other: AfterSave) -> AfterSave {
        match (self, other) {
            (AfterSave::Close, _) | (_, AfterSave::Close) => AfterSave::Close,
            (AfterSave::Run, _) | (_, AfterSave::Run) => AfterSave::Run,
            _ => AfterSave::Nothing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct PendingSave {
    pub request: u64,
    pub version: u64,
    pub after: AfterSave,
    pub queued: Option<AfterSave>,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub(super) id: DocumentId,
    pub(super) path: Option<PathBuf>,
    pub(super) name: String,
    pub(super) dirty: bool,
    pub(super) body: DocumentBody,
    pub(super) version: u64,
    pub(super) pending_save: Option<PendingSave>,
}

impl Document {
    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Never saved to disk.
    pub fn is_new(&self) -> bool {
        self.path.is_none()
    }

    pub fn body(&self) -> DocumentBody {
        self.body
    }

    pub fn is_preview(&self) -> bool {
        matches!(self.body, DocumentBody::Preview { .. })
    }

    pub fn model_id(&self) -> Option<ModelId> {
        match self.body {
            DocumentBody::Text { model } => Some(model),
            DocumentBody::Preview { .. } => None,
        }
    }

    pub fn preview_kind(&self) -> Option<PreviewKind> {
        match self.body {
            DocumentBody::Preview { kind, .. } => Some(kind),
            DocumentBody::Text { .. } => None,
        }
    }

    pub fn save_in_flight(&self) -> bool {
        self.pending_save.is_some()
    }

    pub fn is_under(&self, dir: &Path) -> bool {
        self.path
            .as_deref()
            .is_some_and(|path| path == dir || path.starts_with(dir))
    }
}

pub(super) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
