//! Workspace session
//!
//! Owns the open documents, the active handle, the workspace root and the
//! editor component behind them. Every change to a document's path goes
//! through [`WorkspaceSession::rebind_if_needed`], so a document's name, path
//! and model identity always move together.

mod document;

pub use document::{AfterSave, Document, DocumentBody, DocumentId};

use std::fmt;
use std::path::{Path, PathBuf};

use document::{display_name, PendingSave};

use crate::kernel::editor::{
    ModelError, ModelRegistry, ModelUri, Surface, TextModel, Viewport,
};
use crate::kernel::language::{FileKind, LanguageMode};
use crate::kernel::services::ports::GatewayResult;

pub const APP_TITLE: &str = "Arcade IDE";
const UNTITLED_PREFIX: &str = "Untitled-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    UnknownDocument(DocumentId),
    PreviewNotEditable(DocumentId),
    InvalidContent { name: String, reason: String },
    Model(ModelError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::UnknownDocument(id) => write!(f, "no open document {}", id),
            SessionError::PreviewNotEditable(_) => write!(f, "preview documents cannot be edited or saved"),
            SessionError::InvalidContent { name, reason } => {
                write!(f, "{} has invalid content: {}", name, reason)
            }
            SessionError::Model(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<ModelError> for SessionError {
    fn from(e: ModelError) -> Self {
        SessionError::Model(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opened {
    Focused(DocumentId),
    Created(DocumentId),
}

impl Opened {
    pub fn id(self) -> DocumentId {
        match self {
            Opened::Focused(id) | Opened::Created(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditOutcome {
    pub changed: bool,
    /// The edit moved the document from clean to dirty.
    pub became_dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub doc: DocumentId,
    pub request: u64,
    pub path: Option<PathBuf>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStart {
    NothingToSave,
    /// Another save of the same document is in flight; this one runs after it.
    Queued,
    Issue(SaveRequest),
}

/// What to do with a destination the user picked for a save-as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickedSave {
    Write(SaveRequest),
    /// Nothing may be written; the reason is reported as a failed save.
    Blocked(String),
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved {
        path: PathBuf,
        path_changed: bool,
        /// Clean documents that were open on the written path; closed.
        displaced: Vec<DocumentId>,
        /// Edits arrived while the save was in flight.
        still_dirty: bool,
    },
    Canceled,
    Failed(String),
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveCompletion {
    pub outcome: SaveOutcome,
    pub after: AfterSave,
    pub queued: Option<AfterSave>,
}

impl SaveCompletion {
    fn stale() -> Self {
        Self {
            outcome: SaveOutcome::Stale,
            after: AfterSave::Nothing,
            queued: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseRequest {
    NeedsConfirmation,
    Closed,
}

pub fn normalize_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    if raw.contains('\\') {
        PathBuf::from(raw.replace('\\', "/"))
    } else {
        path.to_path_buf()
    }
}

pub fn language_for_path(path: &Path) -> LanguageMode {
    FileKind::from_path(path)
        .language()
        .unwrap_or(LanguageMode::PlainText)
}

fn surface_of(body: DocumentBody) -> Surface {
    match body {
        DocumentBody::Text { model } => Surface::Model(model),
        DocumentBody::Preview { surface, .. } => Surface::Preview(surface),
    }
}

#[derive(Debug, Default)]
pub struct WorkspaceSession {
    documents: Vec<Document>,
    active: Option<DocumentId>,
    root: Option<PathBuf>,
    registry: ModelRegistry,
    viewport: Viewport,
    next_document_id: u64,
    next_untitled: u64,
    next_save_request: u64,
}

impl WorkspaceSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    fn index_of(&self, id: DocumentId) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }

    pub fn find_by_path(&self, path: &Path) -> Option<DocumentId> {
        let path = normalize_path(path);
        self.documents
            .iter()
            .find(|d| d.path.as_deref() == Some(path.as_path()))
            .map(|d| d.id)
    }

    pub fn active(&self) -> Option<DocumentId> {
        self.active
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.active.and_then(|id| self.document(id))
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn set_root(&mut self, root: Option<PathBuf>) -> bool {
        let root = root.map(|p| normalize_path(&p));
        if self.root == root {
            return false;
        }
        self.root = root;
        true
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn model(&self, id: DocumentId) -> Option<&TextModel> {
        let model = self.document(id)?.model_id()?;
        self.registry.model(model)
    }

    pub fn content(&self, id: DocumentId) -> Option<String> {
        self.model(id).map(|m| m.content())
    }

    pub fn has_dirty_documents(&self) -> bool {
        self.documents.iter().any(|d| d.dirty)
    }

    fn alloc_id(&mut self) -> DocumentId {
        let id = DocumentId::new(self.next_document_id);
        self.next_document_id += 1;
        id
    }

    /// Focuses the document already open on `path`, or opens a new one.
    ///
    /// `content` is ignored for previews and when the document is already open.
    pub fn open_or_focus(&mut self, path: &Path, content: &str) -> Result<Opened, SessionError> {
        let path = normalize_path(path);
        if let Some(id) = self.find_by_path(&path) {
            self.activate(id)?;
            return Ok(Opened::Focused(id));
        }

        let body = match FileKind::from_path(&path) {
            FileKind::Preview(kind) => DocumentBody::Preview {
                surface: self.registry.create_preview(path.clone(), kind),
                kind,
            },
            FileKind::Text(language) => {
                let model =
                    self.registry
                        .create_model(ModelUri::File(path.clone()), language, content)?;
                DocumentBody::Text { model }
            }
        };

        let id = self.alloc_id();
        let name = display_name(&path);
        tracing::debug!(doc = %id, path = %path.display(), "document opened");
        self.documents.push(Document {
            id,
            path: Some(path),
            name,
            dirty: false,
            body,
            version: 0,
            pending_save: None,
        });
        self.activate(id)?;
        Ok(Opened::Created(id))
    }

    /// An empty untitled C document. It starts dirty so closing it asks first.
    pub fn create_new_document(&mut self) -> Result<DocumentId, SessionError> {
        let name = format!("{}{}", UNTITLED_PREFIX, self.next_untitled);
        let model =
            self.registry
                .create_model(ModelUri::Untitled(name.clone()), LanguageMode::C, "")?;
        self.next_untitled += 1;

        let id = self.alloc_id();
        tracing::debug!(doc = %id, name = %name, "untitled document created");
        self.documents.push(Document {
            id,
            path: None,
            name,
            dirty: true,
            body: DocumentBody::Text { model },
            version: 0,
            pending_save: None,
        });
        self.activate(id)?;
        Ok(id)
    }

    /// Mounts the document's surface. Returns false when it was already active.
    pub fn activate(&mut self, id: DocumentId) -> Result<bool, SessionError> {
        let doc = self.document(id).ok_or(SessionError::UnknownDocument(id))?;
        if self.active == Some(id) {
            return Ok(false);
        }
        let surface = surface_of(doc.body);
        self.viewport.mount(surface);
        self.active = Some(id);
        Ok(true)
    }

    pub fn edit(
        &mut self,
        id: DocumentId,
        start_char: usize,
        end_char: usize,
        text: &str,
    ) -> Result<EditOutcome, SessionError> {
        let doc = self.document(id).ok_or(SessionError::UnknownDocument(id))?;
        let model = doc.model_id().ok_or(SessionError::PreviewNotEditable(id))?;
        let changed = self
            .registry
            .model_mut(model)
            .ok_or(SessionError::Model(ModelError::UnknownModel))?
            .apply_edit(start_char, end_char, text);
        if !changed {
            return Ok(EditOutcome::default());
        }
        Ok(EditOutcome {
            changed: true,
            became_dirty: self.mark_modified(id),
        })
    }

    /// Records a content change. Only the clean to dirty transition returns true.
    pub fn mark_modified(&mut self, id: DocumentId) -> bool {
        let Some(doc) = self.documents.iter_mut().find(|d| d.id == id) else {
            tracing::warn!(doc = %id, "modification for unknown document");
            return false;
        };
        if doc.is_preview() {
            return false;
        }
        doc.version += 1;
        if doc.dirty {
            return false;
        }
        doc.dirty = true;
        true
    }

    pub fn set_cursor(&mut self, id: DocumentId, row: usize, col: usize) -> Result<bool, SessionError> {
        let doc = self.document(id).ok_or(SessionError::UnknownDocument(id))?;
        let model = doc.model_id().ok_or(SessionError::PreviewNotEditable(id))?;
        Ok(self
            .registry
            .model_mut(model)
            .is_some_and(|m| m.set_cursor(row, col)))
    }

    pub fn scroll_to(&mut self, id: DocumentId, line: usize) -> Result<bool, SessionError> {
        let doc = self.document(id).ok_or(SessionError::UnknownDocument(id))?;
        let model = doc.model_id().ok_or(SessionError::PreviewNotEditable(id))?;
        Ok(self
            .registry
            .model_mut(model)
            .is_some_and(|m| m.scroll_to(line)))
    }

    /// Starts a save of `id`, or queues it behind the one already in flight.
    pub fn begin_save(&mut self, id: DocumentId, after: AfterSave) -> Result<SaveStart, SessionError> {
        let idx = self.index_of(id).ok_or(SessionError::UnknownDocument(id))?;
        let model = self.documents[idx]
            .model_id()
            .ok_or(SessionError::PreviewNotEditable(id))?;

        if let Some(pending) = self.documents[idx].pending_save.as_mut() {
            pending.queued = Some(pending.queued.map_or(after, |q| q.merge(after)));
            return Ok(SaveStart::Queued);
        }

        let doc = &self.documents[idx];
        if !doc.dirty && !doc.is_new() {
            return Ok(SaveStart::NothingToSave);
        }

        let model = self
            .registry
            .model(model)
            .ok_or(SessionError::Model(ModelError::UnknownModel))?;
        let content = model.content();
        model
            .language()
            .validate(&content)
            .map_err(|reason| SessionError::InvalidContent {
                name: doc.name.clone(),
                reason,
            })?;

        let request = self.next_save_request;
        self.next_save_request += 1;

        let doc = &mut self.documents[idx];
        doc.pending_save = Some(PendingSave {
            request,
            version: doc.version,
            after,
            queued: None,
        });
        Ok(SaveStart::Issue(SaveRequest {
            doc: id,
            request,
            path: doc.path.clone(),
            content,
        }))
    }

    /// Applies the gateway's answer to save `request`. Answers for closed
    /// documents or superseded requests are reported as stale and ignored.
    pub fn complete_save(
        &mut self,
        id: DocumentId,
        request: u64,
        result: GatewayResult<PathBuf>,
    ) -> SaveCompletion {
        let Some(idx) = self.index_of(id) else {
            tracing::debug!(doc = %id, request, "save response for closed document");
            return SaveCompletion::stale();
        };
        let Some(pending) = self.documents[idx]
            .pending_save
            .filter(|p| p.request == request)
        else {
            tracing::debug!(doc = %id, request, "stale save response");
            return SaveCompletion::stale();
        };
        self.documents[idx].pending_save = None;

        let outcome = match result {
            GatewayResult::Ok(path) => self.apply_saved(id, path, pending.version),
            GatewayResult::Canceled => SaveOutcome::Canceled,
            GatewayResult::Failed(error) => SaveOutcome::Failed(error),
        };
        let queued = match outcome {
            SaveOutcome::Canceled => None,
            _ => pending.queued,
        };
        SaveCompletion {
            outcome,
            after: pending.after,
            queued,
        }
    }

    /// Checks the destination picked for `request` before anything is written.
    /// The content is captured now, so the saved version is the current one.
    pub fn prepare_picked_save(&mut self, id: DocumentId, request: u64, path: &Path) -> PickedSave {
        let Some(idx) = self.index_of(id) else {
            return PickedSave::Stale;
        };
        if !self.documents[idx]
            .pending_save
            .is_some_and(|p| p.request == request)
        {
            return PickedSave::Stale;
        }

        let path = normalize_path(path);
        if let Some(other) = self.unsaved_document_at(id, &path) {
            return PickedSave::Blocked(format!("{} is open with unsaved changes", other.name));
        }
        let Some(content) = self.content(id) else {
            return PickedSave::Blocked(format!("{} has no text to save", self.documents[idx].name));
        };
        if let Err(reason) = language_for_path(&path).validate(&content) {
            return PickedSave::Blocked(reason);
        }

        let doc = &mut self.documents[idx];
        let version = doc.version;
        if let Some(pending) = doc.pending_save.as_mut() {
            pending.version = version;
        }
        PickedSave::Write(SaveRequest {
            doc: id,
            request,
            path: Some(path),
            content,
        })
    }

    fn unsaved_document_at(&self, except: DocumentId, path: &Path) -> Option<&Document> {
        self.documents
            .iter()
            .find(|d| d.id != except && d.dirty && d.path.as_deref() == Some(path))
    }

    fn apply_saved(&mut self, id: DocumentId, path: PathBuf, saved_version: u64) -> SaveOutcome {
        let path = normalize_path(&path);
        if let Some(other) = self.unsaved_document_at(id, &path) {
            tracing::warn!(doc = %id, other = %other.id, "save target has unsaved changes in another tab");
            return SaveOutcome::Failed(format!("{} is open with unsaved changes", other.name));
        }
        let Some(body) = self.document(id).map(|d| d.body) else {
            return SaveOutcome::Stale;
        };
        if let DocumentBody::Text { model } = body {
            if self.registry.model(model).is_none() {
                return SaveOutcome::Failed(ModelError::UnknownModel.to_string());
            }
        }

        let displaced: Vec<DocumentId> = self
            .documents
            .iter()
            .filter(|d| d.id != id && d.path.as_deref() == Some(path.as_path()))
            .map(|d| d.id)
            .collect();
        for other in &displaced {
            tracing::info!(doc = %other, path = %path.display(), "closing document replaced by save");
            self.dispose_document(*other);
        }

        let path_changed = self
            .document(id)
            .is_some_and(|d| d.path.as_deref() != Some(path.as_path()));
        if let Err(e) = self.rebind_if_needed(id, &path, language_for_path(&path)) {
            tracing::warn!(doc = %id, error = %e, "rebind after save failed");
            return SaveOutcome::Failed(e.to_string());
        }

        let Some(doc) = self.documents.iter_mut().find(|d| d.id == id) else {
            return SaveOutcome::Stale;
        };
        doc.dirty = doc.version != saved_version;
        SaveOutcome::Saved {
            path,
            path_changed,
            displaced,
            still_dirty: doc.dirty,
        }
    }

    /// Moves document `id` to `new_path`, recreating its model (or preview)
    /// when the bound identity or language differ. Content, cursor, selection
    /// and scroll survive; the viewport is remounted when the document is
    /// active. Returns whether anything changed.
    pub fn rebind_if_needed(
        &mut self,
        id: DocumentId,
        new_path: &Path,
        language: LanguageMode,
    ) -> Result<bool, SessionError> {
        let idx = self.index_of(id).ok_or(SessionError::UnknownDocument(id))?;
        let new_path = normalize_path(new_path);
        let body = self.documents[idx].body;

        let next_body = match body {
            DocumentBody::Text { model } => DocumentBody::Text {
                model: self
                    .registry
                    .rebind(model, ModelUri::File(new_path.clone()), language)?,
            },
            DocumentBody::Preview { surface, kind } => {
                let same = self
                    .registry
                    .preview(surface)
                    .is_some_and(|p| p.path == new_path);
                if same {
                    body
                } else {
                    self.registry.dispose_preview(surface);
                    DocumentBody::Preview {
                        surface: self.registry.create_preview(new_path.clone(), kind),
                        kind,
                    }
                }
            }
        };

        let doc = &mut self.documents[idx];
        let path_changed = doc.path.as_deref() != Some(new_path.as_path());
        doc.name = display_name(&new_path);
        doc.path = Some(new_path);
        doc.body = next_body;

        let rebound = next_body != body;
        if rebound && self.active == Some(id) {
            self.viewport.mount(surface_of(next_body));
        }
        Ok(path_changed || rebound)
    }

    pub fn request_close(&mut self, id: DocumentId) -> Result<CloseRequest, SessionError> {
        let doc = self.document(id).ok_or(SessionError::UnknownDocument(id))?;
        if doc.dirty && !doc.is_preview() {
            return Ok(CloseRequest::NeedsConfirmation);
        }
        self.discard_and_close(id)?;
        Ok(CloseRequest::Closed)
    }

    /// Closes without saving. Returns the new active document.
    pub fn discard_and_close(&mut self, id: DocumentId) -> Result<Option<DocumentId>, SessionError> {
        if self.index_of(id).is_none() {
            return Err(SessionError::UnknownDocument(id));
        }
        self.dispose_document(id);
        Ok(self.active)
    }

    pub fn close_all(&mut self) -> Vec<DocumentId> {
        let ids: Vec<DocumentId> = self.documents.iter().map(|d| d.id).collect();
        for id in &ids {
            self.dispose_document(*id);
        }
        ids
    }

    fn dispose_document(&mut self, id: DocumentId) {
        let Some(idx) = self.index_of(id) else {
            return;
        };
        let doc = self.documents.remove(idx);
        match doc.body {
            DocumentBody::Text { model } => {
                self.registry.dispose_model(model);
            }
            DocumentBody::Preview { surface, .. } => {
                self.registry.dispose_preview(surface);
            }
        }
        tracing::debug!(doc = %id, name = %doc.name, "document closed");

        if self.active != Some(id) {
            return;
        }
        self.active = None;
        match self.documents.last().map(|d| (d.id, surface_of(d.body))) {
            Some((next, surface)) => {
                self.viewport.mount(surface);
                self.active = Some(next);
            }
            None => {
                self.viewport.unmount();
            }
        }
    }

    /// Re-paths the document open on `old`, if any. The dirty flag is kept.
    pub fn rename_open_document(
        &mut self,
        old: &Path,
        new: &Path,
    ) -> Result<Option<DocumentId>, SessionError> {
        let Some(id) = self.find_by_path(old) else {
            return Ok(None);
        };
        let new = normalize_path(new);
        self.rebind_if_needed(id, &new, language_for_path(&new))?;
        Ok(Some(id))
    }

    /// Re-paths every document below a renamed directory.
    pub fn rename_documents_under(&mut self, old_dir: &Path, new_dir: &Path) -> Vec<DocumentId> {
        let old_dir = normalize_path(old_dir);
        let new_dir = normalize_path(new_dir);
        let moves: Vec<(DocumentId, PathBuf)> = self
            .documents
            .iter()
            .filter_map(|d| {
                let rel = d.path.as_deref()?.strip_prefix(&old_dir).ok()?;
                if rel.as_os_str().is_empty() {
                    return None;
                }
                Some((d.id, new_dir.join(rel)))
            })
            .collect();

        let mut renamed = Vec::with_capacity(moves.len());
        for (id, path) in moves {
            match self.rebind_if_needed(id, &path, language_for_path(&path)) {
                Ok(_) => renamed.push(id),
                Err(e) => tracing::warn!(doc = %id, error = %e, "failed to follow directory rename"),
            }
        }
        renamed
    }

    /// Closes, without saving, every document at or below `path`.
    pub fn close_documents_under(&mut self, path: &Path) -> Vec<DocumentId> {
        let path = normalize_path(path);
        let ids: Vec<DocumentId> = self
            .documents
            .iter()
            .filter(|d| d.is_under(&path))
            .map(|d| d.id)
            .collect();
        for id in &ids {
            self.dispose_document(*id);
        }
        ids
    }

    pub fn window_title(&self) -> String {
        match self.active_document() {
            Some(doc) if doc.dirty => format!("● {} - {}", doc.name, APP_TITLE),
            Some(doc) => format!("{} - {}", doc.name, APP_TITLE),
            None => APP_TITLE.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/session.rs"]
mod tests;
