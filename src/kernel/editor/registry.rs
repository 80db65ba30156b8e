use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::fmt;
use std::path::PathBuf;

use super::model::{ModelUri, PreviewSurface, TextModel};
use crate::kernel::language::{LanguageMode, PreviewKind};

new_key_type! {
    pub struct ModelId;
    pub struct PreviewId;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UriInUse(ModelUri),
    UnknownModel,
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UriInUse(uri) => write!(f, "a model already exists for {}", uri),
            ModelError::UnknownModel => write!(f, "unknown model"),
        }
    }
}

impl std::error::Error for ModelError {}

/// Owns every live text model and preview surface.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: SlotMap<ModelId, TextModel>,
    by_uri: FxHashMap<ModelUri, ModelId>,
    previews: SlotMap<PreviewId, PreviewSurface>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_model(
        &mut self,
        uri: ModelUri,
        language: LanguageMode,
        content: &str,
    ) -> Result<ModelId, ModelError> {
        if self.by_uri.contains_key(&uri) {
            return Err(ModelError::UriInUse(uri));
        }
        let id = self
            .models
            .insert(TextModel::new(uri.clone(), language, content));
        self.by_uri.insert(uri, id);
        Ok(id)
    }

    pub fn get_model(&self, uri: &ModelUri) -> Option<ModelId> {
        self.by_uri.get(uri).copied()
    }

    pub fn model(&self, id: ModelId) -> Option<&TextModel> {
        self.models.get(id)
    }

    pub fn model_mut(&mut self, id: ModelId) -> Option<&mut TextModel> {
        self.models.get_mut(id)
    }

    pub fn dispose_model(&mut self, id: ModelId) -> Option<TextModel> {
        let model = self.models.remove(id)?;
        self.by_uri.remove(model.uri());
        Some(model)
    }

    /// Replaces `id` with a model under `uri`, carrying content and view state.
    ///
    /// When `uri` is owned by another model nothing is touched.
    pub fn rebind(
        &mut self,
        id: ModelId,
        uri: ModelUri,
        language: LanguageMode,
    ) -> Result<ModelId, ModelError> {
        let current = self.models.get(id).ok_or(ModelError::UnknownModel)?;
        if current.uri() == &uri && current.language() == language {
            return Ok(id);
        }
        if let Some(owner) = self.by_uri.get(&uri) {
            if *owner != id {
                return Err(ModelError::UriInUse(uri));
            }
        }

        let old = self.dispose_model(id).ok_or(ModelError::UnknownModel)?;
        let view = old.view_state();
        let new_id = self.create_model(uri, language, &old.content())?;
        if let Some(model) = self.models.get_mut(new_id) {
            model.restore_view_state(&view);
        }
        Ok(new_id)
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn create_preview(&mut self, path: PathBuf, kind: PreviewKind) -> PreviewId {
        self.previews.insert(PreviewSurface { path, kind })
    }

    pub fn preview(&self, id: PreviewId) -> Option<&PreviewSurface> {
        self.previews.get(id)
    }

    pub fn dispose_preview(&mut self, id: PreviewId) -> Option<PreviewSurface> {
        self.previews.remove(id)
    }

    pub fn preview_count(&self) -> usize {
        self.previews.len()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/registry.rs"]
mod tests;
