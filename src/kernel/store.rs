use serde_json::Value;

use super::services::ports::settings::{LAST_OPEN_FOLDER, RECENT_FOLDERS};
use super::{Action, AppState, Effect};

mod dialogs;
mod explorer;
mod session;
mod workspace;

#[derive(Debug, Default)]
pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self::default()
    }

    fn changed(effects: Vec<Effect>) -> Self {
        Self {
            effects,
            state_changed: true,
        }
    }

    fn merge(mut self, other: DispatchResult) -> Self {
        self.effects.extend(other.effects);
        self.state_changed |= other.state_changed;
        self
    }
}

pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Reopens the folder remembered from the previous run, if any.
    pub fn startup(&mut self) -> DispatchResult {
        match self.state.config.last_open_folder.clone() {
            Some(folder) => self.open_folder(folder),
            None => DispatchResult::unchanged(),
        }
    }

    /// Settings writes to flush before the process exits.
    pub fn shutdown(&self) -> Vec<Effect> {
        let last = match self.state.session.root() {
            Some(root) => Value::String(root.to_string_lossy().to_string()),
            None => Value::Null,
        };
        vec![
            Effect::PersistSetting {
                key: LAST_OPEN_FOLDER,
                value: last,
            },
            self.persist_recent_folders(),
        ]
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::NewDocument
            | Action::OpenFileDialog
            | Action::OpenPath(_)
            | Action::Activate(_)
            | Action::Save(_)
            | Action::Close(_)
            | Action::EditorEdit { .. }
            | Action::EditorSetCursor { .. }
            | Action::EditorScrollTo { .. }
            | Action::Run
            | Action::FileRead { .. }
            | Action::FilePicked(_)
            | Action::SavePathPicked { .. }
            | Action::SaveCompleted { .. }
            | Action::BuildFinished { .. } => self.reduce_session_action(action),
            Action::CloseConfirmSave
            | Action::CloseConfirmDiscard
            | Action::CloseConfirmCancel
            | Action::ConfirmDialogAccept
            | Action::ConfirmDialogCancel => self.reduce_dialog_action(action),
            Action::OpenFolderDialog
            | Action::OpenFolder(_)
            | Action::CloseFolder
            | Action::ClearRecentFolders
            | Action::FolderPicked(_) => self.reduce_workspace_action(action),
            Action::ExplorerToggle(_)
            | Action::ExplorerActivate(_)
            | Action::ExplorerNewFile { .. }
            | Action::ExplorerNewFolder { .. }
            | Action::ExplorerRename { .. }
            | Action::ExplorerDelete(_)
            | Action::DirLoaded { .. }
            | Action::PathCreated { .. }
            | Action::PathRenamed { .. }
            | Action::PathDeleted { .. } => self.reduce_explorer_action(action),
            Action::ClearOutput => DispatchResult {
                effects: Vec::new(),
                state_changed: self.state.output.clear(),
            },
        }
    }

    fn persist_recent_folders(&self) -> Effect {
        let folders = self
            .state
            .config
            .recent_folders
            .iter()
            .map(|p| Value::String(p.to_string_lossy().to_string()))
            .collect();
        Effect::PersistSetting {
            key: RECENT_FOLDERS,
            value: Value::Array(folders),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
