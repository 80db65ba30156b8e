use std::path::PathBuf;

use serde_json::Value;

use super::DispatchResult;
use crate::kernel::services::ports::settings::{LAST_OPEN_FOLDER, MAX_RECENT_FOLDERS};
use crate::kernel::services::ports::GatewayResult;
use crate::kernel::session::normalize_path;
use crate::kernel::{Action, Effect};

impl super::Store {
    pub(super) fn reduce_workspace_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::OpenFolderDialog => DispatchResult {
                effects: vec![Effect::PickFolder],
                state_changed: false,
            },
            Action::FolderPicked(result) => match result {
                GatewayResult::Ok(path) => self.open_folder(path),
                GatewayResult::Canceled => {
                    self.state.output.info("Open folder canceled.");
                    DispatchResult::changed(Vec::new())
                }
                GatewayResult::Failed(e) => {
                    self.state.output.error(format!("Failed to open folder: {}", e));
                    DispatchResult::changed(Vec::new())
                }
            },
            Action::OpenFolder(path) => self.open_folder(path),
            Action::CloseFolder => {
                if !self.state.explorer.is_open() && self.state.session.root().is_none() {
                    return DispatchResult::unchanged();
                }
                self.state.session.set_root(None);
                self.state.explorer.close();
                self.state.output.info("Closed folder");
                DispatchResult::changed(vec![Effect::PersistSetting {
                    key: LAST_OPEN_FOLDER,
                    value: Value::Null,
                }])
            }
            Action::ClearRecentFolders => {
                if self.state.config.recent_folders.is_empty() {
                    return DispatchResult::unchanged();
                }
                self.state.config.recent_folders.clear();
                self.state.output.info("Cleared recent folders");
                DispatchResult::changed(vec![self.persist_recent_folders()])
            }
            _ => DispatchResult::unchanged(),
        }
    }

    pub(super) fn open_folder(&mut self, path: PathBuf) -> DispatchResult {
        let path = normalize_path(&path);

        if self.state.config.close_tabs_on_folder_switch && !self.state.session.is_empty() {
            if self.state.session.has_dirty_documents() {
                self.state
                    .output
                    .warn("Save or close modified files before switching folders.");
                return DispatchResult::changed(Vec::new());
            }
            let closed = self.state.session.close_all();
            tracing::info!(count = closed.len(), "closed documents on folder switch");
        }

        self.state.session.set_root(Some(path.clone()));
        let mut effects = self.state.explorer.open(path.clone());

        let recent = &mut self.state.config.recent_folders;
        recent.retain(|p| p != &path);
        recent.insert(0, path.clone());
        recent.truncate(MAX_RECENT_FOLDERS);

        effects.push(Effect::PersistSetting {
            key: LAST_OPEN_FOLDER,
            value: Value::String(path.to_string_lossy().to_string()),
        });
        effects.push(self.persist_recent_folders());

        tracing::info!(root = %path.display(), "workspace opened");
        self.state
            .output
            .info(format!("Opened folder {}", path.display()));
        DispatchResult::changed(effects)
    }
}
