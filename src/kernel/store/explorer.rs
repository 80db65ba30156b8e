use std::path::{Path, PathBuf};

use super::DispatchResult;
use crate::kernel::services::ports::GatewayResult;
use crate::kernel::session::normalize_path;
use crate::kernel::state::PendingAction;
use crate::kernel::{Action, Effect};

/// Rejects names that would escape the parent directory or be empty.
fn validate_entry_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty.".to_string());
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err("Name cannot contain path separators.".to_string());
    }
    if trimmed == "." || trimmed == ".." {
        return Err(format!("'{}' is not a valid name.", trimmed));
    }
    Ok(())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

impl super::Store {
    pub(super) fn reduce_explorer_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::ExplorerToggle(path) => {
                let (state_changed, effects) = self.state.explorer.toggle(&path);
                DispatchResult {
                    effects,
                    state_changed,
                }
            }
            Action::ExplorerActivate(path) => match self.state.explorer.is_dir(&path) {
                Some(true) => {
                    let (state_changed, effects) = self.state.explorer.toggle(&path);
                    DispatchResult {
                        effects,
                        state_changed,
                    }
                }
                Some(false) => self.open_path(path),
                None => {
                    tracing::debug!(path = %path.display(), "activation of unknown tree path");
                    DispatchResult::unchanged()
                }
            },
            Action::ExplorerNewFile { parent, name } => self.create_entry(parent, &name, false),
            Action::ExplorerNewFolder { parent, name } => self.create_entry(parent, &name, true),
            Action::ExplorerRename { path, new_name } => self.rename_entry(path, &new_name),
            Action::ExplorerDelete(path) => {
                let path = normalize_path(&path);
                if self.state.explorer.root() == Some(path.as_path()) {
                    self.state.output.error("The workspace folder cannot be deleted.");
                    return DispatchResult::changed(Vec::new());
                }
                let Some(is_dir) = self.state.explorer.is_dir(&path) else {
                    return DispatchResult::unchanged();
                };
                let message = format!(
                    "Delete '{}'{}? This cannot be undone.",
                    file_name_of(&path),
                    if is_dir { " and its contents" } else { "" }
                );
                self.open_confirm_dialog(message, PendingAction::DeletePath { path, is_dir });
                DispatchResult::changed(Vec::new())
            }
            Action::DirLoaded {
                path,
                generation,
                result,
            } => match result {
                GatewayResult::Ok(entries) => {
                    let (state_changed, effects) =
                        self.state
                            .explorer
                            .apply_dir_loaded(&path, generation, entries);
                    DispatchResult {
                        effects,
                        state_changed,
                    }
                }
                GatewayResult::Canceled => DispatchResult {
                    effects: Vec::new(),
                    state_changed: self.state.explorer.apply_dir_load_error(&path, generation),
                },
                GatewayResult::Failed(e) => {
                    if !self.state.explorer.apply_dir_load_error(&path, generation) {
                        return DispatchResult::unchanged();
                    }
                    self.state
                        .output
                        .error(format!("Failed to list {}: {}", path.display(), e));
                    DispatchResult::changed(Vec::new())
                }
            },
            Action::PathCreated {
                path,
                is_dir,
                result,
            } => match result {
                GatewayResult::Ok(()) => {
                    let kind = if is_dir { "folder" } else { "file" };
                    self.state
                        .output
                        .success(format!("Created {} {}", kind, path.display()));
                    let mut result = DispatchResult::changed(self.state.explorer.reload());
                    if !is_dir {
                        result = result.merge(self.open_document(path, ""));
                    }
                    result
                }
                GatewayResult::Canceled => DispatchResult::unchanged(),
                GatewayResult::Failed(e) => {
                    self.state
                        .output
                        .error(format!("Failed to create {}: {}", path.display(), e));
                    DispatchResult::changed(Vec::new())
                }
            },
            Action::PathRenamed { from, to, result } => match result {
                GatewayResult::Ok(()) => {
                    if let Err(e) = self.state.session.rename_open_document(&from, &to) {
                        self.state.output.error(format!(
                            "Renamed on disk, but the open tab could not follow: {}",
                            e
                        ));
                    }
                    let moved = self.state.session.rename_documents_under(&from, &to);
                    if !moved.is_empty() {
                        tracing::info!(count = moved.len(), "open documents followed directory rename");
                    }
                    self.state.output.success(format!(
                        "Renamed {} to {}",
                        file_name_of(&from),
                        file_name_of(&to)
                    ));
                    DispatchResult::changed(self.state.explorer.reload())
                }
                GatewayResult::Canceled => DispatchResult::unchanged(),
                GatewayResult::Failed(e) => {
                    self.state
                        .output
                        .error(format!("Failed to rename {}: {}", from.display(), e));
                    DispatchResult::changed(Vec::new())
                }
            },
            Action::PathDeleted { path, result } => match result {
                GatewayResult::Ok(()) => {
                    let closed = self.state.session.close_documents_under(&path);
                    self.state
                        .output
                        .success(format!("Deleted {}", path.display()));
                    if !closed.is_empty() {
                        self.state
                            .output
                            .info(format!("Closed {} tab(s) for deleted files", closed.len()));
                    }
                    DispatchResult::changed(self.state.explorer.reload())
                }
                GatewayResult::Canceled => DispatchResult::unchanged(),
                GatewayResult::Failed(e) => {
                    self.state
                        .output
                        .error(format!("Failed to delete {}: {}", path.display(), e));
                    DispatchResult::changed(Vec::new())
                }
            },
            _ => DispatchResult::unchanged(),
        }
    }

    fn create_entry(&mut self, parent: PathBuf, name: &str, is_dir: bool) -> DispatchResult {
        if !self.state.explorer.is_open() {
            self.state.output.error("Open a folder first.");
            return DispatchResult::changed(Vec::new());
        }
        let name = name.trim();
        if let Err(reason) = validate_entry_name(name) {
            self.state.output.error(reason);
            return DispatchResult::changed(Vec::new());
        }
        if !is_dir && !self.state.config.allows_file_name(name) {
            self.state.output.error(format!(
                "'{}' is not an allowed file type ({}).",
                name,
                self.state.config.file_extensions.join(", ")
            ));
            return DispatchResult::changed(Vec::new());
        }

        let parent = normalize_path(&parent);
        if self.state.explorer.is_dir(&parent) != Some(true) {
            self.state
                .output
                .error(format!("{} is not a folder in this workspace.", parent.display()));
            return DispatchResult::changed(Vec::new());
        }
        let path = parent.join(name);
        if self.state.explorer.contains(&path) {
            self.state
                .output
                .error(format!("{} already exists.", path.display()));
            return DispatchResult::changed(Vec::new());
        }

        let effect = if is_dir {
            Effect::CreateFolder(path)
        } else {
            Effect::CreateFile(path)
        };
        DispatchResult {
            effects: vec![effect],
            state_changed: false,
        }
    }

    fn rename_entry(&mut self, path: PathBuf, new_name: &str) -> DispatchResult {
        let path = normalize_path(&path);
        if self.state.explorer.root() == Some(path.as_path()) {
            self.state.output.error("The workspace folder cannot be renamed.");
            return DispatchResult::changed(Vec::new());
        }
        let Some(is_dir) = self.state.explorer.is_dir(&path) else {
            return DispatchResult::unchanged();
        };
        let new_name = new_name.trim();
        if let Err(reason) = validate_entry_name(new_name) {
            self.state.output.error(reason);
            return DispatchResult::changed(Vec::new());
        }
        if !is_dir && !self.state.config.allows_file_name(new_name) {
            self.state
                .output
                .error(format!("'{}' is not an allowed file type.", new_name));
            return DispatchResult::changed(Vec::new());
        }

        let Some(parent) = path.parent() else {
            return DispatchResult::unchanged();
        };
        let to = parent.join(new_name);
        if to == path {
            return DispatchResult::unchanged();
        }
        if self.state.explorer.contains(&to) || self.state.session.find_by_path(&to).is_some() {
            self.state.output.error(format!("{} already exists.", to.display()));
            return DispatchResult::changed(Vec::new());
        }

        DispatchResult {
            effects: vec![Effect::RenamePath { from: path, to }],
            state_changed: false,
        }
    }
}
