use std::path::PathBuf;

use super::DispatchResult;
use crate::kernel::language::FileKind;
use crate::kernel::services::ports::{BuildOutput, GatewayResult};
use crate::kernel::session::{
    AfterSave, CloseRequest, DocumentId, Opened, PickedSave, SaveOutcome, SaveRequest, SaveStart,
    SessionError,
};
use crate::kernel::state::CloseConfirmState;
use crate::kernel::{Action, Effect, OutputLevel};

impl super::Store {
    pub(super) fn reduce_session_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::NewDocument => match self.state.session.create_new_document() {
                Ok(id) => {
                    let name = self.document_name(id);
                    self.state.output.info(format!("New file {}", name));
                    DispatchResult::changed(Vec::new())
                }
                Err(e) => {
                    self.state.output.error(format!("Could not create a file: {}", e));
                    DispatchResult::changed(Vec::new())
                }
            },
            Action::OpenFileDialog => DispatchResult {
                effects: vec![Effect::PickAndOpenFile],
                state_changed: false,
            },
            Action::OpenPath(path) => self.open_path(path),
            Action::Activate(id) => match self.state.session.activate(id) {
                Ok(changed) => DispatchResult {
                    effects: Vec::new(),
                    state_changed: changed,
                },
                Err(e) => {
                    tracing::warn!(doc = %id, error = %e, "activate ignored");
                    DispatchResult::unchanged()
                }
            },
            Action::Save(doc) => {
                let Some(id) = doc.or(self.state.session.active()) else {
                    self.state.output.info("No file to save.");
                    return DispatchResult::changed(Vec::new());
                };
                self.start_save(id, AfterSave::Nothing)
            }
            Action::Close(doc) => {
                let Some(id) = doc.or(self.state.session.active()) else {
                    return DispatchResult::unchanged();
                };
                self.request_close(id)
            }
            Action::EditorEdit {
                start_char,
                end_char,
                text,
            } => self.edit_active(start_char, end_char, &text),
            Action::EditorSetCursor { row, col } => {
                let Some(id) = self.state.session.active() else {
                    return DispatchResult::unchanged();
                };
                DispatchResult {
                    effects: Vec::new(),
                    state_changed: self.state.session.set_cursor(id, row, col).unwrap_or(false),
                }
            }
            Action::EditorScrollTo { line } => {
                let Some(id) = self.state.session.active() else {
                    return DispatchResult::unchanged();
                };
                DispatchResult {
                    effects: Vec::new(),
                    state_changed: self.state.session.scroll_to(id, line).unwrap_or(false),
                }
            }
            Action::Run => self.run_active(),
            Action::FileRead { path, result } => match result {
                GatewayResult::Ok(content) => self.open_document(path, &content),
                GatewayResult::Canceled => DispatchResult::unchanged(),
                GatewayResult::Failed(e) => {
                    self.state
                        .output
                        .error(format!("Failed to open {}: {}", path.display(), e));
                    DispatchResult::changed(Vec::new())
                }
            },
            Action::FilePicked(result) => match result {
                GatewayResult::Ok((path, content)) => self.open_document(path, &content),
                GatewayResult::Canceled => {
                    self.state.output.info("Open canceled.");
                    DispatchResult::changed(Vec::new())
                }
                GatewayResult::Failed(e) => {
                    self.state.output.error(format!("Failed to open file: {}", e));
                    DispatchResult::changed(Vec::new())
                }
            },
            Action::SavePathPicked {
                doc,
                request,
                result,
            } => self.save_to_picked_path(doc, request, result),
            Action::SaveCompleted {
                doc,
                request,
                result,
            } => self.finish_save(doc, request, result),
            Action::BuildFinished { doc, result } => self.finish_build(doc, result),
            _ => DispatchResult::unchanged(),
        }
    }

    pub(super) fn document_name(&self, id: DocumentId) -> String {
        self.state
            .session
            .document(id)
            .map(|d| d.name().to_string())
            .unwrap_or_default()
    }

    /// Focuses an open document, opens previews directly, otherwise reads the file first.
    pub(super) fn open_path(&mut self, path: PathBuf) -> DispatchResult {
        if self.state.session.find_by_path(&path).is_some() {
            return self.open_document(path, "");
        }
        match FileKind::from_path(&path) {
            FileKind::Preview(_) => self.open_document(path, ""),
            FileKind::Text(_) => DispatchResult {
                effects: vec![Effect::ReadFile(path)],
                state_changed: false,
            },
        }
    }

    pub(super) fn open_document(&mut self, path: PathBuf, content: &str) -> DispatchResult {
        match self.state.session.open_or_focus(&path, content) {
            Ok(Opened::Created(id)) => {
                let name = self.document_name(id);
                self.state.output.info(format!("Opened {}", name));
                DispatchResult::changed(Vec::new())
            }
            Ok(Opened::Focused(_)) => DispatchResult::changed(Vec::new()),
            Err(e) => {
                self.state
                    .output
                    .error(format!("Failed to open {}: {}", path.display(), e));
                DispatchResult::changed(Vec::new())
            }
        }
    }

    fn edit_active(&mut self, start_char: usize, end_char: usize, text: &str) -> DispatchResult {
        let Some(id) = self.state.session.active() else {
            return DispatchResult::unchanged();
        };
        let outcome = match self.state.session.edit(id, start_char, end_char, text) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!(doc = %id, error = %e, "edit ignored");
                return DispatchResult::unchanged();
            }
        };

        let autosave = outcome.became_dirty
            && self.state.config.auto_save
            && self
                .state
                .session
                .document(id)
                .is_some_and(|d| !d.is_new());
        if autosave {
            let mut result = self.start_save(id, AfterSave::Nothing);
            result.state_changed = true;
            return result;
        }
        DispatchResult {
            effects: Vec::new(),
            state_changed: outcome.changed,
        }
    }

    pub(super) fn start_save(&mut self, id: DocumentId, after: AfterSave) -> DispatchResult {
        let name = self.document_name(id);
        match self.state.session.begin_save(id, after) {
            Ok(SaveStart::Issue(req)) => {
                tracing::info!(doc = %id, request = req.request, "saving");
                DispatchResult {
                    effects: vec![save_effect(req)],
                    state_changed: false,
                }
            }
            Ok(SaveStart::Queued) => {
                tracing::debug!(doc = %id, "save queued behind the one in flight");
                self.state.output.info(format!("Save of {} queued.", name));
                DispatchResult::changed(Vec::new())
            }
            Ok(SaveStart::NothingToSave) => {
                self.state.output.info(format!("Nothing to save in {}.", name));
                let follow_up = self.after_save(id, after);
                DispatchResult::changed(Vec::new()).merge(follow_up)
            }
            Err(SessionError::UnknownDocument(_)) => {
                tracing::warn!(doc = %id, "save for unknown document ignored");
                DispatchResult::unchanged()
            }
            Err(SessionError::PreviewNotEditable(_)) => {
                self.state.output.warn(format!("{} is a preview and cannot be saved.", name));
                DispatchResult::changed(Vec::new())
            }
            Err(e) => {
                self.state.output.error(format!("Save blocked: {}", e));
                DispatchResult::changed(Vec::new())
            }
        }
    }

    fn save_to_picked_path(
        &mut self,
        id: DocumentId,
        request: u64,
        result: GatewayResult<PathBuf>,
    ) -> DispatchResult {
        let path = match result {
            GatewayResult::Ok(path) => path,
            other => return self.finish_save(id, request, other),
        };
        match self.state.session.prepare_picked_save(id, request, &path) {
            PickedSave::Write(req) => DispatchResult {
                effects: vec![save_effect(req)],
                state_changed: false,
            },
            PickedSave::Blocked(reason) => {
                tracing::info!(doc = %id, path = %path.display(), %reason, "save target refused");
                self.finish_save(id, request, GatewayResult::Failed(reason))
            }
            PickedSave::Stale => DispatchResult::unchanged(),
        }
    }

    fn finish_save(
        &mut self,
        id: DocumentId,
        request: u64,
        result: GatewayResult<PathBuf>,
    ) -> DispatchResult {
        let completion = self.state.session.complete_save(id, request, result);
        let name = self.document_name(id);

        let mut queued = completion.queued;
        let mut dispatch = DispatchResult::changed(Vec::new());
        match completion.outcome {
            SaveOutcome::Stale => return DispatchResult::unchanged(),
            SaveOutcome::Canceled => {
                self.state.output.info("Save canceled.");
            }
            SaveOutcome::Failed(e) => {
                self.state
                    .output
                    .error(format!("Failed to save {}: {}", name, e));
            }
            SaveOutcome::Saved {
                path,
                displaced,
                still_dirty,
                ..
            } => {
                self.state.output.success(format!("Saved {}", path.display()));
                if !displaced.is_empty() {
                    self.state.output.info(format!(
                        "Closed {} other tab(s) open on {}",
                        displaced.len(),
                        path.display()
                    ));
                }
                if self.state.explorer.is_open() {
                    dispatch.effects.extend(self.state.explorer.reload());
                }

                // Edits that arrived during a save-and-close are never dropped.
                let mut after = completion.after;
                if after == AfterSave::Close && still_dirty {
                    after = AfterSave::Nothing;
                    match queued {
                        Some(next) => queued = Some(next.merge(AfterSave::Close)),
                        None => {
                            self.state
                                .output
                                .warn(format!("{} changed while saving and was not closed.", name));
                            self.state.ui.close_confirm = Some(CloseConfirmState { doc: id, name });
                        }
                    }
                }
                dispatch = dispatch.merge(self.after_save(id, after));

                let confirming = self
                    .state
                    .ui
                    .close_confirm
                    .as_ref()
                    .is_some_and(|c| c.doc == id);
                if queued.is_none() && still_dirty && !confirming && self.state.config.auto_save {
                    dispatch = dispatch.merge(self.start_save(id, AfterSave::Nothing));
                }
            }
        }

        if let Some(queued) = queued {
            if self.state.session.document(id).is_some() {
                dispatch = dispatch.merge(self.start_save(id, queued));
            }
        }
        dispatch
    }

    /// Follow-up of a save that succeeded or had nothing to write.
    fn after_save(&mut self, id: DocumentId, after: AfterSave) -> DispatchResult {
        match after {
            AfterSave::Nothing => DispatchResult::unchanged(),
            AfterSave::Close => {
                let name = self.document_name(id);
                match self.state.session.discard_and_close(id) {
                    Ok(_) => {
                        self.state.output.info(format!("Closed {}", name));
                        DispatchResult::changed(Vec::new())
                    }
                    Err(e) => {
                        tracing::warn!(doc = %id, error = %e, "close after save ignored");
                        DispatchResult::unchanged()
                    }
                }
            }
            AfterSave::Run => self.issue_build(id),
        }
    }

    fn request_close(&mut self, id: DocumentId) -> DispatchResult {
        let name = self.document_name(id);
        match self.state.session.request_close(id) {
            Ok(CloseRequest::Closed) => {
                self.state.output.info(format!("Closed {}", name));
                DispatchResult::changed(Vec::new())
            }
            Ok(CloseRequest::NeedsConfirmation) => {
                self.state.ui.close_confirm = Some(CloseConfirmState { doc: id, name });
                DispatchResult::changed(Vec::new())
            }
            Err(e) => {
                tracing::warn!(doc = %id, error = %e, "close ignored");
                DispatchResult::unchanged()
            }
        }
    }

    fn run_active(&mut self) -> DispatchResult {
        let Some(doc) = self.state.session.active_document() else {
            self.state.output.warn("Open a file to run.");
            return DispatchResult::changed(Vec::new());
        };
        if doc.is_preview() {
            let name = doc.name().to_string();
            self.state.output.warn(format!("{} cannot be run.", name));
            return DispatchResult::changed(Vec::new());
        }
        let id = doc.id();
        self.start_save(id, AfterSave::Run)
    }

    fn issue_build(&mut self, id: DocumentId) -> DispatchResult {
        let Some(doc) = self.state.session.document(id) else {
            return DispatchResult::unchanged();
        };
        let (Some(path), Some(content)) = (
            doc.path().map(|p| p.to_path_buf()),
            self.state.session.content(id),
        ) else {
            return DispatchResult::unchanged();
        };
        self.state
            .output
            .info(format!("Building {}...", path.display()));
        DispatchResult::changed(vec![Effect::RunOrBuild {
            doc: id,
            path,
            content,
        }])
    }

    fn finish_build(&mut self, id: DocumentId, result: GatewayResult<BuildOutput>) -> DispatchResult {
        match result {
            GatewayResult::Ok(BuildOutput { success, output }) => {
                let level = if success {
                    OutputLevel::Success
                } else {
                    OutputLevel::Error
                };
                self.state.output.replace(level, output);
                if !success {
                    let name = self.document_name(id);
                    self.state.output.error(format!("Build of {} failed.", name));
                }
            }
            GatewayResult::Canceled => self.state.output.info("Build canceled."),
            GatewayResult::Failed(e) => self.state.output.error(format!("Build failed: {}", e)),
        }
        DispatchResult::changed(Vec::new())
    }
}

fn save_effect(req: SaveRequest) -> Effect {
    match req.path {
        Some(path) => Effect::SaveFile {
            doc: req.doc,
            request: req.request,
            path,
            content: req.content,
        },
        None => Effect::PickSavePath {
            doc: req.doc,
            request: req.request,
        },
    }
}
