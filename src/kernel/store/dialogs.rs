use super::DispatchResult;
use crate::kernel::session::AfterSave;
use crate::kernel::state::{ConfirmDialogState, PendingAction};
use crate::kernel::{Action, Effect};

impl super::Store {
    pub(super) fn reduce_dialog_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::CloseConfirmSave => {
                let Some(confirm) = self.state.ui.close_confirm.take() else {
                    return DispatchResult::unchanged();
                };
                let mut result = self.start_save(confirm.doc, AfterSave::Close);
                result.state_changed = true;
                result
            }
            Action::CloseConfirmDiscard => {
                let Some(confirm) = self.state.ui.close_confirm.take() else {
                    return DispatchResult::unchanged();
                };
                match self.state.session.discard_and_close(confirm.doc) {
                    Ok(_) => self
                        .state
                        .output
                        .info(format!("Closed {} without saving", confirm.name)),
                    Err(e) => tracing::warn!(doc = %confirm.doc, error = %e, "discard ignored"),
                }
                DispatchResult::changed(Vec::new())
            }
            Action::CloseConfirmCancel => DispatchResult {
                effects: Vec::new(),
                state_changed: self.state.ui.close_confirm.take().is_some(),
            },
            Action::ConfirmDialogAccept => {
                if !self.state.ui.confirm_dialog.visible {
                    return DispatchResult::unchanged();
                }
                let pending = self.state.ui.confirm_dialog.on_confirm.take();
                self.state.ui.confirm_dialog = ConfirmDialogState::default();

                let effects = match pending {
                    Some(PendingAction::DeletePath { path, is_dir }) => {
                        vec![Effect::DeletePath { path, is_dir }]
                    }
                    None => Vec::new(),
                };
                DispatchResult::changed(effects)
            }
            Action::ConfirmDialogCancel => {
                if !self.state.ui.confirm_dialog.visible {
                    return DispatchResult::unchanged();
                }
                self.state.ui.confirm_dialog = ConfirmDialogState::default();
                self.state.output.info("Delete canceled.");
                DispatchResult::changed(Vec::new())
            }
            _ => DispatchResult::unchanged(),
        }
    }

    pub(super) fn open_confirm_dialog(&mut self, message: String, pending: PendingAction) {
        self.state.ui.confirm_dialog = ConfirmDialogState {
            visible: true,
            message,
            on_confirm: Some(pending),
        };
    }
}
