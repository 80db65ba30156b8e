use std::path::PathBuf;

use crate::kernel::explorer::ExplorerState;
use crate::kernel::output::OutputState;
use crate::kernel::services::ports::WorkbenchConfig;
use crate::kernel::session::{DocumentId, WorkspaceSession};

/// Work that waits for the user to confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeletePath { path: PathBuf, is_dir: bool },
}

#[derive(Debug, Clone, Default)]
pub struct ConfirmDialogState {
    pub visible: bool,
    pub message: String,
    pub on_confirm: Option<PendingAction>,
}

/// Save / discard / cancel prompt shown when closing a modified document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseConfirmState {
    pub doc: DocumentId,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub close_confirm: Option<CloseConfirmState>,
    pub confirm_dialog: ConfirmDialogState,
}

#[derive(Debug)]
pub struct AppState {
    pub session: WorkspaceSession,
    pub explorer: ExplorerState,
    pub output: OutputState,
    pub ui: UiState,
    pub config: WorkbenchConfig,
}

impl AppState {
    pub fn new(config: WorkbenchConfig) -> Self {
        Self {
            session: WorkspaceSession::new(),
            explorer: ExplorerState::new(),
            output: OutputState::new(),
            ui: UiState::default(),
            config,
        }
    }

    pub fn window_title(&self) -> String {
        self.session.window_title()
    }
}
