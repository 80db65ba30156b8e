//! Headless application core (state/action/effect).

pub mod action;
pub mod editor;
pub mod effect;
pub mod explorer;
pub mod language;
pub mod output;
pub mod services;
pub mod session;
pub mod state;
pub mod store;

pub use action::Action;
pub use effect::Effect;
pub use explorer::ExplorerState;
pub use language::{FileKind, LanguageMode, PreviewKind};
pub use output::{OutputLevel, OutputLine, OutputState};
pub use session::{DocumentId, WorkspaceSession};
pub use state::{AppState, CloseConfirmState, ConfirmDialogState, PendingAction, UiState};
pub use store::{DispatchResult, Store};
