//! Service ports: traits + data contracts.

pub mod build;
pub mod dialog;
pub mod file;
pub mod gateway;
pub mod settings;

pub use build::{BuildGateway, BuildOutput};
pub use dialog::Dialogs;
pub use file::{DirEntry, FileError, FileGateway, Result as FileResult};
pub use gateway::GatewayResult;
pub use settings::{SettingsError, SettingsStore, WorkbenchConfig};
