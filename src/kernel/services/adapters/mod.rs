//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod build;
pub mod file;
pub mod paths;
pub mod runtime;
pub mod settings;

pub use build::MakeBuildGateway;
pub use file::LocalFileGateway;
pub use paths::{ensure_log_dir, get_app_data_dir, get_log_dir, get_settings_path, APP_NAME};
pub use runtime::{AppMessage, AsyncRuntime, Gateways};
pub use settings::JsonSettingsStore;
