use std::path::PathBuf;

/// Native pickers. `None` means the user dismissed the dialog.
pub trait Dialogs: Send + Sync {
    fn pick_save_path(&self, suggested_name: &str) -> Option<PathBuf>;
    fn pick_open_file(&self) -> Option<PathBuf>;
    fn pick_folder(&self) -> Option<PathBuf>;
}
