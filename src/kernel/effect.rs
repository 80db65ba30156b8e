use std::path::PathBuf;

use crate::kernel::session::DocumentId;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ReadFile(PathBuf),
    PickAndOpenFile,
    /// Asks the user where an untitled document goes; nothing is written yet.
    PickSavePath {
        doc: DocumentId,
        request: u64,
    },
    SaveFile {
        doc: DocumentId,
        request: u64,
        path: PathBuf,
        content: String,
    },
    RunOrBuild {
        doc: DocumentId,
        path: PathBuf,
        content: String,
    },
    LoadDir {
        path: PathBuf,
        generation: u64,
    },
    CreateFile(PathBuf),
    CreateFolder(PathBuf),
    RenamePath {
        from: PathBuf,
        to: PathBuf,
    },
    DeletePath {
        path: PathBuf,
        is_dir: bool,
    },
    PickFolder,
    PersistSetting {
        key: &'static str,
        value: serde_json::Value,
    },
}
