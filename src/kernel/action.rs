use std::path::PathBuf;

use crate::kernel::services::ports::{BuildOutput, DirEntry, GatewayResult};
use crate::kernel::session::DocumentId;

#[derive(Debug, Clone)]
pub enum Action {
    NewDocument,
    OpenFileDialog,
    OpenPath(PathBuf),
    Activate(DocumentId),
    /// `None` targets the active document.
    Save(Option<DocumentId>),
    Close(Option<DocumentId>),
    CloseConfirmSave,
    CloseConfirmDiscard,
    CloseConfirmCancel,
    EditorEdit {
        start_char: usize,
        end_char: usize,
        text: String,
    },
    EditorSetCursor {
        row: usize,
        col: usize,
    },
    EditorScrollTo {
        line: usize,
    },
    Run,
    OpenFolderDialog,
    OpenFolder(PathBuf),
    CloseFolder,
    ClearRecentFolders,
    ExplorerToggle(PathBuf),
    ExplorerActivate(PathBuf),
    ExplorerNewFile {
        parent: PathBuf,
        name: String,
    },
    ExplorerNewFolder {
        parent: PathBuf,
        name: String,
    },
    ExplorerRename {
        path: PathBuf,
        new_name: String,
    },
    ExplorerDelete(PathBuf),
    ConfirmDialogAccept,
    ConfirmDialogCancel,
    ClearOutput,

    FileRead {
        path: PathBuf,
        result: GatewayResult<String>,
    },
    FilePicked(GatewayResult<(PathBuf, String)>),
    SavePathPicked {
        doc: DocumentId,
        request: u64,
        result: GatewayResult<PathBuf>,
    },
    SaveCompleted {
        doc: DocumentId,
        request: u64,
        result: GatewayResult<PathBuf>,
    },
    BuildFinished {
        doc: DocumentId,
        result: GatewayResult<BuildOutput>,
    },
    FolderPicked(GatewayResult<PathBuf>),
    DirLoaded {
        path: PathBuf,
        generation: u64,
        result: GatewayResult<Vec<DirEntry>>,
    },
    PathCreated {
        path: PathBuf,
        is_dir: bool,
        result: GatewayResult<()>,
    },
    PathRenamed {
        from: PathBuf,
        to: PathBuf,
        result: GatewayResult<()>,
    },
    PathDeleted {
        path: PathBuf,
        result: GatewayResult<()>,
    },
}
