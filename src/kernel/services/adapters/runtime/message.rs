use std::path::PathBuf;

use crate::kernel::services::ports::{BuildOutput, DirEntry, GatewayResult};
use crate::kernel::session::DocumentId;
use crate::kernel::Action;

#[derive(Debug)]
pub enum AppMessage {
    FileLoaded {
        path: PathBuf,
        result: GatewayResult<String>,
    },
    FilePicked(GatewayResult<(PathBuf, String)>),
    SavePathPicked {
        doc: DocumentId,
        request: u64,
        result: GatewayResult<PathBuf>,
    },
    FileSaved {
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

impl AppMessage {
    pub fn into_action(self) -> Action {
        match self {
            AppMessage::FileLoaded { path, result } => Action::FileRead { path, result },
            AppMessage::FilePicked(result) => Action::FilePicked(result),
            AppMessage::SavePathPicked {
                doc,
                request,
                result,
            } => Action::SavePathPicked {
                doc,
                request,
                result,
            },
            AppMessage::FileSaved {
                doc,
                request,
                result,
            } => Action::SaveCompleted {
                doc,
                request,
                result,
            },
            AppMessage::BuildFinished { doc, result } => Action::BuildFinished { doc, result },
            AppMessage::FolderPicked(result) => Action::FolderPicked(result),
            AppMessage::DirLoaded {
                path,
                generation,
                result,
            } => Action::DirLoaded {
                path,
                generation,
                result,
            },
            AppMessage::PathCreated {
                path,
                is_dir,
                result,
            } => Action::PathCreated {
                path,
                is_dir,
                result,
            },
            AppMessage::PathRenamed { from, to, result } => Action::PathRenamed { from, to, result },
            AppMessage::PathDeleted { path, result } => Action::PathDeleted { path, result },
        }
    }
}
