//! 文件网关 trait
//!
//! The workspace never touches disk itself; every filesystem operation goes
//! through a `FileGateway`.

use std::io;
use std::path::{Path, PathBuf};

use super::GatewayResult;

pub type Result<T> = std::result::Result<T, FileError>;

#[derive(Debug)]
pub enum FileError {
    Io(io::Error),
    NotFound(PathBuf),
    AlreadyExists(PathBuf),
    NotAFile(PathBuf),
    InvalidJson { path: PathBuf, reason: String },
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileError::Io(e) => write!(f, "IO error: {}", e),
            FileError::NotFound(p) => write!(f, "Not found: {}", p.display()),
            FileError::AlreadyExists(p) => write!(f, "Already exists: {}", p.display()),
            FileError::NotAFile(p) => write!(f, "Not a file: {}", p.display()),
            FileError::InvalidJson { reason, .. } => write!(f, "Invalid JSON: {}", reason),
        }
    }
}

impl std::error::Error for FileError {}

impl From<io::Error> for FileError {
    fn from(e: io::Error) -> Self {
        FileError::Io(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn new(path: PathBuf, is_dir: bool) -> Self {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { name, path, is_dir }
    }
}

pub trait FileGateway: Send + Sync {
    /// Lists `path`, filtered to the allowed file kinds, directories first.
    fn read_dir(&self, path: &Path) -> GatewayResult<Vec<DirEntry>>;

    fn read_file(&self, path: &Path) -> GatewayResult<String>;

    fn write_file(&self, path: &Path, content: &str) -> GatewayResult<()>;

    /// Asks the user where a new file should be saved. Writes nothing.
    fn pick_save_path(&self) -> GatewayResult<PathBuf>;

    fn rename(&self, from: &Path, to: &Path) -> GatewayResult<()>;

    /// Deletes a file or a directory tree.
    fn delete(&self, path: &Path) -> GatewayResult<()>;

    /// Creates an empty file; fails when `path` already exists.
    fn create_file(&self, path: &Path) -> GatewayResult<()>;

    fn create_folder(&self, path: &Path) -> GatewayResult<()>;

    fn pick_open_file(&self) -> GatewayResult<(PathBuf, String)>;

    fn pick_folder(&self) -> GatewayResult<PathBuf>;
}
