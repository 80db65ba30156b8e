//! 本地文件系统网关
//!
//! 实现 FileGateway trait，操作本地文件系统

use crate::kernel::language::validate_json;
use crate::kernel::services::ports::file::{DirEntry, FileError, FileGateway, Result};
use crate::kernel::services::ports::{Dialogs, GatewayResult, WorkbenchConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SUGGESTED_SAVE_NAME: &str = "untitled.c";

pub struct LocalFileGateway {
    dialogs: Arc<dyn Dialogs>,
    config: WorkbenchConfig,
}

impl LocalFileGateway {
    pub fn new(dialogs: Arc<dyn Dialogs>, config: WorkbenchConfig) -> Self {
        Self { dialogs, config }
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        if !path.exists() {
            return Err(FileError::NotFound(path.to_path_buf()));
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            let is_dir = entry.file_type()?.is_dir();
            if !is_dir && !self.config.allows_file_name(&name) {
                continue;
            }
            entries.push(DirEntry {
                name,
                path: entry.path(),
                is_dir,
            });
        }

        entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        });

        Ok(entries)
    }

    fn read(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(FileError::NotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(FileError::NotAFile(path.to_path_buf()));
        }
        Ok(fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            validate_json(content).map_err(|reason| FileError::InvalidJson {
                path: path.to_path_buf(),
                reason,
            })?;
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(fs::write(path, content)?)
    }

    fn move_path(&self, from: &Path, to: &Path) -> Result<()> {
        if !from.exists() {
            return Err(FileError::NotFound(from.to_path_buf()));
        }
        if to.exists() {
            return Err(FileError::AlreadyExists(to.to_path_buf()));
        }
        Ok(fs::rename(from, to)?)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(FileError::NotFound(path.to_path_buf()));
        }
        if path.is_dir() {
            Ok(fs::remove_dir_all(path)?)
        } else {
            Ok(fs::remove_file(path)?)
        }
    }

    fn new_file(&self, path: &Path) -> Result<()> {
        fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => FileError::AlreadyExists(path.to_path_buf()),
                _ => FileError::Io(e),
            })?;
        Ok(())
    }

    fn new_dir(&self, path: &Path) -> Result<()> {
        if path.exists() {
            return Err(FileError::AlreadyExists(path.to_path_buf()));
        }
        Ok(fs::create_dir(path)?)
    }
}

impl FileGateway for LocalFileGateway {
    fn read_dir(&self, path: &Path) -> GatewayResult<Vec<DirEntry>> {
        self.list_dir(path).into()
    }

    fn read_file(&self, path: &Path) -> GatewayResult<String> {
        self.read(path).into()
    }

    fn write_file(&self, path: &Path, content: &str) -> GatewayResult<()> {
        self.write(path, content).into()
    }

    fn pick_save_path(&self) -> GatewayResult<PathBuf> {
        match self.dialogs.pick_save_path(SUGGESTED_SAVE_NAME) {
            Some(path) if path.is_dir() => {
                GatewayResult::Failed(format!("Not a file: {}", path.display()))
            }
            Some(path) => GatewayResult::Ok(path),
            None => GatewayResult::Canceled,
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> GatewayResult<()> {
        self.move_path(from, to).into()
    }

    fn delete(&self, path: &Path) -> GatewayResult<()> {
        self.remove(path).into()
    }

    fn create_file(&self, path: &Path) -> GatewayResult<()> {
        self.new_file(path).into()
    }

    fn create_folder(&self, path: &Path) -> GatewayResult<()> {
        self.new_dir(path).into()
    }

    fn pick_open_file(&self) -> GatewayResult<(PathBuf, String)> {
        let Some(path) = self.dialogs.pick_open_file() else {
            return GatewayResult::Canceled;
        };
        self.read(&path).map(|content| (path, content)).into()
    }

    fn pick_folder(&self) -> GatewayResult<PathBuf> {
        let Some(path) = self.dialogs.pick_folder() else {
            return GatewayResult::Canceled;
        };
        if !path.is_dir() {
            return GatewayResult::Failed(format!("Not a folder: {}", path.display()));
        }
        GatewayResult::Ok(path)
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/file/local.rs"]
mod tests;
