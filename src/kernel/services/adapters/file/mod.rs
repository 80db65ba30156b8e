//! 文件网关实现
//!
//! 本地文件系统后端，对话框由 `Dialogs` 提供

pub mod local;

pub use local::LocalFileGateway;
