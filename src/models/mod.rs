//! 数据模型层

pub mod file_tree;
pub mod selection;
pub mod text_buffer;

pub use file_tree::{FileTree, FileTreeError, FileTreeRow, LoadState, NodeId, NodeKind};
pub use selection::Selection;
pub use text_buffer::{slice_to_cow, TextBuffer};
