//! arcade-ide - 小型游戏开发 IDE 的工作区核心
//!
//! 模块结构：
//! - kernel: 无界面内核（state / action / effect / store）与服务端口、适配器
//! - models: 数据模型（FileTree, TextBuffer, Selection）

pub mod kernel;
pub mod models;
