//! Project tree state
//!
//! A lazy mirror of what the file gateway lists under the workspace root.
//! Every reload bumps a generation; listings from an older generation are
//! dropped on arrival.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::kernel::services::ports::DirEntry;
use crate::kernel::Effect;
use crate::models::{FileTree, FileTreeRow, LoadState, NodeId, NodeKind};

pub struct ExplorerState {
    tree: Option<FileTree>,
    pub rows: Vec<FileTreeRow>,
    generation: u64,
    reexpand: FxHashSet<PathBuf>,
}

impl std::fmt::Debug for ExplorerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorerState")
            .field("root", &self.root())
            .field("generation", &self.generation)
            .field("rows_len", &self.rows.len())
            .finish()
    }
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorerState {
    /// The placeholder state: no workspace open.
    pub fn new() -> Self {
        Self {
            tree: None,
            rows: Vec::new(),
            generation: 0,
            reexpand: FxHashSet::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.tree.is_some()
    }

    pub fn root(&self) -> Option<&Path> {
        self.tree.as_ref().map(|t| t.absolute_root())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn open(&mut self, root: PathBuf) -> Vec<Effect> {
        self.reexpand.clear();
        self.load_root(root)
    }

    /// Rebuilds the tree from scratch, re-expanding the directories that were open.
    pub fn reload(&mut self) -> Vec<Effect> {
        let Some(tree) = self.tree.as_mut() else {
            return Vec::new();
        };
        let root = tree.absolute_root().to_path_buf();
        self.reexpand = tree.expanded_dirs().into_iter().collect();
        self.load_root(root)
    }

    pub fn close(&mut self) -> bool {
        self.generation += 1;
        self.reexpand.clear();
        self.rows.clear();
        self.tree.take().is_some()
    }

    fn load_root(&mut self, root: PathBuf) -> Vec<Effect> {
        self.generation += 1;
        let mut tree = FileTree::new(root.clone());
        let root_id = tree.root();
        tree.set_load_state(root_id, LoadState::Loading);
        self.tree = Some(tree);
        self.refresh_rows();
        vec![Effect::LoadDir {
            path: root,
            generation: self.generation,
        }]
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.node(path).is_some()
    }

    /// `Some(true)` for a known directory, `Some(false)` for a known file.
    pub fn is_dir(&self, path: &Path) -> Option<bool> {
        let tree = self.tree.as_ref()?;
        let id = tree.find_node_by_path(path)?;
        Some(tree.is_dir(id))
    }

    pub fn is_expanded(&self, path: &Path) -> bool {
        self.tree
            .as_ref()
            .zip(self.node(path))
            .is_some_and(|(tree, id)| tree.is_expanded(id))
    }

    fn node(&self, path: &Path) -> Option<NodeId> {
        self.tree.as_ref()?.find_node_by_path(path)
    }

    /// Expands or collapses a directory, requesting its listing on first expansion.
    pub fn toggle(&mut self, path: &Path) -> (bool, Vec<Effect>) {
        let generation = self.generation;
        let Some(tree) = self.tree.as_mut() else {
            return (false, Vec::new());
        };
        let Some(id) = tree.find_node_by_path(path) else {
            return (false, Vec::new());
        };
        if !tree.is_dir(id) || id == tree.root() {
            return (false, Vec::new());
        }

        if tree.is_expanded(id) {
            tree.collapse(id);
            self.refresh_rows();
            return (true, Vec::new());
        }

        let effects = match tree.load_state(id) {
            Some(LoadState::NotLoaded) => {
                tree.set_load_state(id, LoadState::Loading);
                vec![Effect::LoadDir {
                    path: tree.full_path(id),
                    generation,
                }]
            }
            Some(LoadState::Loading) | Some(LoadState::Loaded) | None => Vec::new(),
        };
        tree.expand(id);
        self.refresh_rows();
        (true, effects)
    }

    pub fn apply_dir_loaded(
        &mut self,
        path: &Path,
        generation: u64,
        entries: Vec<DirEntry>,
    ) -> (bool, Vec<Effect>) {
        if generation != self.generation {
            tracing::debug!(path = %path.display(), generation, "dropping stale listing");
            return (false, Vec::new());
        }
        let Some(tree) = self.tree.as_mut() else {
            return (false, Vec::new());
        };
        let Some(node_id) = tree.find_node_by_path(path) else {
            return (false, Vec::new());
        };

        let mut effects = Vec::new();
        for entry in entries {
            let kind = if entry.is_dir {
                NodeKind::Dir
            } else {
                NodeKind::File
            };
            let Ok(child) = tree.insert_child(node_id, entry.name.into(), kind) else {
                continue;
            };
            if entry.is_dir {
                let child_path = tree.full_path(child);
                if self.reexpand.remove(&child_path) {
                    tree.set_load_state(child, LoadState::Loading);
                    tree.expand(child);
                    effects.push(Effect::LoadDir {
                        path: child_path,
                        generation,
                    });
                }
            }
        }

        tree.set_load_state(node_id, LoadState::Loaded);
        self.refresh_rows();
        (true, effects)
    }

    pub fn apply_dir_load_error(&mut self, path: &Path, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        let Some(node_id) = tree.find_node_by_path(path) else {
            return false;
        };

        tree.set_load_state(node_id, LoadState::NotLoaded);
        tree.collapse(node_id);
        self.refresh_rows();
        true
    }

    /// Full path of a visible row.
    pub fn row_path(&mut self, row: usize) -> Option<PathBuf> {
        let id = self.rows.get(row)?.id;
        Some(self.tree.as_mut()?.full_path(id))
    }

    fn refresh_rows(&mut self) {
        self.rows = match &self.tree {
            Some(tree) => tree.flatten_for_view(),
            None => Vec::new(),
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/explorer.rs"]
mod tests;
