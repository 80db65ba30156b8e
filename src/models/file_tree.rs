//! 文件树数据模型
//!
//! The tree is a projection of what the file gateway reported; it never decides
//! whether a file exists.

use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};
use std::{
    collections::{BTreeMap, HashMap},
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
};

new_key_type! { pub struct NodeId; }

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Dir,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
}

#[derive(Debug)]
pub enum FileTreeError {
    ParentNotDirectory,
    NameExists,
    InvalidNodeId,
}

impl fmt::Display for FileTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileTreeError::ParentNotDirectory => write!(f, "parent is not a directory"),
            FileTreeError::NameExists => write!(f, "name already exists in parent"),
            FileTreeError::InvalidNodeId => write!(f, "invalid node id"),
        }
    }
}

impl std::error::Error for FileTreeError {}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    name: OsString,
    parent: Option<NodeId>,
    children: Option<BTreeMap<OsString, NodeId>>,
    load_state: LoadState,
}

impl Node {
    fn new_file(name: OsString, parent: Option<NodeId>) -> Self {
        Self {
            kind: NodeKind::File,
            name,
            parent,
            children: None,
            load_state: LoadState::Loaded,
        }
    }

    fn new_dir(name: OsString, parent: Option<NodeId>, load_state: LoadState) -> Self {
        Self {
            kind: NodeKind::Dir,
            name,
            parent,
            children: Some(BTreeMap::new()),
            load_state,
        }
    }
}

pub struct FileTree {
    arena: SlotMap<NodeId, Node>,
    root: NodeId,
    expanded: FxHashSet<NodeId>,
    absolute_root: PathBuf,
    path_cache: HashMap<NodeId, PathBuf>,
}

impl FileTree {
    /// Creates a tree whose root directory has not been listed yet.
    pub fn new(absolute_root: PathBuf) -> Self {
        let root_name = absolute_root
            .file_name()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| absolute_root.as_os_str().to_os_string());

        let mut arena = SlotMap::with_key();
        let root = arena.insert(Node::new_dir(root_name, None, LoadState::NotLoaded));

        let mut expanded = FxHashSet::default();
        expanded.insert(root);

        Self {
            arena,
            root,
            expanded,
            absolute_root,
            path_cache: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn absolute_root(&self) -> &Path {
        &self.absolute_root
    }

    pub fn load_state(&self, id: NodeId) -> Option<LoadState> {
        self.arena.get(id).map(|n| n.load_state)
    }

    pub fn set_load_state(&mut self, id: NodeId, state: LoadState) {
        if let Some(node) = self.arena.get_mut(id) {
            node.load_state = state;
        }
    }

    pub fn insert_child(
        &mut self,
        parent: NodeId,
        name: OsString,
        kind: NodeKind,
    ) -> Result<NodeId, FileTreeError> {
        {
            let parent_ro = self.arena.get(parent).ok_or(FileTreeError::InvalidNodeId)?;
            let children_ro = parent_ro
                .children
                .as_ref()
                .ok_or(FileTreeError::ParentNotDirectory)?;
            if children_ro.contains_key(&name) {
                return Err(FileTreeError::NameExists);
            }
        }

        let node = match kind {
            NodeKind::File => Node::new_file(name.clone(), Some(parent)),
            NodeKind::Dir => Node::new_dir(name.clone(), Some(parent), LoadState::NotLoaded),
        };
        let id = self.arena.insert(node);

        let children = self
            .arena
            .get_mut(parent)
            .and_then(|n| n.children.as_mut())
            .ok_or(FileTreeError::ParentNotDirectory)?;
        children.insert(name, id);

        Ok(id)
    }

    pub fn full_path(&mut self, id: NodeId) -> PathBuf {
        if id == self.root {
            return self.absolute_root.clone();
        }

        if let Some(cached_path) = self.path_cache.get(&id) {
            return cached_path.clone();
        }

        let mut components = vec![];
        let mut current = id;
        while let Some(node) = self.arena.get(current) {
            match node.parent {
                Some(parent) => {
                    components.push(node.name.clone());
                    current = parent;
                }
                None => break,
            }
        }

        let mut path = self.absolute_root.clone();
        for comp in components.iter().rev() {
            path.push(comp);
        }

        self.path_cache.insert(id, path.clone());
        path
    }

    pub fn find_node_by_path(&self, path: &Path) -> Option<NodeId> {
        if path == self.absolute_root {
            return Some(self.root);
        }

        let relative = path.strip_prefix(&self.absolute_root).ok()?;
        let mut current = self.root;
        for component in relative.components() {
            let children = self.arena.get(current)?.children.as_ref()?;
            current = *children.get(component.as_os_str())?;
        }
        Some(current)
    }

    pub fn expand(&mut self, id: NodeId) {
        if self.is_dir(id) {
            self.expanded.insert(id);
        }
    }

    pub fn collapse(&mut self, id: NodeId) {
        if id != self.root {
            self.expanded.remove(&id);
        }
    }

    pub fn is_dir(&self, id: NodeId) -> bool {
        self.arena
            .get(id)
            .map(|n| n.kind == NodeKind::Dir)
            .unwrap_or(false)
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn children(&self, id: NodeId) -> Option<impl Iterator<Item = (&OsString, &NodeId)>> {
        self.arena
            .get(id)
            .and_then(|n| n.children.as_ref())
            .map(|c| c.iter())
    }

    /// Paths of every expanded directory below the root, parents before children.
    pub fn expanded_dirs(&mut self) -> Vec<PathBuf> {
        let mut ids: Vec<(usize, NodeId)> = self
            .expanded
            .iter()
            .copied()
            .filter(|id| *id != self.root)
            .map(|id| (self.depth(id), id))
            .collect();
        ids.sort_by_key(|(depth, _)| *depth);
        ids.into_iter().map(|(_, id)| self.full_path(id)).collect()
    }

    fn depth(&self, mut id: NodeId) -> usize {
        let mut depth = 0;
        while let Some(parent) = self.arena.get(id).and_then(|n| n.parent) {
            depth += 1;
            id = parent;
        }
        depth
    }
}

#[derive(Debug, Clone)]
pub struct FileTreeRow {
    pub id: NodeId,
    pub depth: u16,
    pub name: OsString,
    pub is_dir: bool,
    pub is_expanded: bool,
    pub load_state: LoadState,
}

impl FileTree {
    /// Visible rows: directories first, then files, each in case-insensitive order.
    pub fn flatten_for_view(&self) -> Vec<FileTreeRow> {
        let mut result = Vec::new();
        let mut stack: Vec<(NodeId, u16)> = vec![(self.root, 0)];

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.arena.get(id) else {
                continue;
            };

            if id != self.root {
                result.push(FileTreeRow {
                    id,
                    depth,
                    name: node.name.clone(),
                    is_dir: node.kind == NodeKind::Dir,
                    is_expanded: self.expanded.contains(&id),
                    load_state: node.load_state,
                });
            }

            if !self.expanded.contains(&id) {
                continue;
            }
            let Some(children) = &node.children else {
                continue;
            };

            let mut dirs = Vec::new();
            let mut files = Vec::new();
            for (name, &child_id) in children.iter() {
                if let Some(child) = self.arena.get(child_id) {
                    let key = name.to_string_lossy().to_lowercase();
                    if child.kind == NodeKind::Dir {
                        dirs.push((key, child_id));
                    } else {
                        files.push((key, child_id));
                    }
                }
            }
            dirs.sort_by(|a, b| a.0.cmp(&b.0));
            files.sort_by(|a, b| a.0.cmp(&b.0));

            let child_depth = if id == self.root { 0 } else { depth + 1 };
            for (_, file_id) in files.into_iter().rev() {
                stack.push((file_id, child_depth));
            }
            for (_, dir_id) in dirs.into_iter().rev() {
                stack.push((dir_id, child_depth));
            }
        }

        result
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_tree.rs"]
mod tests;
