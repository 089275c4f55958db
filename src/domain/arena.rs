use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::record::InstanceRecord;

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode<'a, R> {
    /// Originating record, owned by the caller
    pub record: &'a R,
    /// Index of parent node in the arena, None for roots
    pub parent: Option<Index>,
    /// Indices of child nodes in discovery order
    pub children: Vec<Index>,
}

/// Arena-backed forest rebuilt from flat instance records.
///
/// Every record gets exactly one node; the `id -> Index` lookup is the only
/// way nodes are wired together, so no node can be referenced before it
/// exists. Roots keep input order and the first one is the primary root.
#[derive(Debug)]
pub struct FeedTree<'a, R: InstanceRecord> {
    arena: Arena<TreeNode<'a, R>>,
    lookup: HashMap<R::Id, Index>,
    roots: Vec<Index>,
}

impl<'a, R: InstanceRecord> Default for FeedTree<'a, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, R: InstanceRecord> FeedTree<'a, R> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            lookup: HashMap::new(),
            roots: Vec::new(),
        }
    }

    /// Insert a detached node for `record`.
    ///
    /// Fails when a node with the same id already exists.
    pub fn insert_node(&mut self, record: &'a R) -> DomainResult<Index> {
        if self.lookup.contains_key(record.id()) {
            return Err(DomainError::DuplicateId(record.id().to_string()));
        }
        let idx = self.arena.insert(TreeNode {
            record,
            parent: None,
            children: Vec::new(),
        });
        self.lookup.insert(record.id().clone(), idx);
        Ok(idx)
    }

    /// Append `child` to `parent`'s children.
    ///
    /// Each node is attached at most once; the builder wires every record
    /// exactly one time.
    pub(crate) fn attach(&mut self, parent: Index, child: Index) {
        if let Some(p) = self.arena.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.arena.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    pub(crate) fn push_root(&mut self, idx: Index) {
        self.roots.push(idx);
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode<'a, R>> {
        self.arena.get(idx)
    }

    pub fn record(&self, idx: Index) -> Option<&'a R> {
        self.arena.get(idx).map(|n| n.record)
    }

    pub fn find(&self, id: &R::Id) -> Option<Index> {
        self.lookup.get(id).copied()
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    /// First root in input order; the one that gets laid out.
    pub fn primary_root(&self) -> Option<Index> {
        self.roots.first().copied()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    pub fn parent_of(&self, id: &R::Id) -> Option<&'a R> {
        let node = self.get_node(self.find(id)?)?;
        node.parent.and_then(|p| self.record(p))
    }

    pub fn children_of(&self, id: &R::Id) -> Vec<&'a R> {
        self.find(id)
            .and_then(|idx| self.get_node(idx))
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&c| self.record(c))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Pre-order over every root, roots in input order.
    pub fn iter(&self) -> TreeIterator<'_, 'a, R> {
        TreeIterator::new(self, &self.roots)
    }

    /// Pre-order over the subtree below `root`.
    pub fn iter_from(&self, root: Index) -> TreeIterator<'_, 'a, R> {
        TreeIterator::new(self, &[root])
    }

    /// Post-order over the subtree below `root`: children before parents.
    pub fn iter_postorder(&self, root: Index) -> PostOrderIterator<'_, 'a, R> {
        PostOrderIterator::new(self, root)
    }

    /// Number of levels below and including `root`.
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self, root: Index) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(root, 1)];
        while let Some((idx, depth)) = stack.pop() {
            if let Some(node) = self.get_node(idx) {
                max_depth = max_depth.max(depth);
                stack.extend(node.children.iter().map(|&c| (c, depth + 1)));
            }
        }
        max_depth
    }

    /// Records without children below `root`, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self, root: Index) -> Vec<&'a R> {
        self.iter_from(root)
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.record)
            .collect()
    }
}

pub struct TreeIterator<'t, 'a, R: InstanceRecord> {
    tree: &'t FeedTree<'a, R>,
    stack: Vec<Index>,
}

impl<'t, 'a, R: InstanceRecord> TreeIterator<'t, 'a, R> {
    fn new(tree: &'t FeedTree<'a, R>, roots: &[Index]) -> Self {
        let stack = roots.iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl<'t, 'a, R: InstanceRecord> Iterator for TreeIterator<'t, 'a, R> {
    type Item = (Index, &'t TreeNode<'a, R>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'t, 'a, R: InstanceRecord> {
    tree: &'t FeedTree<'a, R>,
    stack: Vec<(Index, bool)>,
}

impl<'t, 'a, R: InstanceRecord> PostOrderIterator<'t, 'a, R> {
    fn new(tree: &'t FeedTree<'a, R>, root: Index) -> Self {
        Self {
            tree,
            stack: vec![(root, false)],
        }
    }
}

impl<'t, 'a, R: InstanceRecord> Iterator for PostOrderIterator<'t, 'a, R> {
    type Item = (Index, &'t TreeNode<'a, R>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
