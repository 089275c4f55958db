use std::collections::HashMap;

use generational_arena::Index;
use termtree::Tree;

use crate::domain::arena::FeedTree;
use crate::domain::record::InstanceRecord;

pub trait TreeNodeConvert {
    /// One text tree per root.
    fn to_tree_string(&self) -> Vec<Tree<String>>;
}

impl<'a, R: InstanceRecord> TreeNodeConvert for FeedTree<'a, R> {
    fn to_tree_string(&self) -> Vec<Tree<String>> {
        self.roots()
            .iter()
            .filter_map(|&root| build_tree(self, root))
            .collect()
    }
}

/// Assemble the text tree below `root` children first, without recursion.
fn build_tree<R: InstanceRecord>(tree: &FeedTree<'_, R>, root: Index) -> Option<Tree<String>> {
    let mut built: HashMap<Index, Tree<String>> = HashMap::new();
    for (idx, node) in tree.iter_postorder(root) {
        let leaves: Vec<_> = node
            .children
            .iter()
            .filter_map(|child| built.remove(child))
            .collect();
        let label = format!("{} [{}]", node.record.label(), node.record.id());
        built.insert(idx, Tree::new(label).with_leaves(leaves));
    }
    built.remove(&root)
}

/// Take a text tree apart level by level.
///
/// Dropping a `Tree` recurses once per level, which deep chains cannot
/// afford.
pub fn release_tree<D: std::fmt::Display>(tree: Tree<D>) {
    let mut pending = vec![tree];
    while let Some(mut node) = pending.pop() {
        pending.append(&mut node.leaves);
    }
}
