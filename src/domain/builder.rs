//! Tree builder: rebuilds the instance hierarchy from flat records.

use std::collections::HashSet;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::FeedTree;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::record::InstanceRecord;

/// Constructs a rooted forest from instance records.
///
/// Duplicate ids are rejected. A record whose parent id is not in the input
/// becomes an extra root.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the forest for `records`.
    ///
    /// Two passes over the input: insert one node per record, then wire each
    /// record to its parent in input order. Roots are the records whose
    /// parent does not resolve.
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn build<'a, R: InstanceRecord>(&self, records: &'a [R]) -> DomainResult<FeedTree<'a, R>> {
        let mut tree = FeedTree::new();

        let mut indices = Vec::with_capacity(records.len());
        for record in records {
            indices.push(tree.insert_node(record)?);
        }

        for (record, &idx) in records.iter().zip(&indices) {
            match record.previous_id() {
                Some(parent_id) if parent_id == record.id() => {
                    return Err(DomainError::CycleDetected(record.id().to_string()));
                }
                Some(parent_id) => match tree.find(parent_id) {
                    Some(parent_idx) => tree.attach(parent_idx, idx),
                    None => {
                        debug!(id = %record.id(), parent = %parent_id, "dangling parent, treating as root");
                        tree.push_root(idx);
                    }
                },
                None => tree.push_root(idx),
            }
        }

        self.check_reachable(&tree, records, &indices)?;
        debug!(nodes = tree.len(), roots = tree.roots().len(), "tree built");
        Ok(tree)
    }

    /// Every node must hang below some root; anything left over sits on a
    /// loop of parent links.
    fn check_reachable<R: InstanceRecord>(
        &self,
        tree: &FeedTree<'_, R>,
        records: &[R],
        indices: &[Index],
    ) -> DomainResult<()> {
        let reached: HashSet<Index> = tree.iter().map(|(idx, _)| idx).collect();
        match records
            .iter()
            .zip(indices)
            .find(|(_, idx)| !reached.contains(idx))
        {
            Some((stray, _)) => Err(DomainError::CycleDetected(stray.id().to_string())),
            None => Ok(()),
        }
    }
}
