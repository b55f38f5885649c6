use std::{collections::HashMap, hash::Hash};

/// A bijective mapping between ids and dense matrix indices.
///
/// Indices are assigned in ascending id order, which makes the mapping independent of the
/// order in which the ids were seen.
#[derive(Clone, Debug, PartialEq)]
pub struct IdIndex<Id>
where
    Id: Copy + Eq + Hash + Ord,
{
    ids: Vec<Id>,
    indices: HashMap<Id, usize>,
}

impl<Id> IdIndex<Id>
where
    Id: Copy + Eq + Hash + Ord,
{
    /// Creates the mapping from possibly repeated ids.
    pub fn new(ids: impl IntoIterator<Item = Id>) -> Self {
        let mut ids = ids.into_iter().collect::<Vec<_>>();
        ids.sort_unstable();
        ids.dedup();
        let indices = ids
            .iter()
            .enumerate()
            .map(|(index, &id)| (id, index))
            .collect();

        Self { ids, indices }
    }

    /// Gets the index of the id.
    pub fn index(&self, id: &Id) -> Option<usize> {
        self.indices.get(id).copied()
    }

    /// Gets the id at the index.
    pub fn id(&self, index: usize) -> Option<Id> {
        self.ids.get(index).copied()
    }

    /// The ids in index order.
    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
