use std::collections::{BTreeMap, BTreeSet};

/// Category → sorted, duplicate-free character names.
pub type CategoryIndex = BTreeMap<String, Vec<String>>;

/// Collects which characters were seen under which category during one pass.
#[derive(Debug, Default, Clone)]
pub struct GroupIndexer {
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl GroupIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `character` under `category`. Blank names are ignored.
    pub fn register(&mut self, category: &str, character: &str) {
        if character.is_empty() {
            return;
        }
        self.groups
            .entry(category.to_string())
            .or_default()
            .insert(character.to_string());
    }

    /// Number of distinct characters currently under `category`.
    #[cfg(test)]
    pub(crate) fn count(&self, category: &str) -> usize {
        self.groups.get(category).map_or(0, BTreeSet::len)
    }

    /// Materialize the index; keys and names come out in code-point order.
    pub fn finish(self) -> CategoryIndex {
        self.groups
            .into_iter()
            .map(|(category, names)| (category, names.into_iter().collect()))
            .collect()
    }
}
