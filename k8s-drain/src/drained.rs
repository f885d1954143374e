use super::*;

/// Names of the nodes confirmed fully evicted during one drain run.
///
/// Insertion is the only mutation, so the set never shrinks within a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrainedSet {
    names: BTreeSet<String>,
}

impl DrainedSet {
    pub fn insert(&mut self, name: impl ToString) -> bool {
        self.names.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// The members of `nodes` not drained yet, sorted by name.
    pub fn pending(&self, nodes: &[corev1::Node]) -> BTreeSet<String> {
        nodes
            .iter()
            .map(|node| node.name_any())
            .filter(|name| !self.contains(name))
            .collect()
    }
}

impl fmt::Display for DrainedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
