use indexmap::IndexMap;
use log::debug;

use crate::descriptor::ApplicationDescriptor;

/// Descriptors sharing a group key, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: String,
    pub members: Vec<ApplicationDescriptor>,
}

/// Group key -> members, keyed in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    groups: IndexMap<String, Vec<ApplicationDescriptor>>,
}

impl Hierarchy {
    /// Group `descriptors` by the key the name parser derives for each.
    ///
    /// Descriptors are never deduplicated: two entries with the same name
    /// become two members of the same group.
    pub fn build(descriptors: &[ApplicationDescriptor]) -> Self {
        let mut groups: IndexMap<String, Vec<ApplicationDescriptor>> = IndexMap::new();
        for descriptor in descriptors {
            let key = descriptor.parsed_name().group_key;
            match groups.get_mut(key) {
                Some(members) => members.push(descriptor.clone()),
                None => {
                    groups.insert(key.to_string(), vec![descriptor.clone()]);
                }
            }
        }
        debug!(
            "built hierarchy: {} descriptors in {} groups",
            descriptors.len(),
            groups.len()
        );
        Self { groups }
    }

    /// Groups in first-seen order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[ApplicationDescriptor])> {
        self.groups
            .iter()
            .map(|(key, members)| (key.as_str(), members.as_slice()))
    }

    pub fn get(&self, key: &str) -> Option<&[ApplicationDescriptor]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn descriptor_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Owned snapshot of every group.
    pub fn to_groups(&self) -> Vec<Group> {
        self.groups
            .iter()
            .map(|(key, members)| Group {
                key: key.clone(),
                members: members.clone(),
            })
            .collect()
    }
}
