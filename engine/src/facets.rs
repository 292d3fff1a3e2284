use indexmap::IndexSet;

use crate::descriptor::ApplicationDescriptor;

/// The filter values offered by the picker: every distinct source kind and
/// profile type present in an inventory, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    source_kinds: IndexSet<String>,
    profile_types: IndexSet<String>,
}

impl Facets {
    pub fn collect(descriptors: &[ApplicationDescriptor]) -> Self {
        let mut facets = Self::default();
        for descriptor in descriptors {
            facets.source_kinds.insert(descriptor.source_kind.clone());
            if let Some(profile_type) = descriptor.profile_type() {
                facets.profile_types.insert(profile_type.to_string());
            }
        }
        facets
    }

    pub fn source_kinds(&self) -> impl ExactSizeIterator<Item = &str> {
        self.source_kinds.iter().map(String::as_str)
    }

    pub fn profile_types(&self) -> impl ExactSizeIterator<Item = &str> {
        self.profile_types.iter().map(String::as_str)
    }

    pub fn source_kind_at(&self, index: usize) -> Option<&str> {
        self.source_kinds.get_index(index).map(String::as_str)
    }

    pub fn profile_type_at(&self, index: usize) -> Option<&str> {
        self.profile_types.get_index(index).map(String::as_str)
    }

    pub fn has_source_kind(&self, kind: &str) -> bool {
        self.source_kinds.contains(kind)
    }

    pub fn has_profile_type(&self, profile_type: &str) -> bool {
        self.profile_types.contains(profile_type)
    }
}
