use log::debug;
use serde::{Deserialize, Serialize};

use crate::descriptor::ApplicationDescriptor;
use crate::hierarchy::Hierarchy;
use crate::selection::FilterSelection;

/// How the free-text query is compared against application names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryCase {
    /// `Triple` matches `triple.app.cpu`
    #[default]
    Insensitive,
    /// Exact substring containment
    Sensitive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    pub query_case: QueryCase,
}

impl MatchOptions {
    pub fn case_sensitive() -> Self {
        Self {
            query_case: QueryCase::Sensitive,
        }
    }
}

/// One row of the picker as handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayNode {
    Leaf {
        #[serde(rename = "name")]
        display_name: String,
        descriptor: ApplicationDescriptor,
    },
    #[serde(rename = "group")]
    ExpandableGroup {
        #[serde(rename = "name")]
        display_name: String,
        children: Vec<DisplayNode>,
    },
}

impl DisplayNode {
    fn leaf(descriptor: &ApplicationDescriptor) -> Self {
        DisplayNode::Leaf {
            display_name: descriptor.name.clone(),
            descriptor: descriptor.clone(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            DisplayNode::Leaf { display_name, .. }
            | DisplayNode::ExpandableGroup { display_name, .. } => display_name,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, DisplayNode::ExpandableGroup { .. })
    }

    pub fn children(&self) -> &[DisplayNode] {
        match self {
            DisplayNode::Leaf { .. } => &[],
            DisplayNode::ExpandableGroup { children, .. } => children,
        }
    }

    pub fn descriptor(&self) -> Option<&ApplicationDescriptor> {
        match self {
            DisplayNode::Leaf { descriptor, .. } => Some(descriptor),
            DisplayNode::ExpandableGroup { .. } => None,
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            DisplayNode::Leaf { .. } => 1,
            DisplayNode::ExpandableGroup { children, .. } => children.len(),
        }
    }
}

/// The ordered display sequence produced by [`evaluate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DisplayTree {
    nodes: Vec<DisplayNode>,
}

impl DisplayTree {
    pub fn nodes(&self) -> &[DisplayNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of matching descriptors across all nodes.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().map(DisplayNode::leaf_count).sum()
    }

    /// Top-level node with the given display name.
    pub fn find(&self, display_name: &str) -> Option<&DisplayNode> {
        self.nodes
            .iter()
            .find(|node| node.display_name() == display_name)
    }

    pub fn top_level_names(&self) -> Vec<&str> {
        self.nodes.iter().map(DisplayNode::display_name).collect()
    }

    /// Every leaf name in display order, group children included.
    pub fn leaf_names(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            match node {
                DisplayNode::Leaf { display_name, .. } => names.push(display_name.as_str()),
                DisplayNode::ExpandableGroup { children, .. } => {
                    names.extend(children.iter().map(DisplayNode::display_name));
                }
            }
        }
        names
    }
}

/// Per-descriptor predicate for one selection.
pub struct Matcher<'a> {
    selection: &'a FilterSelection,
    options: MatchOptions,
    normalized_query: String,
}

impl<'a> Matcher<'a> {
    pub fn new(selection: &'a FilterSelection, options: MatchOptions) -> Self {
        let normalized_query = match options.query_case {
            QueryCase::Insensitive => selection.query.to_lowercase(),
            QueryCase::Sensitive => selection.query.clone(),
        };
        Self {
            selection,
            options,
            normalized_query,
        }
    }

    /// True iff every active criterion holds for `descriptor`.
    pub fn matches(&self, descriptor: &ApplicationDescriptor) -> bool {
        self.matches_query(descriptor)
            && self.matches_source_kind(descriptor)
            && self.matches_profile_type(descriptor)
    }

    fn matches_query(&self, descriptor: &ApplicationDescriptor) -> bool {
        if self.normalized_query.is_empty() {
            return true;
        }
        match self.options.query_case {
            QueryCase::Insensitive => descriptor
                .name
                .to_lowercase()
                .contains(&self.normalized_query),
            QueryCase::Sensitive => descriptor.name.contains(&self.normalized_query),
        }
    }

    fn matches_source_kind(&self, descriptor: &ApplicationDescriptor) -> bool {
        match self.selection.active_source_kind.as_deref() {
            None => true,
            Some(kind) => descriptor.source_kind == kind,
        }
    }

    fn matches_profile_type(&self, descriptor: &ApplicationDescriptor) -> bool {
        match self.selection.active_profile_type.as_deref() {
            None => true,
            Some(wanted) => descriptor.profile_type() == Some(wanted),
        }
    }
}

/// Filter `hierarchy` by `selection` with default matching options.
pub fn evaluate(hierarchy: &Hierarchy, selection: &FilterSelection) -> DisplayTree {
    evaluate_with(hierarchy, selection, MatchOptions::default())
}

/// Filter `hierarchy` by `selection` and collapse each group.
///
/// A group with no matching members is dropped, a group with exactly one
/// becomes that member's leaf, and a group with two or more becomes an
/// expandable group named by its key.
pub fn evaluate_with(
    hierarchy: &Hierarchy,
    selection: &FilterSelection,
    options: MatchOptions,
) -> DisplayTree {
    let matcher = Matcher::new(selection, options);
    let mut nodes = Vec::new();

    for (key, members) in hierarchy.groups() {
        let surviving: Vec<&ApplicationDescriptor> = members
            .iter()
            .filter(|descriptor| matcher.matches(descriptor))
            .collect();

        match surviving.as_slice() {
            [] => {}
            [only] => nodes.push(DisplayNode::leaf(only)),
            many => nodes.push(DisplayNode::ExpandableGroup {
                display_name: key.to_string(),
                children: many.iter().map(|d| DisplayNode::leaf(d)).collect(),
            }),
        }
    }

    debug!(
        "evaluated {} groups into {} display nodes (query: '{}', source kind: {:?}, profile type: {:?})",
        hierarchy.len(),
        nodes.len(),
        selection.query,
        selection.active_source_kind,
        selection.active_profile_type
    );

    DisplayTree { nodes }
}
