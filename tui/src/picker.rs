use std::cell::Cell;
use std::collections::HashSet;

use appsel_engine::AppSource;
use appsel_engine::AppsState;
use appsel_engine::DisplayNode;
use appsel_engine::DisplayTree;
use appsel_engine::Facets;
use appsel_engine::FilterSelection;
use appsel_engine::Hierarchy;
use appsel_engine::MatchOptions;
use appsel_engine::SelectorConfig;
use appsel_engine::evaluate_with;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use tracing::debug;
use tracing::info;

use crate::line_editor::LineEditor;

/// How a picker session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    /// Full name of the chosen application
    Selected(String),
    Cancelled,
}

/// Which part of the picker receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    SourceKinds,
    ProfileTypes,
    List,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Search => Focus::SourceKinds,
            Focus::SourceKinds => Focus::ProfileTypes,
            Focus::ProfileTypes => Focus::List,
            Focus::List => Focus::Search,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Search => Focus::List,
            Focus::SourceKinds => Focus::Search,
            Focus::ProfileTypes => Focus::SourceKinds,
            Focus::List => Focus::ProfileTypes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VisibleRow {
    pub display_name: String,
    pub depth: usize,
    /// Group key of the enclosing group for children of an open group
    pub parent: Option<String>,
    pub variant: RowVariant,
}

impl VisibleRow {
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.variant, RowVariant::Leaf { .. })
    }

    fn id(&self) -> RowId {
        RowId {
            parent: self.parent.clone(),
            display_name: self.display_name.clone(),
            group: !self.is_leaf(),
        }
    }

    fn is(&self, id: &RowId) -> bool {
        self.display_name == id.display_name
            && self.parent == id.parent
            && self.is_leaf() != id.group
    }
}

/// Row identity across rebuilds. A dot-free app shares its name with the
/// key of the group it lands in, so the name alone is ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RowId {
    parent: Option<String>,
    display_name: String,
    group: bool,
}

impl RowId {
    fn group(key: String) -> Self {
        Self {
            parent: None,
            display_name: key,
            group: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RowVariant {
    Group { open: bool, children: usize },
    Leaf { source_kind: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StatusMessage {
    Info(String),
    Error(String),
}

/// Interactive application picker over the grouping engine.
///
/// The engine output is recomputed on every inventory or filter change.
/// Open/closed state is tracked here by group key, so a group stays open
/// across re-evaluations for as long as it keeps rendering as a group.
pub struct AppPicker {
    source: Box<dyn AppSource>,
    pub(crate) apps: AppsState,
    hierarchy: Hierarchy,
    pub(crate) facets: Facets,
    pub(crate) selection: FilterSelection,
    options: MatchOptions,
    expand_all: bool,
    pub(crate) tree: DisplayTree,
    open_groups: HashSet<String>,
    pub(crate) visible: Vec<VisibleRow>,
    pub(crate) highlight: usize,
    pub(crate) focus: Focus,
    pub(crate) source_cursor: usize,
    pub(crate) profile_cursor: usize,
    pub(crate) query: LineEditor,
    pub(crate) current_app: Option<String>,
    pub(crate) status: Option<StatusMessage>,
    pub(crate) scroll_offset: Cell<usize>,
    pub(crate) viewport_rows: Cell<usize>,
    refresh_requested: bool,
    outcome: Option<PickerOutcome>,
}

impl AppPicker {
    pub fn new(source: Box<dyn AppSource>, config: &SelectorConfig) -> Self {
        let selection = config.initial_selection();
        let query = LineEditor::with_text(&selection.query);
        let mut picker = Self {
            source,
            apps: AppsState::Pristine,
            hierarchy: Hierarchy::default(),
            facets: Facets::default(),
            selection,
            options: config.match_options(),
            expand_all: config.expand_all,
            tree: DisplayTree::default(),
            open_groups: HashSet::new(),
            visible: Vec::new(),
            highlight: 0,
            focus: Focus::Search,
            source_cursor: 0,
            profile_cursor: 0,
            query,
            current_app: None,
            status: None,
            scroll_offset: Cell::new(0),
            viewport_rows: Cell::new(0),
            refresh_requested: false,
            outcome: None,
        };
        picker.rebuild_inventory();
        picker
    }

    /// Label shown before anything is picked in this session.
    pub fn with_current_app(mut self, name: Option<String>) -> Self {
        self.current_app = name;
        self
    }

    pub fn current_app(&self) -> Option<&str> {
        self.current_app.as_deref()
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn tree(&self) -> &DisplayTree {
        &self.tree
    }

    pub fn is_loading(&self) -> bool {
        self.apps.is_loading()
    }

    /// No fetch has been attempted yet.
    pub fn is_pristine(&self) -> bool {
        matches!(self.apps, AppsState::Pristine)
    }

    pub fn is_done(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&PickerOutcome> {
        self.outcome.as_ref()
    }

    /// Names of the rows currently on screen, children of open groups
    /// included.
    pub fn visible_names(&self) -> Vec<&str> {
        self.visible
            .iter()
            .map(|row| row.display_name.as_str())
            .collect()
    }

    pub fn highlighted_name(&self) -> Option<&str> {
        self.visible
            .get(self.highlight)
            .map(|row| row.display_name.as_str())
    }

    /// Fetch the inventory from the configured source and rebuild.
    pub fn refresh(&mut self) {
        self.begin_refresh();
        self.complete_refresh();
    }

    /// Enter the loading state; the inventory is hidden until
    /// [`AppPicker::complete_refresh`] runs.
    pub fn begin_refresh(&mut self) {
        self.apps.begin_refresh();
        self.status = None;
        self.rebuild_inventory();
    }

    pub fn complete_refresh(&mut self) {
        self.refresh_requested = false;
        self.apps.refresh(self.source.as_ref());
        self.status = Some(match &self.apps {
            AppsState::Failed(message) => StatusMessage::Error(message.clone()),
            loaded => {
                let count = loaded.descriptors().len();
                debug!(count, origin = %self.source.describe(), "refreshed applications");
                StatusMessage::Info(format!("Loaded {count} applications"))
            }
        });
        self.rebuild_inventory();
    }

    /// True once after a refresh key press; the caller draws the loading
    /// state and then calls [`AppPicker::complete_refresh`].
    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    pub fn handle_paste(&mut self, pasted: &str) {
        if self.focus == Focus::Search {
            self.query.insert_str(pasted);
            self.query_changed();
        }
    }

    pub fn handle_key(&mut self, event: KeyEvent) {
        if event.kind == KeyEventKind::Release || self.is_done() {
            return;
        }

        match (event.modifiers, event.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) | (KeyModifiers::NONE, KeyCode::Esc) => {
                self.outcome = Some(PickerOutcome::Cancelled);
                return;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('r')) => {
                self.refresh_requested = true;
                self.begin_refresh();
                return;
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                self.focus = self.focus.next();
                return;
            }
            (_, KeyCode::BackTab) => {
                self.focus = self.focus.prev();
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Search => self.handle_search_key(event),
            Focus::SourceKinds | Focus::ProfileTypes => self.handle_facet_key(event),
            Focus::List => self.handle_list_key(event),
        }
    }

    fn handle_search_key(&mut self, event: KeyEvent) {
        match (event.modifiers, event.code) {
            (mods, KeyCode::Char('u')) if mods.contains(KeyModifiers::CONTROL) => {
                self.query.clear();
                self.query_changed();
            }
            (mods, KeyCode::Char(ch)) if mods.is_empty() || mods == KeyModifiers::SHIFT => {
                self.query.insert(ch);
                self.query_changed();
            }
            (KeyModifiers::NONE, KeyCode::Backspace) => {
                if self.query.backspace() {
                    self.query_changed();
                }
            }
            (KeyModifiers::NONE, KeyCode::Delete) => {
                if self.query.delete() {
                    self.query_changed();
                }
            }
            (KeyModifiers::NONE, KeyCode::Left) => self.query.move_left(),
            (KeyModifiers::NONE, KeyCode::Right) => self.query.move_right(),
            (KeyModifiers::NONE, KeyCode::Home) => self.query.move_home(),
            (KeyModifiers::NONE, KeyCode::End) => self.query.move_end(),
            (KeyModifiers::NONE, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Enter) => {
                self.focus = Focus::List;
            }
            _ => {}
        }
    }

    fn handle_facet_key(&mut self, event: KeyEvent) {
        let len = match self.focus {
            Focus::SourceKinds => self.facets.source_kinds().len(),
            _ => self.facets.profile_types().len(),
        };
        let cursor = match self.focus {
            Focus::SourceKinds => &mut self.source_cursor,
            _ => &mut self.profile_cursor,
        };
        match (event.modifiers, event.code) {
            (KeyModifiers::NONE, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => {
                *cursor = cursor.saturating_sub(1);
            }
            (KeyModifiers::NONE, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l')) => {
                if *cursor + 1 < len {
                    *cursor += 1;
                }
            }
            (KeyModifiers::NONE, KeyCode::Enter) | (KeyModifiers::NONE, KeyCode::Char(' ')) => {
                self.toggle_focused_facet();
            }
            (KeyModifiers::NONE, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
                self.focus = self.focus.next();
            }
            (KeyModifiers::NONE, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
                self.focus = self.focus.prev();
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, event: KeyEvent) {
        match (event.modifiers, event.code) {
            (KeyModifiers::NONE, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
                if self.highlight > 0 {
                    self.highlight -= 1;
                    self.ensure_highlight_visible();
                } else {
                    self.focus = Focus::ProfileTypes;
                }
            }
            (KeyModifiers::NONE, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
                if self.highlight + 1 < self.visible.len() {
                    self.highlight += 1;
                    self.ensure_highlight_visible();
                }
            }
            (KeyModifiers::NONE, KeyCode::Home) => {
                self.highlight = 0;
                self.ensure_highlight_visible();
            }
            (KeyModifiers::NONE, KeyCode::End) => {
                self.highlight = self.visible.len().saturating_sub(1);
                self.ensure_highlight_visible();
            }
            (KeyModifiers::NONE, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => {
                self.collapse_current();
            }
            (KeyModifiers::NONE, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l')) => {
                self.expand_current();
            }
            (KeyModifiers::NONE, KeyCode::Enter) | (KeyModifiers::NONE, KeyCode::Char(' ')) => {
                self.activate_current();
            }
            _ => {}
        }
    }

    fn toggle_focused_facet(&mut self) {
        match self.focus {
            Focus::SourceKinds => {
                if let Some(kind) = self.facets.source_kind_at(self.source_cursor) {
                    let active = self.selection.toggle_source_kind(kind);
                    debug!(?active, "toggled source kind filter");
                    self.reevaluate();
                }
            }
            Focus::ProfileTypes => {
                if let Some(profile_type) = self.facets.profile_type_at(self.profile_cursor) {
                    let active = self.selection.toggle_profile_type(profile_type);
                    debug!(?active, "toggled profile type filter");
                    self.reevaluate();
                }
            }
            Focus::Search | Focus::List => {}
        }
    }

    fn collapse_current(&mut self) {
        let Some(row) = self.visible.get(self.highlight) else {
            return;
        };
        match (&row.variant, &row.parent) {
            (RowVariant::Group { open: true, .. }, _) => {
                let key = row.display_name.clone();
                self.open_groups.remove(&key);
                self.rebuild_visible();
            }
            (RowVariant::Leaf { .. }, Some(parent)) => {
                let key = parent.clone();
                self.open_groups.remove(&key);
                self.rebuild_visible();
                self.focus_on(&RowId::group(key));
            }
            _ => {}
        }
    }

    fn expand_current(&mut self) {
        if let Some(row) = self.visible.get(self.highlight)
            && let RowVariant::Group { open: false, .. } = row.variant
        {
            self.open_groups.insert(row.display_name.clone());
            self.rebuild_visible();
        }
    }

    fn activate_current(&mut self) {
        let Some(row) = self.visible.get(self.highlight) else {
            return;
        };
        match row.variant {
            RowVariant::Group { open, .. } => {
                let key = row.display_name.clone();
                if open {
                    self.open_groups.remove(&key);
                } else {
                    self.open_groups.insert(key);
                }
                self.rebuild_visible();
            }
            RowVariant::Leaf { .. } => {
                let name = row.display_name.clone();
                info!(app = %name, "application selected");
                self.current_app = Some(name.clone());
                self.outcome = Some(PickerOutcome::Selected(name));
            }
        }
    }

    fn query_changed(&mut self) {
        self.selection.set_query(self.query.as_str());
        self.reevaluate();
    }

    fn rebuild_inventory(&mut self) {
        let descriptors = self.apps.descriptors();
        self.hierarchy = Hierarchy::build(descriptors);
        self.facets = Facets::collect(descriptors);
        if self.expand_all {
            self.open_groups
                .extend(self.hierarchy.groups().map(|(key, _)| key.to_string()));
        }
        self.source_cursor = self
            .source_cursor
            .min(self.facets.source_kinds().len().saturating_sub(1));
        self.profile_cursor = self
            .profile_cursor
            .min(self.facets.profile_types().len().saturating_sub(1));
        self.reevaluate();
    }

    fn reevaluate(&mut self) {
        self.tree = evaluate_with(&self.hierarchy, &self.selection, self.options);
        self.rebuild_visible();
    }

    fn rebuild_visible(&mut self) {
        let previous = self.visible.get(self.highlight).map(VisibleRow::id);

        let mut visible = Vec::with_capacity(self.tree.len());
        for node in self.tree.nodes() {
            match node {
                DisplayNode::Leaf {
                    display_name,
                    descriptor,
                } => visible.push(VisibleRow {
                    display_name: display_name.clone(),
                    depth: 0,
                    parent: None,
                    variant: RowVariant::Leaf {
                        source_kind: descriptor.source_kind.clone(),
                    },
                }),
                DisplayNode::ExpandableGroup {
                    display_name,
                    children,
                } => {
                    let open = self.open_groups.contains(display_name);
                    visible.push(VisibleRow {
                        display_name: display_name.clone(),
                        depth: 0,
                        parent: None,
                        variant: RowVariant::Group {
                            open,
                            children: children.len(),
                        },
                    });
                    if open {
                        visible.extend(children.iter().filter_map(|child| {
                            child.descriptor().map(|descriptor| VisibleRow {
                                display_name: child.display_name().to_string(),
                                depth: 1,
                                parent: Some(display_name.clone()),
                                variant: RowVariant::Leaf {
                                    source_kind: descriptor.source_kind.clone(),
                                },
                            })
                        }));
                    }
                }
            }
        }
        self.visible = visible;

        match previous {
            Some(id) => self.focus_on(&id),
            None => self.clamp_highlight(),
        }
    }

    /// Highlight the row `id`. A leaf that moved in or out of its group
    /// (flattened or expanded again) is still found by name.
    fn focus_on(&mut self, id: &RowId) {
        let found = self.visible.iter().position(|row| row.is(id)).or_else(|| {
            (!id.group)
                .then(|| {
                    self.visible
                        .iter()
                        .position(|row| row.is_leaf() && row.display_name == id.display_name)
                })
                .flatten()
        });
        if let Some(idx) = found {
            self.highlight = idx;
        }
        self.clamp_highlight();
    }

    fn clamp_highlight(&mut self) {
        if self.highlight >= self.visible.len() {
            self.highlight = self.visible.len().saturating_sub(1);
        }
        self.ensure_highlight_visible();
    }

    pub(crate) fn ensure_highlight_visible(&self) {
        let viewport = self.viewport_rows.get();
        if self.visible.is_empty() || viewport == 0 {
            self.scroll_offset.set(0);
            return;
        }
        let max_offset = self.visible.len().saturating_sub(viewport);
        let mut offset = self.scroll_offset.get().min(max_offset);
        if self.highlight < offset {
            offset = self.highlight;
        } else if self.highlight >= offset + viewport {
            offset = self.highlight + 1 - viewport;
        }
        self.scroll_offset.set(offset.min(max_offset));
    }
}
