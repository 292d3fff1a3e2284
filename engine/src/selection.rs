use serde::{Deserialize, Serialize};

/// The user's current filter choices.
///
/// Source kind and profile type each hold at most one active value.
/// Toggling the active value clears it; toggling any other value replaces
/// it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub active_source_kind: Option<String>,

    #[serde(default)]
    pub active_profile_type: Option<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_source_kind(mut self, kind: impl Into<String>) -> Self {
        self.active_source_kind = Some(kind.into());
        self
    }

    pub fn with_profile_type(mut self, profile_type: impl Into<String>) -> Self {
        self.active_profile_type = Some(profile_type.into());
        self
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Toggle `kind` and return the source kind that is active afterwards.
    pub fn toggle_source_kind(&mut self, kind: &str) -> Option<&str> {
        toggle(&mut self.active_source_kind, kind);
        self.active_source_kind.as_deref()
    }

    /// Toggle `profile_type` and return the profile type that is active
    /// afterwards.
    pub fn toggle_profile_type(&mut self, profile_type: &str) -> Option<&str> {
        toggle(&mut self.active_profile_type, profile_type);
        self.active_profile_type.as_deref()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_unfiltered(&self) -> bool {
        self.query.is_empty()
            && self.active_source_kind.is_none()
            && self.active_profile_type.is_none()
    }
}

fn toggle(slot: &mut Option<String>, value: &str) {
    if slot.as_deref() == Some(value) {
        *slot = None;
    } else {
        *slot = Some(value.to_string());
    }
}
