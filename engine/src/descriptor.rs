use serde::{Deserialize, Serialize};

use crate::error::{Result, SelectorError};
use crate::name::{self, ParsedName};

/// A monitored application as reported by the application list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationDescriptor {
    /// Dot-segmented application name, e.g. `triple.app.cpu`
    pub name: String,

    /// Data-collection technique (`rbspy`, `javaspy`, ...)
    #[serde(rename = "spyName")]
    pub source_kind: String,

    /// Units of the collected samples
    #[serde(default = "default_units")]
    pub units: String,
}

fn default_units() -> String {
    "unknown".to_string()
}

impl ApplicationDescriptor {
    pub fn new(
        name: impl Into<String>,
        source_kind: impl Into<String>,
        units: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source_kind: source_kind.into(),
            units: units.into(),
        }
    }

    /// Group key and profile type of this descriptor's name.
    pub fn parsed_name(&self) -> ParsedName<'_> {
        name::parse(&self.name)
    }

    pub fn profile_type(&self) -> Option<&str> {
        self.parsed_name().profile_type
    }
}

/// Parse the JSON application list (`[{"name", "spyName", "units"}, ...]`).
///
/// Entries with an empty name are rejected; every other entry is kept in
/// the order it appears.
pub fn parse_descriptors(json: &str) -> Result<Vec<ApplicationDescriptor>> {
    let descriptors: Vec<ApplicationDescriptor> = serde_json::from_str(json)?;
    validate_names(&descriptors)?;
    Ok(descriptors)
}

pub(crate) fn validate_names(descriptors: &[ApplicationDescriptor]) -> Result<()> {
    match descriptors.iter().position(|d| d.name.is_empty()) {
        Some(index) => Err(SelectorError::EmptyName { index }),
        None => Ok(()),
    }
}
