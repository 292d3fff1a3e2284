use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{MatchOptions, QueryCase};
use crate::error::{Result, SelectorError};
use crate::selection::FilterSelection;

/// Picker configuration, usually read from `appsel.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectorConfig {
    /// How the search query is compared against names
    #[serde(default)]
    pub query_case: QueryCase,

    /// Initial search query
    #[serde(default)]
    pub query: String,

    /// Initially active source kind
    #[serde(default)]
    pub source_kind: Option<String>,

    /// Initially active profile type
    #[serde(default)]
    pub profile_type: Option<String>,

    /// Open every expandable group when the picker starts
    #[serde(default)]
    pub expand_all: bool,
}

impl SelectorConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate().map_err(SelectorError::InvalidConfig)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.source_kind.as_deref() == Some("") {
            return Err("source_kind must not be empty".to_string());
        }
        if self.profile_type.as_deref() == Some("") {
            return Err("profile_type must not be empty".to_string());
        }
        Ok(())
    }

    pub fn initial_selection(&self) -> FilterSelection {
        FilterSelection {
            query: self.query.clone(),
            active_source_kind: self.source_kind.clone(),
            active_profile_type: self.profile_type.clone(),
        }
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            query_case: self.query_case,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn empty_file_gives_defaults() -> Result<()> {
        let config = SelectorConfig::from_toml_str("")?;
        assert_eq!(config, SelectorConfig::default());
        assert_eq!(config.match_options().query_case, QueryCase::Insensitive);
        assert!(config.initial_selection().is_unfiltered());
        Ok(())
    }

    #[test]
    fn parses_all_fields() -> Result<()> {
        let config = SelectorConfig::from_toml_str(
            r#"
query_case = "sensitive"
query = "app"
source_kind = "rbspy"
profile_type = "cpu"
expand_all = true
"#,
        )?;

        assert_eq!(config.match_options(), MatchOptions::case_sensitive());
        assert_eq!(
            config.initial_selection(),
            FilterSelection::new()
                .with_query("app")
                .with_source_kind("rbspy")
                .with_profile_type("cpu")
        );
        assert!(config.expand_all);
        Ok(())
    }

    #[test]
    fn rejects_empty_filter_values() {
        let result = SelectorConfig::from_toml_str("source_kind = \"\"");
        assert!(matches!(result, Err(SelectorError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = SelectorConfig::from_toml_str("case = \"sensitive\"");
        assert!(matches!(result, Err(SelectorError::Toml(_))));
    }

    #[test]
    fn loads_from_disk() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("appsel.toml");
        std::fs::write(&path, "profile_type = \"objects\"\n")?;

        let config = SelectorConfig::load(&path)?;
        assert_eq!(config.profile_type.as_deref(), Some("objects"));
        Ok(())
    }
}
