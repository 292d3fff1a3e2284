use std::path::PathBuf;

use log::{info, warn};

use crate::descriptor::{self, ApplicationDescriptor};
use crate::error::{Result, SelectorError};

/// Somewhere the application inventory can be fetched from.
pub trait AppSource {
    fn fetch(&self) -> Result<Vec<ApplicationDescriptor>>;

    /// Short human-readable origin, used in logs and status lines.
    fn describe(&self) -> String;
}

/// Reads a JSON application list from disk on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AppSource for JsonFileSource {
    fn fetch(&self) -> Result<Vec<ApplicationDescriptor>> {
        let raw = std::fs::read_to_string(&self.path)?;
        descriptor::parse_descriptors(&raw)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A fixed inventory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    descriptors: Vec<ApplicationDescriptor>,
}

impl StaticSource {
    pub fn new(descriptors: Vec<ApplicationDescriptor>) -> Self {
        Self { descriptors }
    }
}

impl AppSource for StaticSource {
    fn fetch(&self) -> Result<Vec<ApplicationDescriptor>> {
        descriptor::validate_names(&self.descriptors)?;
        Ok(self.descriptors.clone())
    }

    fn describe(&self) -> String {
        format!("{} static applications", self.descriptors.len())
    }
}

/// Load state of the application inventory.
///
/// Anything other than `Loaded` exposes no descriptors, so a picker built on
/// top of it renders empty while loading or after a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AppsState {
    #[default]
    Pristine,
    Loading,
    Loaded(Vec<ApplicationDescriptor>),
    Failed(String),
}

impl AppsState {
    pub fn descriptors(&self) -> &[ApplicationDescriptor] {
        match self {
            AppsState::Loaded(descriptors) => descriptors,
            AppsState::Pristine | AppsState::Loading | AppsState::Failed(_) => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AppsState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AppsState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Mark the inventory as being fetched.
    pub fn begin_refresh(&mut self) {
        *self = AppsState::Loading;
    }

    /// Record the outcome of a fetch started with [`AppsState::begin_refresh`].
    pub fn finish_refresh(&mut self, result: Result<Vec<ApplicationDescriptor>>) {
        *self = match result {
            Ok(descriptors) => {
                info!("loaded {} applications", descriptors.len());
                AppsState::Loaded(descriptors)
            }
            Err(err) => {
                warn!("failed to load applications: {err}");
                AppsState::Failed(err.to_string())
            }
        };
    }

    /// Fetch from `source` and store the outcome.
    pub fn refresh(&mut self, source: &dyn AppSource) {
        self.begin_refresh();
        let result = source
            .fetch()
            .map_err(|err| SelectorError::Fetch(format!("{}: {err}", source.describe())));
        self.finish_refresh(result);
    }
}
