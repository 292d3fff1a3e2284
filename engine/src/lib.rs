//! # appsel engine
//!
//! Grouping and filtering for the application picker.
//!
//! Application names are dot-segmented (`triple.app.cpu`). The last segment
//! is the profile type, everything before it is the group key. The engine
//! groups a flat inventory by key, filters it by the current selection and
//! collapses every group into the rows the picker shows.
//!
//! ## Pipeline
//!
//! ```text
//! [ApplicationDescriptor]
//!     │
//!     ├──> name::parse            group key + profile type
//!     │
//!     ├──> Hierarchy::build       key -> members, first-seen order
//!     │
//!     └──> evaluate(selection)    query / source kind / profile type
//!          ├─> 0 matches   -> dropped
//!          ├─> 1 match     -> Leaf (full name)
//!          └─> 2+ matches  -> ExpandableGroup (key)
//! ```
//!
//! Everything is recomputed from scratch on each change; nothing here holds
//! state between evaluations.
//!
//! ## Example
//!
//! ```
//! use appsel_engine::{evaluate, ApplicationDescriptor, FilterSelection, Hierarchy};
//!
//! let apps = vec![
//!     ApplicationDescriptor::new("double.cpu", "rbspy", "samples"),
//!     ApplicationDescriptor::new("double.space", "gospy", "bytes"),
//! ];
//! let hierarchy = Hierarchy::build(&apps);
//!
//! let all = evaluate(&hierarchy, &FilterSelection::new());
//! assert_eq!(all.top_level_names(), vec!["double"]);
//!
//! let ruby = evaluate(&hierarchy, &FilterSelection::new().with_source_kind("rbspy"));
//! assert_eq!(ruby.top_level_names(), vec!["double.cpu"]);
//! ```

mod config;
mod descriptor;
mod engine;
mod error;
mod facets;
mod hierarchy;
pub mod name;
mod selection;
mod source;

pub use config::SelectorConfig;
pub use descriptor::{ApplicationDescriptor, parse_descriptors};
pub use engine::{
    DisplayNode, DisplayTree, MatchOptions, Matcher, QueryCase, evaluate, evaluate_with,
};
pub use error::{Result, SelectorError};
pub use facets::Facets;
pub use hierarchy::{Group, Hierarchy};
pub use name::ParsedName;
pub use selection::FilterSelection;
pub use source::{AppSource, AppsState, JsonFileSource, StaticSource};
