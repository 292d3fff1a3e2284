//! Terminal application picker built on `appsel-engine`.
//!
//! [`AppPicker`] owns the inventory, the filter selection and the per-group
//! open/closed state. It renders through ratatui and is driven by crossterm
//! key events, either from [`run_app_picker`] or directly in tests.

mod key_hint;
mod line_editor;
mod picker;
mod render;
mod run;
mod terminal;

pub use picker::AppPicker;
pub use picker::Focus;
pub use picker::PickerOutcome;
pub use run::run_app_picker;
pub use terminal::PickerTerminal;
pub use terminal::init;
pub use terminal::restore;
