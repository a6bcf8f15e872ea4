//! Helpers shared by the sequencer engine and CLI.

pub mod labels;
pub mod path_processing;
pub mod settings;

pub use labels::shorten_unique;
pub use path_processing::expand_tilde;
pub use settings::{SequencerSettings, SettingsError, default_settings_path};
