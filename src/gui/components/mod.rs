pub mod profile_selector;
pub mod settings_editor;

pub use profile_selector::ProfileSelector;
pub use settings_editor::SettingsEditor;
