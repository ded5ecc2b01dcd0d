pub mod prefs;
pub mod settings;
pub mod store;

pub use prefs::{AsrSchool, Settings};
pub use settings::AppConfig;
pub use store::SettingsStore;
