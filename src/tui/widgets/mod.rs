pub mod adhan;
pub mod detail;
pub mod header;
pub mod next_prayer;
pub mod prayers;
pub mod settings_panel;
pub mod statusbar;
