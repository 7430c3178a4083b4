pub mod display_preference;
pub mod settings_store;
pub mod user_prefs;
