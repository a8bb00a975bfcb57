//! Configuration and persisted preferences

mod preferences;

pub use preferences::{
    default_config_dir, load_preferences, save_preferences, UserPreferences,
};
