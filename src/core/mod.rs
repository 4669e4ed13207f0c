//! Core configuration management types.

mod builder;
mod manager;
mod merge;
mod selector;

pub use builder::{
    ConfigManagerBuilder, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_NAME, DEFAULT_DEBOUNCE,
};
pub use manager::{ConfigManager, OptionWatch};
pub use merge::{complete_shape, completed, shallow_equal};
pub use selector::{Accessor, Selection, Selector, select_path_filling, set_path};
