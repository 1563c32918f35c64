//! 設定モジュール
mod loader;
mod manager;
mod types;

pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    TranslateSettings,
    ValidationError,
};
