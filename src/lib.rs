//! ngx-translate-language-server
//!
//! `'key' | translate` パイプ規約の HTML テンプレート向け i18n Language Server Protocol (LSP) 実装

pub mod config;
pub mod ide;
pub mod indexer;
pub mod input;
pub mod syntax;
pub mod types;

mod test_utils;

// Backend を再エクスポート
pub use ide::backend::Backend;
