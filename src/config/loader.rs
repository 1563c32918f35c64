//! 設定ファイルの読み込み関数

use std::path::Path;

use super::{
    ConfigError,
    TranslateSettings,
};

/// ワークスペースから設定を読み込む
///
/// `.ngx-translate.json` ファイルを探して読み込む
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<TranslateSettings>, ConfigError> {
    let config_path = workspace_root.join(".ngx-translate.json");

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: TranslateSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}
