use std::path::PathBuf;
use thiserror::Error;

/// 读取语言文件失败
#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("locale directory not found: {0}")]
    MissingDirectory(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// [`LanguageStore`](crate::LanguageStore) 读写失败
///
/// translator 不会把这些错误返回给调用方，只记录到日志。
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is corrupt: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("storage serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 由设置构建 translator 时的错误
#[derive(Debug, Error)]
pub enum I18nError {
    #[error(transparent)]
    Locale(#[from] LocaleError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] lingo_core::ConfigError),
}
