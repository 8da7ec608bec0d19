use crate::error::{I18nError, StoreError};
use crate::store::{FileStore, LanguageStore, MemoryStore, NullStore};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_LANGUAGE: &str = "tr";
pub const FALLBACK_LANGUAGE: &str = "en";
pub const STORAGE_KEY: &str = "ui_vision_lang";

/// 所选语言的持久化位置
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageSettings {
    #[default]
    Memory,
    File {
        path: PathBuf,
    },
    None,
}

impl StorageSettings {
    pub fn build(&self) -> Result<Box<dyn LanguageStore>, StoreError> {
        Ok(match self {
            StorageSettings::Memory => Box::new(MemoryStore::new()),
            StorageSettings::File { path } => Box::new(FileStore::open(path)?),
            StorageSettings::None => Box::new(NullStore),
        })
    }
}

/// Translator 设置，通常来自应用配置的 `i18n:` 段
///
/// ```yaml
/// i18n:
///   default_language: tr
///   fallback_language: en
///   locales_dir: ./locales
///   storage:
///     kind: file
///     path: ${LINGO_STATE_FILE:./state/prefs.toml}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct I18nSettings {
    /// 当前语言没有字典时使用
    pub default_language: String,
    /// 当前字典缺少某个键时查找，与当前语言无关
    pub fallback_language: String,
    pub storage_key: String,
    pub locales_dir: Option<PathBuf>,
    pub storage: StorageSettings,
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            fallback_language: FALLBACK_LANGUAGE.to_string(),
            storage_key: STORAGE_KEY.to_string(),
            locales_dir: None,
            storage: StorageSettings::default(),
        }
    }
}

impl I18nSettings {
    pub const SECTION: &'static str = "i18n";

    /// 读取 YAML 配置文件的 `i18n:` 段，支持 `${VAR:default}` 替换
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, I18nError> {
        Ok(lingo_core::yaml::load_section_from_file(path, Self::SECTION)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, I18nError> {
        Ok(lingo_core::yaml::load_section_from_str(content, Self::SECTION)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::ConfigError;

    #[test]
    fn test_defaults() {
        let settings = I18nSettings::default();
        assert_eq!(settings.default_language, "tr");
        assert_eq!(settings.fallback_language, "en");
        assert_eq!(settings.storage_key, "ui_vision_lang");
        assert_eq!(settings.storage, StorageSettings::Memory);
        assert_eq!(settings.locales_dir, None);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let settings = I18nSettings::from_yaml_str("i18n:\n  fallback_language: de\n").unwrap();
        assert_eq!(settings.default_language, "tr");
        assert_eq!(settings.fallback_language, "de");
    }

    #[test]
    fn test_storage_variants_with_env() {
        unsafe {
            std::env::set_var("LINGO_SETTINGS_TEST_STATE", "/var/lib/lingo/prefs.toml");
        }
        let yaml = r#"
i18n:
  locales_dir: ./locales
  storage:
    kind: file
    path: ${LINGO_SETTINGS_TEST_STATE}
"#;
        let settings = I18nSettings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.locales_dir, Some(PathBuf::from("./locales")));
        assert_eq!(
            settings.storage,
            StorageSettings::File {
                path: PathBuf::from("/var/lib/lingo/prefs.toml")
            }
        );

        let settings = I18nSettings::from_yaml_str("i18n:\n  storage:\n    kind: none\n").unwrap();
        assert_eq!(settings.storage, StorageSettings::None);
    }

    #[test]
    fn test_missing_section() {
        let err = I18nSettings::from_yaml_str("logger:\n  level: info\n").unwrap_err();
        assert!(matches!(
            err,
            I18nError::Config(ConfigError::MissingSection(s)) if s == "i18n"
        ));
    }

    #[test]
    fn test_null_storage_builds() {
        let store = StorageSettings::None.build().unwrap();
        store.save("ui_vision_lang", "en").unwrap();
        assert_eq!(store.load("ui_vision_lang").unwrap(), None);
    }
}
