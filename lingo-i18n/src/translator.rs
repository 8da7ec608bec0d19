use crate::error::I18nError;
use crate::locale::{LocaleDict, LocaleTable};
use crate::params::Params;
use crate::settings::I18nSettings;
use crate::store::LanguageStore;
use crate::template;
use tracing::{debug, info, warn};

/// 按当前语言在 [`LocaleTable`] 中解析翻译键
///
/// 查找顺序：
/// 1. 当前语言的字典，当前语言不在表中时用默认语言的字典
/// 2. 回退语言的字典
/// 3. 键本身
///
/// 只有条目不存在才进入下一步，空模板也是有效翻译。公开操作都不会失败。
pub struct Translator {
    locales: LocaleTable,
    store: Box<dyn LanguageStore>,
    settings: I18nSettings,
    active: String,
}

impl Translator {
    /// 默认设置：默认 `tr`，回退 `en`，存储键 `ui_vision_lang`
    pub fn new(locales: LocaleTable, store: impl LanguageStore + 'static) -> Self {
        Self::with_settings(locales, Box::new(store), I18nSettings::default())
    }

    /// 启动时读取一次持久化的语言，读取失败或为空时使用默认语言
    ///
    /// 这里不校验存储的语言代码，未知代码会通过默认语言的字典解析。
    pub fn with_settings(
        locales: LocaleTable,
        store: Box<dyn LanguageStore>,
        settings: I18nSettings,
    ) -> Self {
        let active = match store.load(&settings.storage_key) {
            Ok(Some(lang)) if !lang.is_empty() => {
                debug!(lang = %lang, "restored persisted language");
                lang
            }
            Ok(_) => settings.default_language.clone(),
            Err(e) => {
                warn!(error = %e, "failed to read persisted language, using default");
                settings.default_language.clone()
            }
        };

        if !locales.contains(&active) {
            debug!(lang = %active, "active language has no locale dict");
        }

        Self {
            locales,
            store,
            settings,
            active,
        }
    }

    /// 加载语言文件并打开配置的存储
    pub fn from_settings(settings: &I18nSettings) -> Result<Self, I18nError> {
        let locales = match &settings.locales_dir {
            Some(dir) => LocaleTable::load_dir(dir)?,
            None => LocaleTable::new(),
        };
        let store = settings.storage.build()?;
        let translator = Self::with_settings(locales, store, settings.clone());
        info!(
            lang = %translator.active,
            languages = ?translator.available_languages(),
            "translator ready"
        );
        Ok(translator)
    }

    pub fn translate(&self, key: &str, params: Option<&Params>) -> String {
        let resolved = self.resolve(key).unwrap_or(key);
        match params {
            Some(params) if !params.is_empty() => template::fill(resolved, params),
            _ => resolved.to_string(),
        }
    }

    pub fn t(&self, key: &str) -> String {
        self.translate(key, None)
    }

    pub fn t_with(&self, key: &str, params: &Params) -> String {
        self.translate(key, Some(params))
    }

    /// 替换前的模板，所有字典都没有该键时返回 `None`
    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.active_dict()
            .and_then(|dict| dict.get(key))
            .or_else(|| {
                self.locales
                    .get(&self.settings.fallback_language)
                    .and_then(|dict| dict.get(key))
            })
    }

    fn active_dict(&self) -> Option<&LocaleDict> {
        self.locales
            .get(&self.active)
            .or_else(|| self.locales.get(&self.settings.default_language))
    }

    /// 表中存在 `lang` 时切换并持久化
    ///
    /// 未知代码被忽略。写入失败只记录日志，内存中的切换照常生效。
    pub fn set_language(&mut self, lang: &str) {
        if !self.locales.contains(lang) {
            debug!(lang = %lang, "ignoring unknown language");
            return;
        }

        self.active = lang.to_string();
        if let Err(e) = self.store.save(&self.settings.storage_key, lang) {
            warn!(lang = %lang, error = %e, "failed to persist language");
        }
    }

    pub fn language(&self) -> &str {
        &self.active
    }

    pub fn has_language(&self, lang: &str) -> bool {
        self.locales.contains(lang)
    }

    pub fn available_languages(&self) -> Vec<&str> {
        self.locales.languages()
    }

    pub fn locales(&self) -> &LocaleTable {
        &self.locales
    }

    pub fn settings(&self) -> &I18nSettings {
        &self.settings
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("active", &self.active)
            .field("languages", &self.locales.languages())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::params;
    use crate::store::{MemoryStore, NullStore};
    use std::sync::Arc;

    struct BrokenStore;

    impl LanguageStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("denied".to_string()))
        }

        fn save(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("denied".to_string()))
        }
    }

    fn locales() -> LocaleTable {
        LocaleTable::new()
            .with_language(
                "tr",
                LocaleDict::from_iter([
                    ("greeting", "Merhaba"),
                    ("blank", ""),
                    ("inbox", "Merhaba {name}, {count} mesajınız var"),
                    ("pair", "{x}-{x}"),
                    ("hi", "Selam {name}"),
                ]),
            )
            .with_language(
                "en",
                LocaleDict::from_iter([
                    ("greeting", "Hello"),
                    ("only_en", "Hello"),
                    ("blank", "not empty"),
                    ("inbox", "Hello {name}, you have {count} messages"),
                ]),
            )
    }

    #[test]
    fn test_starts_with_default_language() {
        let translator = Translator::new(locales(), MemoryStore::new());
        assert_eq!(translator.language(), "tr");
        assert_eq!(translator.t("greeting"), "Merhaba");
    }

    #[test]
    fn test_restores_persisted_language() {
        let translator = Translator::new(locales(), MemoryStore::with_value("ui_vision_lang", "en"));
        assert_eq!(translator.language(), "en");
        assert_eq!(translator.t("greeting"), "Hello");
    }

    #[test]
    fn test_empty_persisted_value_uses_default() {
        let translator = Translator::new(locales(), MemoryStore::with_value("ui_vision_lang", ""));
        assert_eq!(translator.language(), "tr");
    }

    #[test]
    fn test_broken_store_on_read_uses_default() {
        let translator = Translator::new(locales(), BrokenStore);
        assert_eq!(translator.language(), "tr");
    }

    #[test]
    fn test_unknown_persisted_language_resolves_through_default() {
        let translator = Translator::new(locales(), MemoryStore::with_value("ui_vision_lang", "fr"));
        assert_eq!(translator.language(), "fr");
        assert_eq!(translator.t("greeting"), "Merhaba");
        assert_eq!(translator.t("only_en"), "Hello");
        assert_eq!(translator.t("nope"), "nope");
    }

    #[test]
    fn test_falls_back_to_english_then_key() {
        let translator = Translator::new(locales(), NullStore);
        assert_eq!(translator.t("only_en"), "Hello");
        assert_eq!(translator.t("nonexistent.key"), "nonexistent.key");
        assert_eq!(translator.resolve("nonexistent.key"), None);
    }

    #[test]
    fn test_fallback_language_is_fixed() {
        let locales = locales().with_language("de", LocaleDict::from_iter([("x", "y")]));
        let mut translator = Translator::new(locales, NullStore);
        translator.set_language("de");
        // tr 是默认语言而不是回退语言
        assert_eq!(translator.t("greeting"), "Hello");
        assert_eq!(translator.t("pair"), "pair");
    }

    #[test]
    fn test_empty_translation_is_kept() {
        let translator = Translator::new(locales(), NullStore);
        assert_eq!(translator.t("blank"), "");
    }

    #[test]
    fn test_empty_fallback_translation_is_kept() {
        let locales = LocaleTable::new()
            .with_language("tr", LocaleDict::from_iter([("a", "x")]))
            .with_language("en", LocaleDict::from_iter([("k", "")]));
        let translator = Translator::new(locales, NullStore);
        assert_eq!(translator.resolve("k"), Some(""));
        assert_eq!(translator.t("k"), "");
        assert_eq!(translator.t_with("k", &params! { "name" => "Ada" }), "");
    }

    #[test]
    fn test_substitution() {
        let translator = Translator::new(locales(), NullStore);
        assert_eq!(
            translator.t_with("inbox", &params! { "name" => "Ada", "count" => 3 }),
            "Merhaba Ada, 3 mesajınız var"
        );
        assert_eq!(translator.t_with("pair", &params! { "x" => "Q" }), "Q-Q");
        assert_eq!(translator.t("hi"), "Selam {name}");
        assert_eq!(translator.translate("hi", Some(&Params::new())), "Selam {name}");
        assert_eq!(translator.t_with("hi", &params! { "unused" => 1 }), "Selam {name}");
    }

    #[test]
    fn test_substitution_applies_to_key_fallback() {
        let translator = Translator::new(locales(), NullStore);
        assert_eq!(
            translator.t_with("missing {name}", &params! { "name" => "Ada" }),
            "missing Ada"
        );
    }

    #[test]
    fn test_set_language_persists() {
        let store = Arc::new(MemoryStore::new());
        let mut translator = Translator::new(locales(), store.clone());

        translator.set_language("en");

        assert_eq!(translator.language(), "en");
        assert_eq!(
            translator.t_with("inbox", &params! { "name" => "Ada", "count" => 3 }),
            "Hello Ada, you have 3 messages"
        );
        assert_eq!(store.load("ui_vision_lang").unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn test_set_unknown_language_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let mut translator = Translator::new(locales(), store.clone());

        translator.set_language("fr");
        translator.set_language("");

        assert_eq!(translator.language(), "tr");
        assert_eq!(store.load("ui_vision_lang").unwrap(), None);
    }

    #[test]
    fn test_set_language_survives_write_failure() {
        let mut translator = Translator::new(locales(), BrokenStore);
        translator.set_language("en");
        assert_eq!(translator.language(), "en");
        assert_eq!(translator.t("greeting"), "Hello");
    }

    #[test]
    fn test_custom_settings() {
        let settings = I18nSettings {
            default_language: "en".to_string(),
            fallback_language: "tr".to_string(),
            storage_key: "lang".to_string(),
            ..I18nSettings::default()
        };
        let store = Arc::new(MemoryStore::with_value("ui_vision_lang", "tr"));
        let mut translator = Translator::with_settings(locales(), Box::new(store.clone()), settings);

        assert_eq!(translator.language(), "en");
        assert_eq!(translator.t("pair"), "{x}-{x}");

        translator.set_language("tr");
        assert_eq!(store.load("lang").unwrap().as_deref(), Some("tr"));
    }

    #[test]
    fn test_accessors() {
        let translator = Translator::new(locales(), NullStore);
        assert_eq!(translator.available_languages(), vec!["en", "tr"]);
        assert!(translator.has_language("en"));
        assert!(!translator.has_language("fr"));
        assert_eq!(translator.settings().storage_key, "ui_vision_lang");
        assert!(format!("{translator:?}").contains("active: \"tr\""));
    }
}
