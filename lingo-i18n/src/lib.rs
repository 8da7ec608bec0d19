//! 运行时字符串本地化
//!
//! [`Translator`] 持有 [`LocaleTable`]、当前语言，以及跨会话记住用户选择的 [`LanguageStore`]。
//!
//! ```
//! use lingo_i18n::{LocaleDict, LocaleTable, MemoryStore, Translator, params};
//!
//! let locales = LocaleTable::new()
//!     .with_language("tr", LocaleDict::from_iter([("hello", "Merhaba {name}")]))
//!     .with_language("en", LocaleDict::from_iter([("hello", "Hello {name}"), ("bye", "Bye")]));
//!
//! let mut translator = Translator::new(locales, MemoryStore::new());
//! assert_eq!(translator.t_with("hello", &params! { "name" => "Ada" }), "Merhaba Ada");
//! assert_eq!(translator.t("bye"), "Bye");
//!
//! translator.set_language("en");
//! assert_eq!(translator.language(), "en");
//! ```

mod audit;
pub mod error;
pub mod global;
mod locale;
mod params;
mod settings;
mod store;
pub mod template;
mod translator;

pub use audit::{AuditReport, LanguageAudit};
pub use error::{I18nError, LocaleError, StoreError};
pub use locale::{LocaleDict, LocaleTable};
pub use params::Params;
pub use settings::{DEFAULT_LANGUAGE, FALLBACK_LANGUAGE, I18nSettings, STORAGE_KEY, StorageSettings};
pub use store::{FileStore, LanguageStore, MemoryStore, NullStore};
pub use translator::Translator;
