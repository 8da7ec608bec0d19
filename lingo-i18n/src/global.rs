//! 进程级全局 translator，供无法传递 `&Translator` 的 UI 代码使用
//!
//! 这是可选的，自己持有 [`Translator`] 的宿主可以直接调用它。
//! [`install`] 之前，[`t`] 返回键本身，[`language`] 返回默认语言代码。

use crate::params::Params;
use crate::settings::DEFAULT_LANGUAGE;
use crate::translator::Translator;
use std::sync::{OnceLock, PoisonError, RwLock};
use tracing::error;

static TRANSLATOR: OnceLock<RwLock<Translator>> = OnceLock::new();

/// 已经安装过时返回 `false` 并丢弃 `translator`
pub fn install(translator: Translator) -> bool {
    if TRANSLATOR.set(RwLock::new(translator)).is_err() {
        error!("global translator already installed");
        return false;
    }
    true
}

pub fn is_installed() -> bool {
    TRANSLATOR.get().is_some()
}

fn with_translator<R>(f: impl FnOnce(&Translator) -> R) -> Option<R> {
    let lock = TRANSLATOR.get()?;
    let guard = lock.read().unwrap_or_else(PoisonError::into_inner);
    Some(f(&guard))
}

pub fn t(key: &str) -> String {
    with_translator(|tr| tr.t(key)).unwrap_or_else(|| key.to_string())
}

/// 未安装 translator 时仍会用 `params` 填充键本身
pub fn t_with(key: &str, params: &Params) -> String {
    with_translator(|tr| tr.t_with(key, params))
        .unwrap_or_else(|| crate::template::fill(key, params))
}

pub fn set_language(lang: &str) {
    if let Some(lock) = TRANSLATOR.get() {
        lock.write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_language(lang);
    }
}

pub fn language() -> String {
    with_translator(|tr| tr.language().to_string())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}
