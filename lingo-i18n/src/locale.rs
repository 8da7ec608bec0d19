//! 语言表，以及从 TOML / YAML 文件加载语言表
//!
//! 语言文件是字符串表，可以嵌套，嵌套表会展开为点号键。例如
//!
//! ```toml
//! [menu]
//! open = "Aç"
//! ```
//!
//! 得到键 `menu.open`。

use crate::error::LocaleError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

/// 单个语言的 键 -> 模板 映射
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleDict {
    entries: HashMap<String, String>,
}

impl LocaleDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.entries.insert(key.into(), template.into());
    }

    /// 只有键不存在时返回 `None`，空模板仍是 `Some("")`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 解析 TOML 文档，嵌套表展开为点号键
    pub fn from_toml_str(content: &str) -> Result<Self, LocaleError> {
        let table: toml::Table = toml::from_str(content)?;
        let mut dict = Self::new();
        flatten_toml(&mut dict, "", &table);
        Ok(dict)
    }

    /// 解析 YAML 文档，嵌套映射展开为点号键
    pub fn from_yaml_str(content: &str) -> Result<Self, LocaleError> {
        let mut dict = Self::new();
        if content.trim().is_empty() {
            return Ok(dict);
        }
        let mapping: serde_yaml::Mapping = serde_yaml::from_str(content)?;
        flatten_yaml(&mut dict, "", &mapping);
        Ok(dict)
    }
}

impl<K, V> FromIterator<(K, V)> for LocaleDict
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K, V> Extend<(K, V)> for LocaleDict
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn flatten_toml(dict: &mut LocaleDict, prefix: &str, table: &toml::Table) {
    for (key, value) in table {
        let full_key = join_key(prefix, key);
        match value {
            toml::Value::String(s) => dict.insert(full_key, s.as_str()),
            toml::Value::Table(inner) => flatten_toml(dict, &full_key, inner),
            toml::Value::Integer(i) => dict.insert(full_key, i.to_string()),
            toml::Value::Float(f) => dict.insert(full_key, f.to_string()),
            toml::Value::Boolean(b) => dict.insert(full_key, b.to_string()),
            toml::Value::Datetime(d) => dict.insert(full_key, d.to_string()),
            toml::Value::Array(_) => warn!(key = %full_key, "skipping array value in locale file"),
        }
    }
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn flatten_yaml(dict: &mut LocaleDict, prefix: &str, mapping: &serde_yaml::Mapping) {
    for (key, value) in mapping {
        let Some(key) = yaml_scalar(key) else {
            warn!(prefix = %prefix, "skipping non-scalar key in locale file");
            continue;
        };
        let full_key = join_key(prefix, &key);
        match value {
            serde_yaml::Value::Mapping(inner) => flatten_yaml(dict, &full_key, inner),
            other => match yaml_scalar(other) {
                Some(s) => dict.insert(full_key, s),
                None => warn!(key = %full_key, "skipping non-string value in locale file"),
            },
        }
    }
}

/// 语言代码 -> [`LocaleDict`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleTable {
    languages: HashMap<String, LocaleDict>,
}

impl LocaleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 构建器风格的插入，覆盖 `lang` 已有的字典
    pub fn with_language(mut self, lang: impl Into<String>, dict: LocaleDict) -> Self {
        self.insert(lang, dict);
        self
    }

    pub fn insert(&mut self, lang: impl Into<String>, dict: LocaleDict) {
        self.languages.insert(lang.into(), dict);
    }

    pub fn get(&self, lang: &str) -> Option<&LocaleDict> {
        self.languages.get(lang)
    }

    pub fn contains(&self, lang: &str) -> bool {
        self.languages.contains_key(lang)
    }

    /// 排序后的语言代码
    pub fn languages(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// 加载 `dir` 下所有 `*.toml`、`*.yaml`、`*.yml` 文件，文件名即语言代码
    ///
    /// 无法读取或解析的文件记录日志后跳过。同名文件会合并，键冲突时按文件名排序靠后的生效。
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, LocaleError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            error!("i18n directory not found: {}", dir.display());
            return Err(LocaleError::MissingDirectory(dir.to_path_buf()));
        }

        let mut paths: Vec<_> = fs::read_dir(dir)
            .inspect_err(|e| error!("Failed to read i18n directory {}: {}", dir.display(), e))?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut table = Self::new();
        for (lang, dict) in paths.iter().filter_map(|path| load_locale_file(path)) {
            match table.languages.get_mut(&lang) {
                Some(existing) => {
                    warn!("Merging duplicate locale files for lang: {}", lang);
                    existing.extend(dict.entries);
                }
                None => table.insert(lang, dict),
            }
        }
        Ok(table)
    }
}

fn load_locale_file(path: &Path) -> Option<(String, LocaleDict)> {
    let ext = path.extension()?.to_str()?;
    if !matches!(ext, "toml" | "yaml" | "yml") {
        return None;
    }

    let lang = path.file_stem()?.to_str()?.to_string();

    let content = fs::read_to_string(path)
        .inspect_err(|e| error!("Failed to read i18n file {}: {}", path.display(), e))
        .ok()?;

    let parsed = if ext == "toml" {
        LocaleDict::from_toml_str(&content)
    } else {
        LocaleDict::from_yaml_str(&content)
    };
    let dict = parsed
        .inspect_err(|e| error!("Failed to parse i18n file {}: {}", path.display(), e))
        .ok()?;

    info!("Loaded i18n for lang: {} ({} keys)", lang, dict.len());
    Some((lang, dict))
}
