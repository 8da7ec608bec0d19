//! YAML 配置加载器，支持环境变量替换

use crate::error::ConfigError;
use dotenvy::dotenv;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// 替换 YAML 中的 `${VAR}` / `${VAR:default}` 占位符
fn replace_vars(yaml_content: &str) -> Result<String, ConfigError> {
    // 生产环境可能没有 .env 文件
    let _ = dotenv();

    static VAR_REGEX: OnceLock<Regex> = OnceLock::new();
    static LEFTOVER_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = VAR_REGEX.get_or_init(|| {
        Regex::new(r"\$\{([A-Z0-9_]+)(?::([^\}]*))?\}").expect("Invalid regex pattern")
    });
    let leftover = LEFTOVER_REGEX
        .get_or_init(|| Regex::new(r"\$\{[^\}]*\}").expect("Invalid regex pattern"));

    // 变量名只允许大写字母、数字和下划线
    if let Some(bad) = leftover.find_iter(yaml_content).find(|m| !re.is_match(m.as_str())) {
        return Err(ConfigError::InvalidVariable(bad.as_str().to_string()));
    }

    let result = re.replace_all(yaml_content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str());

        match env::var(var_name) {
            Ok(val) => val,
            Err(_) => default.unwrap_or("").to_string(),
        }
    });

    Ok(result.into_owned())
}

/// 从文件加载 YAML 配置
pub fn load_from_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    load_from_str(&content)
}

/// 从字符串加载 YAML 配置
pub fn load_from_str<T: DeserializeOwned>(yaml_content: &str) -> Result<T, ConfigError> {
    let replaced = replace_vars(yaml_content)?;
    let data = serde_yaml::from_str(&replaced)?;
    Ok(data)
}

/// 取出顶层配置段并反序列化
fn section_of<T: DeserializeOwned>(root: serde_yaml::Value, section: &str) -> Result<T, ConfigError> {
    let value = root
        .get(section)
        .cloned()
        .ok_or_else(|| ConfigError::MissingSection(section.to_string()))?;
    Ok(serde_yaml::from_value(value)?)
}

/// 从字符串中加载顶层某个配置段，例如 `i18n:`
pub fn load_section_from_str<T: DeserializeOwned>(
    yaml_content: &str,
    section: &str,
) -> Result<T, ConfigError> {
    section_of(load_from_str(yaml_content)?, section)
}

/// 从文件中加载顶层某个配置段
pub fn load_section_from_file<T: DeserializeOwned, P: AsRef<Path>>(
    path: P,
    section: &str,
) -> Result<T, ConfigError> {
    section_of(load_from_file(path)?, section)
}
