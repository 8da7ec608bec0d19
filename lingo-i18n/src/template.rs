//! `{name}` 占位符处理

use crate::params::Params;
use std::collections::BTreeSet;

/// 将 `params` 代入 `template`
///
/// 按插入顺序，每个参数替换所有字面量 `{name}`，没有对应参数的占位符保持原样。
pub fn fill(template: &str, params: &Params) -> String {
    params
        .iter()
        .fold(template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{name}}}"), value)
        })
}

/// `template` 中去重并排序的占位符名
///
/// 未闭合的 `{` 结束扫描，`{}` 不算占位符。
pub fn placeholders(template: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        rest = &rest[start + 1..];
        let Some(end) = rest.find('}') else {
            break;
        };
        let name = &rest[..end];
        // "{a {b}" -> b
        let name = name.rsplit('{').next().unwrap_or(name);
        if !name.is_empty() {
            names.insert(name.to_string());
        }
        rest = &rest[end + 1..];
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn test_fill_multiple_params() {
        let out = fill(
            "Hello {name}, you have {count} messages",
            &params! { "name" => "Ada", "count" => 3 },
        );
        assert_eq!(out, "Hello Ada, you have 3 messages");
    }

    #[test]
    fn test_fill_replaces_every_occurrence() {
        assert_eq!(fill("{x}-{x}", &params! { "x" => "Q" }), "Q-Q");
    }

    #[test]
    fn test_fill_leaves_unknown_placeholders() {
        assert_eq!(fill("Hi {name}", &Params::new()), "Hi {name}");
        assert_eq!(fill("Hi {name}", &params! { "other" => 1 }), "Hi {name}");
    }

    #[test]
    fn test_fill_names_are_literal() {
        assert_eq!(fill("{a.b} {a+}", &params! { "a.b" => 1, "a+" => 2 }), "1 2");
        assert_eq!(fill("{ab}", &params! { "a." => "x" }), "{ab}");
    }

    #[test]
    fn test_fill_applies_in_order() {
        // 第一次替换引入的占位符由第二个参数填充
        let out = fill("{a}", &params! { "a" => "{b}", "b" => "done" });
        assert_eq!(out, "done");
        let out = fill("{a}", &params! { "b" => "done", "a" => "{b}" });
        assert_eq!(out, "{b}");
    }

    #[test]
    fn test_placeholders() {
        let names = placeholders("Hello {name}, {count} new, {name} again {} {unclosed");
        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["count".to_string(), "name".to_string()]
        );
        assert!(placeholders("plain").is_empty());
        assert_eq!(placeholders("{a {b}").into_iter().collect::<Vec<_>>(), vec!["b"]);
    }
}
