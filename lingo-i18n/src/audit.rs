//! 以参考语言为基准检查各语言的覆盖情况

use crate::locale::LocaleTable;
use crate::template::placeholders;
use std::collections::BTreeMap;

/// 某个语言与参考语言的差异
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageAudit {
    /// 参考语言有而本语言没有，这些键会走回退链
    pub missing: Vec<String>,
    /// 本语言有而参考语言没有
    pub extra: Vec<String>,
    /// `{name}` 占位符集合与参考模板不同的键
    pub placeholder_mismatches: Vec<String>,
}

impl LanguageAudit {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty() && self.placeholder_mismatches.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub reference: String,
    /// 参考语言本身不在表中时为 `false`
    pub reference_found: bool,
    pub languages: BTreeMap<String, LanguageAudit>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.reference_found && self.languages.values().all(LanguageAudit::is_clean)
    }

    pub fn language(&self, lang: &str) -> Option<&LanguageAudit> {
        self.languages.get(lang)
    }
}

impl LocaleTable {
    /// 将每个语言与 `reference`（通常是回退语言）比较
    pub fn audit(&self, reference: &str) -> AuditReport {
        let mut report = AuditReport {
            reference: reference.to_string(),
            ..AuditReport::default()
        };
        let Some(base) = self.get(reference) else {
            return report;
        };
        report.reference_found = true;

        for lang in self.languages().into_iter().filter(|l| *l != reference) {
            let Some(dict) = self.get(lang) else {
                continue;
            };

            let mut missing: Vec<String> = base
                .keys()
                .filter(|key| !dict.contains_key(key))
                .map(str::to_string)
                .collect();
            let mut extra = Vec::new();
            let mut placeholder_mismatches = Vec::new();
            for (key, template) in dict.iter() {
                match base.get(key) {
                    None => extra.push(key.to_string()),
                    Some(base_template) if placeholders(template) != placeholders(base_template) => {
                        placeholder_mismatches.push(key.to_string())
                    }
                    Some(_) => {}
                }
            }
            missing.sort();
            extra.sort();
            placeholder_mismatches.sort();

            report.languages.insert(
                lang.to_string(),
                LanguageAudit {
                    missing,
                    extra,
                    placeholder_mismatches,
                },
            );
        }
        report
    }
}
