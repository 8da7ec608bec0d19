use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use std::collections::BTreeMap;
use std::path::Path;
use syn::{LitStr, parse_macro_input};

/// 编译期嵌入目录下的 `*.toml` 语言文件，展开为 `lingo_i18n::LocaleTable`
///
/// 路径相对调用方 crate 的 `CARGO_MANIFEST_DIR`，文件名即语言代码，嵌套表展开为点号键。
///
/// ```ignore
/// let locales = lingo_i18n_macro::locale_assets!("locales");
/// let translator = lingo_i18n::Translator::new(locales, lingo_i18n::MemoryStore::new());
/// ```
#[proc_macro]
pub fn locale_assets(input: TokenStream) -> TokenStream {
    let dir = parse_macro_input!(input as LitStr);
    expand(&dir.value())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(dir: &str) -> syn::Result<TokenStream2> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map_err(|e| error(format!("CARGO_MANIFEST_DIR not set: {e}")))?;

    let dir_path = Path::new(&manifest_dir).join(dir);
    if !dir_path.is_dir() {
        return Err(error(format!(
            "i18n directory not found: {}",
            dir_path.display()
        )));
    }

    let pattern = format!(
        "{}/*.toml",
        glob::Pattern::escape(&dir_path.to_string_lossy())
    );
    let paths = glob::glob(&pattern).map_err(|e| error(format!("bad glob {pattern}: {e}")))?;

    let mut tracked_files = Vec::new();
    let mut lang_inserts = Vec::new();

    for entry in paths {
        let path = entry.map_err(|e| error(format!("path error: {e}")))?;
        if path.is_dir() {
            continue;
        }

        let lang = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| error(format!("non UTF-8 locale file name: {}", path.display())))?
            .to_string();

        // 强制编译器监视文件，修改 TOML 会触发重新编译
        let abs_path = path
            .canonicalize()
            .map_err(|e| error(format!("{}: {e}", path.display())))?;
        let abs_path_str = abs_path.to_string_lossy().into_owned();
        tracked_files.push(quote! { const _: &[u8] = include_bytes!(#abs_path_str); });

        let content = std::fs::read_to_string(&path)
            .map_err(|e| error(format!("read error for {}: {e}", path.display())))?;
        let table: toml::Table = toml::from_str(&content)
            .map_err(|e| error(format!("TOML error in {}: {e}", path.display())))?;

        let mut entries = BTreeMap::new();
        flatten(&mut entries, "", &table);

        let count = entries.len();
        let pairs = entries.iter().map(|(k, v)| quote! { (#k, #v) });
        lang_inserts.push(quote! {
            let entries: [(&'static str, &'static str); #count] = [ #(#pairs),* ];
            table.insert(
                #lang,
                <::lingo_i18n::LocaleDict as ::core::iter::FromIterator<_>>::from_iter(entries),
            );
        });
    }

    Ok(quote! {
        {
            #(#tracked_files)*
            let mut table = ::lingo_i18n::LocaleTable::new();
            #(#lang_inserts)*
            table
        }
    })
}

fn error(message: String) -> syn::Error {
    syn::Error::new(Span::call_site(), message)
}

// 与 LocaleDict::from_toml_str 的展开规则一致
fn flatten(out: &mut BTreeMap<String, String>, prefix: &str, table: &toml::Table) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        let text = match value {
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(d) => d.to_string(),
            toml::Value::Table(inner) => {
                flatten(out, &full_key, inner);
                continue;
            }
            toml::Value::Array(_) => continue,
        };
        out.insert(full_key, text);
    }
}
