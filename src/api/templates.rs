//! 内嵌 HTML 页面
//!
//! 模板位于 `templates/`，编译进二进制。渲染时一次性替换 `%NAME%` 占位符，
//! 替换后的内容不会再次扫描，用户数据无法注入新的占位符。
//! 调用方需先用 [`html_escape`] 或 [`script_json`] 处理值。

use rust_embed::Embed;
use serde::Serialize;

use crate::errors::{LinkTrackerError, Result};

#[derive(Embed)]
#[folder = "templates/"]
struct PageTemplates;

/// 渲染内嵌模板，替换给定的 `%NAME%` 占位符
pub fn render(template: &str, vars: &[(&str, &str)]) -> Result<String> {
    let file = PageTemplates::get(template)
        .ok_or_else(|| LinkTrackerError::template(format!("Template not found: {}", template)))?;
    let source = std::str::from_utf8(&file.data).map_err(|e| {
        LinkTrackerError::template(format!("Template {} is not UTF-8: {}", template, e))
    })?;

    Ok(substitute(source, vars))
}

fn substitute(source: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let token = after
            .find('%')
            .map(|end| &after[..end])
            .filter(|name| is_token_name(name));

        match token.and_then(|name| vars.iter().find(|(k, _)| *k == name).map(|(_, v)| (name, v))) {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_token_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

/// 转义 HTML 文本及带引号的属性值
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// 可直接放入 `<script>` 的 JSON 字面量
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029"))
}
