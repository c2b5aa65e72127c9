//! User-Agent 粗粒度分类
//!
//! 在两张有序的 token 表里做子串匹配，第一个命中的生效。顺序很重要：
//! Chrome 的 UA 也包含 `Safari`，Android 的 UA 也包含 `Linux`。

use crate::storage::UNKNOWN;

/// (token, label)，按匹配顺序排列
const PLATFORM_TOKENS: &[(&str, &str)] = &[
    ("Windows", "Windows"),
    ("Linux", "Linux"),
    ("Mac", "MacOS"),
    ("iPhone", "iPhone"),
    ("Android", "Android"),
];

const BROWSER_TOKENS: &[(&str, &str)] = &[
    ("Chrome", "Chrome"),
    ("Firefox", "Firefox"),
    ("Safari", "Safari"),
    ("Edge", "Edge"),
    ("Opera", "Opera"),
];

fn first_match(user_agent: &str, table: &[(&str, &'static str)]) -> &'static str {
    table
        .iter()
        .find(|(token, _)| user_agent.contains(token))
        .map(|(_, label)| *label)
        .unwrap_or(UNKNOWN)
}

/// 平台标签；缺少 header 时按空串处理
pub fn classify_platform(user_agent: Option<&str>) -> &'static str {
    first_match(user_agent.unwrap_or(""), PLATFORM_TOKENS)
}

pub fn classify_browser(user_agent: Option<&str>) -> &'static str {
    first_match(user_agent.unwrap_or(""), BROWSER_TOKENS)
}
