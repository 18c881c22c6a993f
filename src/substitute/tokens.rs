use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// 单词边界内的十进制数字串
static NUMERIC_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]+\b").expect("numeric token pattern"));

/// 收集文本中所有不重复的数字标记
///
/// 标记两侧不能紧邻字母、数字或下划线。重复出现的数字只保留一份。
pub fn collect_numeric_tokens(text: &str) -> HashSet<String> {
    NUMERIC_TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
