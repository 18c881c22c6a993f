use regex::{NoExpand, Regex};

/// 全文替换所有按单词边界匹配的字面值
///
/// 与前缀规则的"仅第一次出现"替换是不同的操作。
/// 替换文本按字面插入，不展开 `$` 引用。
///
/// # 返回
/// 替换后的文本和被替换的次数
pub fn replace_word_bounded(
    text: &str,
    literal: &str,
    replacement: &str,
) -> Result<(String, usize), regex::Error> {
    let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(literal)))?;

    let count = pattern.find_iter(text).count();
    if count == 0 {
        return Ok((text.to_string(), 0));
    }

    let replaced = pattern.replace_all(text, NoExpand(replacement)).into_owned();
    Ok((replaced, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_all_occurrences() {
        let (text, count) = replace_word_bounded("100 + 100 = 200", "100", "x").unwrap();
        assert_eq!(text, "x + x = 200");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_word_boundary() {
        let (text, count) = replace_word_bounded("1000 100 a100 100_", "100", "x").unwrap();
        assert_eq!(text, "1000 x a100 100_");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_no_match() {
        let (text, count) = replace_word_bounded("select 1", "2", "x").unwrap();
        assert_eq!(text, "select 1");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_replacement_is_literal() {
        let (text, _) = replace_word_bounded("v 5", "5", "$1 ${name}").unwrap();
        assert_eq!(text, "v $1 ${name}");
    }

    #[test]
    fn test_literal_is_escaped() {
        let (text, count) = replace_word_bounded("a.b axb", "a.b", "z").unwrap();
        assert_eq!(text, "z axb");
        assert_eq!(count, 1);
    }
}
