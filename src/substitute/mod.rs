//! 替换引擎
//!
//! 把文本中的数字对象引用ID替换为引用表中的名称，以及其逆操作。

mod replace;
mod tokens;

pub use replace::replace_word_bounded;
pub use tokens::collect_numeric_tokens;

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::prefix_rules::PrefixRuleSet;
use crate::reference::ReferenceTable;
use crate::stats::{AppliedReference, SubstitutionReport};
use crate::utils::{normalize_prefix, RefError};

/// `id.get('<name>')` 访问器表达式
static ACCESSOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"id\.get\('([^']+)'\)").expect("accessor pattern"));

/// 替换选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstituteOptions {
    /// 是否包装为 `id.get('<name>')`
    pub wrap_accessor: bool,
    /// 用户前缀，使用前会去除空白并转为小写
    pub prefix: String,
}

impl SubstituteOptions {
    pub fn new(wrap_accessor: bool, prefix: impl Into<String>) -> Self {
        Self {
            wrap_accessor,
            prefix: prefix.into(),
        }
    }

    /// 规范化后的前缀
    pub fn normalized_prefix(&self) -> String {
        normalize_prefix(&self.prefix)
    }
}

impl Default for SubstituteOptions {
    fn default() -> Self {
        Self {
            wrap_accessor: true,
            prefix: String::new(),
        }
    }
}

/// 包装为访问器表达式
pub fn wrap_accessor(name: &str) -> String {
    format!("id.get('{}')", name)
}

/// 替换文本中的对象引用ID
///
/// 未加载引用表（`None` 或空表）时返回 [`RefError::MissingReferenceTable`]，文本不变。
pub fn substitute(
    text: &str,
    table: Option<&ReferenceTable>,
    options: &SubstituteOptions,
) -> Result<String, RefError> {
    substitute_with_report(text, table, options).map(|(text, _)| text)
}

/// 替换文本中的对象引用ID并返回替换报告
///
/// # 算法
/// 1. 收集文本中不重复的数字标记
/// 2. 按表顺序遍历记录，ID 不在标记集合中的跳过
/// 3. 计算有效名称（有前缀时应用前缀规则）
/// 4. 在当前工作文本中全文替换该ID
///
/// 后面的记录看到的是前面记录替换后的文本，所以重复ID通常只有第一条生效。
pub fn substitute_with_report(
    text: &str,
    table: Option<&ReferenceTable>,
    options: &SubstituteOptions,
) -> Result<(String, SubstitutionReport), RefError> {
    let table = match table {
        Some(table) if !table.is_empty() => table,
        _ => {
            warn!("substitution requested without a reference table");
            return Err(RefError::MissingReferenceTable);
        }
    };

    let tokens = collect_numeric_tokens(text);
    let mut report = SubstitutionReport::new(tokens.len());
    if tokens.is_empty() {
        debug!("no numeric tokens found");
        return Ok((text.to_string(), report));
    }

    let prefix = options.normalized_prefix();
    let rules = PrefixRuleSet::builtin();
    let mut working = text.to_string();

    for record in table {
        if !tokens.contains(&record.id) {
            continue;
        }

        let name = if prefix.is_empty() {
            record.name.clone()
        } else {
            rules.apply(&record.name, &record.object_type, &prefix)
        };

        let replacement = if options.wrap_accessor {
            wrap_accessor(&name)
        } else {
            name.clone()
        };

        let (next, occurrences) = replace_word_bounded(&working, &record.id, &replacement)?;
        working = next;

        if occurrences > 0 {
            debug!(id = %record.id, name = %name, occurrences, "replaced object reference");
            report.record(AppliedReference {
                id: record.id.clone(),
                object_type: record.object_type.clone(),
                name,
                occurrences,
            });
        }
    }

    report.finish(&tokens, table);
    Ok((working, report))
}

/// 去除访问器包装：`id.get('<name>')` -> `<name>`
///
/// 不校验名称是否来自引用表，没有匹配时原样返回。
pub fn remove_accessor(text: &str) -> String {
    ACCESSOR_RE.replace_all(text, "$1").into_owned()
}
