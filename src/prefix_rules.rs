//! 前缀规则模块
//!
//! 按对象类型把用户前缀插入到引用名称的特定点分段中。
//! 每条规则只作用于其锚点在原始名称中第一次出现的位置，
//! 同一类型的多条规则互相独立，因此一个名称可以获得多处前缀。
//!
//! 内置规则表以 JSON 形式嵌入（`data/prefix_rules.json`），首次使用时解析。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::utils::RefError;

/// 嵌入的内置规则表
const BUILTIN_RULES_JSON: &str = include_str!("../data/prefix_rules.json");

static BUILTIN_RULES: LazyLock<PrefixRuleSet> = LazyLock::new(|| {
    PrefixRuleSet::from_json(BUILTIN_RULES_JSON).expect("embedded prefix rules")
});

/// 插入模板中的前缀占位符
pub const PREFIX_PLACEHOLDER: &str = "{prefix}";

/// 默认插入模板
pub const DEFAULT_INSERTION: &str = "{prefix}_";

/// 已知的对象类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    /// 字段
    Fields,
    /// Trackor 树关系
    TrackorTree,
    /// Trackor 类型
    TrackorTypes,
    /// 验证表
    ValidationTables,
}

impl ObjectType {
    /// 全部已知类型
    pub const ALL: [ObjectType; 4] = [
        ObjectType::Fields,
        ObjectType::TrackorTree,
        ObjectType::TrackorTypes,
        ObjectType::ValidationTables,
    ];

    /// 从 OBJ_TYPE 标签获取对象类型（区分大小写）
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Fields" => Some(ObjectType::Fields),
            "Trackor Tree" => Some(ObjectType::TrackorTree),
            "Trackor Types" => Some(ObjectType::TrackorTypes),
            "Validation Tables" => Some(ObjectType::ValidationTables),
            _ => None,
        }
    }

    /// 获取 OBJ_TYPE 标签
    pub fn label(&self) -> &'static str {
        match self {
            ObjectType::Fields => "Fields",
            ObjectType::TrackorTree => "Trackor Tree",
            ObjectType::TrackorTypes => "Trackor Types",
            ObjectType::ValidationTables => "Validation Tables",
        }
    }
}

/// 单条前缀规则
///
/// 等价于 `anchor -> anchor + 渲染后的插入文本`，只作用于第一次出现。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRule {
    /// 要查找的字面子串
    pub anchor: String,
    /// 插入模板，`{prefix}` 会被替换为实际前缀
    #[serde(default = "default_insertion")]
    pub insertion: String,
}

fn default_insertion() -> String {
    DEFAULT_INSERTION.to_string()
}

impl PrefixRule {
    pub fn new(anchor: impl Into<String>, insertion: impl Into<String>) -> Self {
        Self {
            anchor: anchor.into(),
            insertion: insertion.into(),
        }
    }

    /// 使用默认模板 `{prefix}_` 创建规则
    pub fn with_default_insertion(anchor: impl Into<String>) -> Self {
        Self::new(anchor, DEFAULT_INSERTION)
    }

    /// 用前缀渲染插入文本
    pub fn render(&self, prefix: &str) -> String {
        self.insertion.replacen(PREFIX_PLACEHOLDER, prefix, 1)
    }

    /// 替换后的完整文本（锚点 + 插入文本）
    pub fn replacement(&self, prefix: &str) -> String {
        format!("{}{}", self.anchor, self.render(prefix))
    }

    /// 单独对名称应用本规则（仅第一次出现）
    pub fn apply(&self, name: &str, prefix: &str) -> String {
        replace_first(name, &self.anchor, &self.replacement(prefix))
    }
}

/// 前缀规则集
///
/// 对象类型标签 -> 有序规则列表。未登记的类型不做任何修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefixRuleSet {
    rules: HashMap<String, Vec<PrefixRule>>,
}

impl PrefixRuleSet {
    /// 从映射创建规则集
    pub fn new(rules: HashMap<String, Vec<PrefixRule>>) -> Self {
        Self { rules }
    }

    /// 从 JSON 解析规则集
    ///
    /// 格式：`{ "<OBJ_TYPE>": [{ "anchor": "...", "insertion": "{prefix}_" }] }`，
    /// 省略 `insertion` 时使用默认模板。锚点不能为空。
    pub fn from_json(content: &str) -> Result<Self, RefError> {
        let rule_set: PrefixRuleSet = serde_json::from_str(content)?;
        for (label, rules) in &rule_set.rules {
            if rules.iter().any(|rule| rule.anchor.is_empty()) {
                return Err(RefError::Config(format!("empty prefix anchor for '{}'", label)));
            }
        }
        Ok(rule_set)
    }

    /// 内置规则集（四种已知对象类型）
    pub fn builtin() -> &'static Self {
        &BUILTIN_RULES
    }

    /// 已登记的对象类型标签（排序后）
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    /// 获取某个类型的规则
    pub fn rules_for(&self, object_type: &str) -> Option<&[PrefixRule]> {
        self.rules.get(object_type).map(|v| v.as_slice())
    }

    /// 把前缀应用到引用名称
    ///
    /// 所有锚点都在原始名称上定位，`id.` 与 `.cf.` 共用的点不会
    /// 因为前一条规则的插入而失配。同一位置的插入保持规则顺序。
    pub fn apply(&self, name: &str, object_type: &str, prefix: &str) -> String {
        let Some(rules) = self.rules_for(object_type) else {
            return name.to_string();
        };

        let mut insertions: Vec<(usize, String)> = rules
            .iter()
            .filter_map(|rule| {
                first_occurrence_end(name, &rule.anchor).map(|end| (end, rule.render(prefix)))
            })
            .collect();
        // 稳定排序，同位置保持规则顺序
        insertions.sort_by_key(|(position, _)| *position);

        let mut result = String::with_capacity(name.len() + insertions.len() * (prefix.len() + 1));
        let mut cursor = 0;
        for (position, text) in insertions {
            result.push_str(&name[cursor..position]);
            result.push_str(&text);
            cursor = position;
        }
        result.push_str(&name[cursor..]);
        result
    }
}

impl Default for PrefixRuleSet {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

/// 仅替换第一次出现的字面子串
///
/// 与全文单词边界替换是不同的操作，不要混用。
pub fn replace_first(text: &str, pattern: &str, replacement: &str) -> String {
    text.replacen(pattern, replacement, 1)
}

/// 子串第一次出现的结束位置（字节偏移）
fn first_occurrence_end(text: &str, pattern: &str) -> Option<usize> {
    if pattern.is_empty() {
        return None;
    }
    text.find(pattern).map(|start| start + pattern.len())
}
