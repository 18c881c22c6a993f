use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use crate::reference::ReferenceTable;

/// 引用表统计信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub record_count: usize,
    /// 对象类型 -> 记录数（空类型记为 "(none)"）
    pub type_counts: BTreeMap<String, usize>,
    pub duplicate_ids: Vec<String>,
    /// 缺少 OBJ_ID 的记录数
    pub missing_id_count: usize,
}

impl TableStats {
    /// 统计引用表
    pub fn from_table(table: &ReferenceTable) -> Self {
        let mut type_counts = BTreeMap::new();
        for record in table {
            let key = if record.object_type.is_empty() {
                "(none)".to_string()
            } else {
                record.object_type.clone()
            };
            *type_counts.entry(key).or_insert(0) += 1;
        }

        Self {
            record_count: table.len(),
            type_counts,
            duplicate_ids: table.duplicate_ids(),
            missing_id_count: table.iter().filter(|r| r.id.is_empty()).count(),
        }
    }
}

impl std::fmt::Display for TableStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== 引用表统计信息 ===")?;
        writeln!(f, "记录数量: {}", self.record_count)?;
        for (object_type, count) in &self.type_counts {
            writeln!(f, "  {}: {}", object_type, count)?;
        }
        writeln!(f, "缺少ID的记录: {}", self.missing_id_count)?;
        if self.duplicate_ids.is_empty() {
            writeln!(f, "重复ID: 无")?;
        } else {
            writeln!(f, "重复ID: {}", self.duplicate_ids.join(", "))?;
        }
        Ok(())
    }
}

/// 单个生效的引用替换
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedReference {
    pub id: String,
    pub object_type: String,
    /// 应用前缀规则后的名称
    pub name: String,
    /// 文本中被替换的次数
    pub occurrences: usize,
}

/// 一次替换操作的报告
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionReport {
    /// 文本中不重复的数字标记数
    pub tokens_found: usize,
    /// 按表顺序生效的替换
    pub applied: Vec<AppliedReference>,
    /// 表中没有对应记录的数字标记（按数值排序）
    pub unresolved: Vec<String>,
}

impl SubstitutionReport {
    pub(crate) fn new(tokens_found: usize) -> Self {
        Self {
            tokens_found,
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, applied: AppliedReference) {
        self.applied.push(applied);
    }

    /// 根据表中出现过的ID计算未解析的标记
    pub(crate) fn finish(&mut self, tokens: &HashSet<String>, table: &ReferenceTable) {
        let known: HashSet<&str> = table.iter().map(|r| r.id.as_str()).collect();
        let mut unresolved: Vec<String> = tokens
            .iter()
            .filter(|token| !known.contains(token.as_str()))
            .cloned()
            .collect();
        unresolved.sort_by(|a, b| compare_numeric(a, b));
        self.unresolved = unresolved;
    }

    /// 总替换次数
    pub fn total_replacements(&self) -> usize {
        self.applied.iter().map(|a| a.occurrences).sum()
    }

    /// 是否修改了文本
    pub fn is_modified(&self) -> bool {
        self.total_replacements() > 0
    }
}

/// 按数值比较十进制数字串（忽略前导零），数值相同时按原文比较
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let (ta, tb) = (a.trim_start_matches('0'), b.trim_start_matches('0'));
    ta.len()
        .cmp(&tb.len())
        .then_with(|| ta.cmp(tb))
        .then_with(|| a.cmp(b))
}

impl std::fmt::Display for SubstitutionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== 替换统计信息 ===")?;
        writeln!(f, "数字标记: {}", self.tokens_found)?;
        writeln!(f, "生效引用: {}", self.applied.len())?;
        writeln!(f, "替换次数: {}", self.total_replacements())?;
        for applied in &self.applied {
            writeln!(
                f,
                "  {} [{}] -> {} (x{})",
                applied.id,
                if applied.object_type.is_empty() { "-" } else { applied.object_type.as_str() },
                applied.name,
                applied.occurrences
            )?;
        }
        if !self.unresolved.is_empty() {
            writeln!(f, "未解析: {}", self.unresolved.join(", "))?;
        }
        Ok(())
    }
}
