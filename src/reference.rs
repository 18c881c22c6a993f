use serde::{Serialize, Deserialize};
use std::collections::HashSet;

/// 引用ID列名
pub const COLUMN_ID: &str = "OBJ_ID";
/// 对象类型列名
pub const COLUMN_TYPE: &str = "OBJ_TYPE";
/// 引用名称列名
pub const COLUMN_REF: &str = "OBJ_REF";

/// 对象引用记录
///
/// 对应 CSV 中的一行：
/// - `id`：数字ID文本，按单词边界精确匹配
/// - `object_type`：对象类型标签（如 "Fields"），可能为未知类型
/// - `name`：替换用的引用名称，可能包含点分路径
///
/// 解析后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    /// OBJ_ID 列
    #[serde(rename = "OBJ_ID")]
    pub id: String,
    /// OBJ_TYPE 列
    #[serde(rename = "OBJ_TYPE")]
    pub object_type: String,
    /// OBJ_REF 列
    #[serde(rename = "OBJ_REF")]
    pub name: String,
}

impl ReferenceRecord {
    /// 创建新的引用记录
    pub fn new(id: impl Into<String>, object_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object_type: object_type.into(),
            name: name.into(),
        }
    }

    /// 按表头位置从一行数据构建记录
    ///
    /// 缺失的列或缺失的尾部值均为空字符串。
    /// 表头重名时以最后一列为准。
    pub fn from_columns(headers: &[String], values: &[String]) -> Self {
        let column = |name: &str| {
            headers
                .iter()
                .rposition(|h| h == name)
                .and_then(|index| values.get(index))
                .cloned()
                .unwrap_or_default()
        };

        Self {
            id: column(COLUMN_ID),
            object_type: column(COLUMN_TYPE),
            name: column(COLUMN_REF),
        }
    }
}

/// 对象引用表
///
/// 记录顺序与源文件行顺序一致。ID 不保证唯一，替换时按顺序处理，
/// 因此顺序本身是语义的一部分。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceTable {
    records: Vec<ReferenceRecord>,
}

impl ReferenceTable {
    /// 创建空表
    pub fn new() -> Self {
        Self::default()
    }

    /// 从记录列表创建
    pub fn from_records(records: Vec<ReferenceRecord>) -> Self {
        Self { records }
    }

    /// 追加记录（保持插入顺序）
    pub fn push(&mut self, record: ReferenceRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 按源顺序遍历记录
    pub fn iter(&self) -> std::slice::Iter<'_, ReferenceRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ReferenceRecord] {
        &self.records
    }

    /// 查找第一条匹配ID的记录
    pub fn find_by_id(&self, id: &str) -> Option<&ReferenceRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// 获取重复出现的ID（按首次重复出现的顺序）
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();

        for record in &self.records {
            if !seen.insert(record.id.as_str()) && reported.insert(record.id.as_str()) {
                duplicates.push(record.id.clone());
            }
        }

        duplicates
    }

    /// 导出为格式化JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a ReferenceTable {
    type Item = &'a ReferenceRecord;
    type IntoIter = std::slice::Iter<'a, ReferenceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<ReferenceRecord> for ReferenceTable {
    fn from_iter<I: IntoIterator<Item = ReferenceRecord>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}
