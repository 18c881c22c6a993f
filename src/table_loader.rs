/// 引用表加载模块
///
/// 将 CSV 文本解析为有序的 [`ReferenceTable`]。
///
/// # 格式
/// - 第 0 行：标题行，无结构意义，直接丢弃
/// - 第 1 行：表头，按分隔符切分并去除空白
/// - 第 2 行起：数据行，空行跳过，按位置与表头对应
///
/// 不支持引号和转义，字段中不能包含分隔符。解析永不失败。

use std::path::Path;
use tracing::{debug, info};

use crate::io::TableReader;
use crate::reference::{ReferenceRecord, ReferenceTable};
use crate::utils::RefError;

/// 默认分隔符
pub const DEFAULT_DELIMITER: char = ',';

/// 使用默认分隔符解析引用表
pub fn parse_table(raw_text: &str) -> ReferenceTable {
    parse_table_with_delimiter(raw_text, DEFAULT_DELIMITER)
}

/// 使用指定分隔符解析引用表
pub fn parse_table_with_delimiter(raw_text: &str, delimiter: char) -> ReferenceTable {
    // 末尾空行不参与行号计算
    let lines: Vec<&str> = raw_text.trim_end().split('\n').collect();
    if lines.len() < 2 {
        return ReferenceTable::new();
    }

    let headers = split_row(lines[1], delimiter);

    let table: ReferenceTable = lines[2..]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| ReferenceRecord::from_columns(&headers, &split_row(line, delimiter)))
        .collect();

    debug!(
        headers = ?headers,
        records = table.len(),
        "parsed reference table"
    );

    table
}

/// 通过读取器加载引用表
///
/// 读取失败时返回 IO 错误；内容一旦读取成功，解析本身不会失败。
pub fn load_table(
    reader: &dyn TableReader,
    path: &Path,
    delimiter: char,
) -> Result<ReferenceTable, RefError> {
    let raw_text = reader.read_table(path)?;
    let table = parse_table_with_delimiter(&raw_text, delimiter);

    info!(path = %path.display(), records = table.len(), "loaded reference table");
    Ok(table)
}

/// 切分一行并去除每个字段的首尾空白
fn split_row(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter).map(|field| field.trim().to_string()).collect()
}
