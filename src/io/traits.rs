/// IO 抽象层 - trait 定义
///
/// 该模块定义了引用表和文本的读写接口，支持依赖注入和测试 mock。
/// 读取与解析分离：读取器只返回文本，解析由 `table_loader` 负责。

use std::path::Path;
use crate::utils::RefError;

/// 引用表读取 trait
///
/// # 职责
/// - 读取引用表文件的原始文本（负责字符编码）
/// - 不负责解析，仅负责 IO
///
/// # 实现示例
/// ```rust,ignore
/// struct MemoryTableReader(String);
/// impl TableReader for MemoryTableReader {
///     fn read_table(&self, _path: &Path) -> Result<String, RefError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
pub trait TableReader {
    /// 读取引用表文本
    ///
    /// # 参数
    /// * `path` - 文件路径
    fn read_table(&self, path: &Path) -> Result<String, RefError>;
}

/// 文本读取 trait
///
/// # 职责
/// - 读取待替换的 PL/SQL 文本
pub trait TextReader {
    /// 读取文本
    ///
    /// # 参数
    /// * `path` - 文件路径
    fn read_text(&self, path: &Path) -> Result<String, RefError>;
}

/// 文本写入 trait
///
/// # 职责
/// - 将替换结果写入文件系统
pub trait TextWriter {
    /// 写入文本
    ///
    /// # 参数
    /// * `text` - 要写入的文本
    /// * `path` - 目标文件路径
    fn write_text(&self, text: &str, path: &Path) -> Result<(), RefError>;
}
