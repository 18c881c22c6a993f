/// IO 抽象层模块
///
/// 该模块提供了引用表与文本读写的抽象接口，遵循依赖倒置原则。
/// 支持依赖注入、测试 mock 和替换 IO 实现（如内存 IO）。
///
/// # 架构设计
///
/// - **traits**: 定义 TableReader/TextReader/TextWriter trait 接口
/// - **fs_io**: 基于文件系统的默认实现
///
/// # 使用示例
///
/// ```rust,ignore
/// use obj_ref_replacer::io::{DefaultTableReader, TableReader};
///
/// let reader = DefaultTableReader;
/// let raw = reader.read_table(Path::new("refs.csv"))?;
/// ```
pub mod traits;
pub mod fs_io;

// === 导出 trait 定义 ===
pub use traits::{TableReader, TextReader, TextWriter};

// === 导出默认实现 ===
pub use fs_io::{DefaultTableReader, DefaultTextReader, DefaultTextWriter};
