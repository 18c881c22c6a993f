/// 编辑器层模块
///
/// 该模块提供有状态的会话接口，支持编辑历史、撤销/重做等功能。
/// 遵循"修改-保存分离"原则，所有修改操作仅在内存中进行，需要显式写出。
///
/// # 架构设计
///
/// - **surface**: 编辑器表面 trait 及默认的内存缓冲区
/// - **session**: 会话，持有引用表、编辑器表面和编辑历史
/// - **history**: 编辑历史，支持撤销/重做
///
/// # 使用示例
///
/// ```rust,ignore
/// use obj_ref_replacer::{Session, SubstituteOptions};
/// use obj_ref_replacer::io::DefaultTableReader;
///
/// // 加载 + 替换 + 写出
/// let mut session = Session::default();
/// session.load_table_from(&DefaultTableReader, Path::new("refs.csv"))?;
/// session.set_text(sql);
///
/// let report = session.substitute(&SubstituteOptions::default())?;
/// println!("替换了 {} 处", report.total_replacements());
/// ```
pub mod history;
pub mod session;
pub mod surface;

// === 导出公共接口 ===
pub use history::{EditHistory, EditOperation, TextChange};
pub use session::Session;
pub use surface::{EditorSurface, TextBuffer};
