/// 会话模块
///
/// 把当前加载的引用表、编辑器表面和编辑历史放在一个显式的上下文对象中，
/// 替代全局可变状态。所有修改都只作用于内存，需要显式写出。

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::history::{EditHistory, EditOperation, TextChange};
use super::surface::{EditorSurface, TextBuffer};
use crate::clipboard::{ClipboardService, CopyOutcome};
use crate::config::{Settings, DEFAULT_PLACEHOLDER};
use crate::io::TableReader;
use crate::reference::ReferenceTable;
use crate::stats::{SubstitutionReport, TableStats};
use crate::substitute::{remove_accessor, substitute_with_report, SubstituteOptions};
use crate::table_loader::{load_table, parse_table_with_delimiter, DEFAULT_DELIMITER};
use crate::utils::RefError;

/// 替换会话
///
/// # 核心特性
/// - **显式状态**: 引用表和文本都是会话字段，不依赖全局变量
/// - **原子替换**: 新表完整解析后才替换旧表，读取失败时旧表保持不变
/// - **可追踪**: 每次修改文本都记录到编辑历史，支持撤销/重做
///
/// # 使用示例
///
/// ```rust,ignore
/// use obj_ref_replacer::{Session, SubstituteOptions};
/// use obj_ref_replacer::io::DefaultTableReader;
///
/// let mut session = Session::default();
/// session.load_table_from(&DefaultTableReader, Path::new("refs.csv"))?;
/// session.set_text("select 100 from t");
/// let report = session.substitute(&SubstituteOptions::default())?;
/// println!("{}", session.text());
/// ```
pub struct Session<S: EditorSurface = TextBuffer> {
    /// 编辑器表面
    surface: S,
    /// 当前引用表（未加载时为 None）
    table: Option<ReferenceTable>,
    /// 当前引用表的来源
    table_source: Option<PathBuf>,
    /// 引用表分隔符
    delimiter: char,
    /// 重置时使用的占位文本
    placeholder: String,
    /// 编辑历史
    history: EditHistory,
}

impl Session<TextBuffer> {
    /// 按设置创建会话，编辑器内容为占位文本
    pub fn from_settings(settings: &Settings) -> Self {
        let mut session = Self::new(TextBuffer::new(settings.placeholder.clone()));
        session.delimiter = settings.delimiter;
        session.placeholder = settings.placeholder.clone();
        session.history = EditHistory::with_max_depth(settings.history_depth);
        session
    }
}

impl Default for Session<TextBuffer> {
    fn default() -> Self {
        Self::new(TextBuffer::default())
    }
}

impl<S: EditorSurface> Session<S> {
    /// 使用指定编辑器表面创建会话
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            table: None,
            table_source: None,
            delimiter: DEFAULT_DELIMITER,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            history: EditHistory::new(),
        }
    }

    /// 当前引用表
    pub fn table(&self) -> Option<&ReferenceTable> {
        self.table.as_ref()
    }

    pub fn has_table(&self) -> bool {
        self.table.is_some()
    }

    /// 当前引用表的来源文件
    pub fn table_source(&self) -> Option<&Path> {
        self.table_source.as_deref()
    }

    /// 当前引用表的统计信息
    pub fn table_stats(&self) -> Option<TableStats> {
        self.table.as_ref().map(TableStats::from_table)
    }

    /// 整体替换引用表（不合并）
    pub fn set_table(&mut self, table: ReferenceTable) {
        self.table = Some(table);
        self.table_source = None;
    }

    /// 从文本解析并替换引用表
    ///
    /// # 返回
    /// 新表的记录数
    pub fn load_table_text(&mut self, raw_text: &str) -> usize {
        let table = parse_table_with_delimiter(raw_text, self.delimiter);
        let count = table.len();
        self.set_table(table);
        count
    }

    /// 通过读取器加载引用表
    ///
    /// 读取失败时返回错误，之前的引用表保持不变。
    pub fn load_table_from(&mut self, reader: &dyn TableReader, path: &Path) -> Result<usize, RefError> {
        let table = match load_table(reader, path, self.delimiter) {
            Ok(table) => table,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read reference file, keeping previous table");
                return Err(e);
            }
        };

        let count = table.len();
        self.table = Some(table);
        self.table_source = Some(path.to_path_buf());
        Ok(count)
    }

    /// 当前编辑器文本
    pub fn text(&self) -> String {
        self.surface.get_value()
    }

    /// 直接设置编辑器文本
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.apply(EditOperation::SetText, text.into());
    }

    /// 执行ID替换
    ///
    /// 未加载引用表时返回 [`RefError::MissingReferenceTable`]，文本不变。
    pub fn substitute(&mut self, options: &SubstituteOptions) -> Result<SubstitutionReport, RefError> {
        let current = self.surface.get_value();
        let (text, report) = substitute_with_report(&current, self.table.as_ref(), options)?;
        info!(
            replacements = report.total_replacements(),
            unresolved = report.unresolved.len(),
            "substitution finished"
        );
        self.apply(EditOperation::Substitute, text);
        Ok(report)
    }

    /// 去除访问器包装
    ///
    /// # 返回
    /// 文本是否发生变化
    pub fn remove_accessor(&mut self) -> bool {
        let text = remove_accessor(&self.surface.get_value());
        self.apply(EditOperation::RemoveAccessor, text)
    }

    /// 复制当前文本到剪贴板
    pub fn copy(&self, clipboard: &mut ClipboardService, fallback: &mut dyn Write) -> Result<CopyOutcome, RefError> {
        clipboard.copy(&self.surface.get_value(), fallback)
    }

    /// 用剪贴板内容替换编辑器文本
    ///
    /// 剪贴板不可用时返回错误，文本不变。
    pub fn paste(&mut self, clipboard: &mut ClipboardService) -> Result<(), RefError> {
        let text = clipboard.paste()?;
        self.apply(EditOperation::Paste, text);
        Ok(())
    }

    /// 恢复占位文本
    pub fn reset(&mut self) {
        let placeholder = self.placeholder.clone();
        self.apply(EditOperation::Reset, placeholder);
    }

    /// 撤销最后一次修改
    pub fn undo(&mut self) -> Result<EditOperation, RefError> {
        let change = self.history.undo()?;
        let (operation, value) = (change.operation, change.old_value.clone());
        self.surface.set_value(value);
        Ok(operation)
    }

    /// 重做上一次撤销的修改
    pub fn redo(&mut self) -> Result<EditOperation, RefError> {
        let change = self.history.redo()?;
        let (operation, value) = (change.operation, change.new_value.clone());
        self.surface.set_value(value);
        Ok(operation)
    }

    /// 编辑历史
    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// 编辑器表面
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// 生成会话摘要
    pub fn summary(&self) -> String {
        format!(
            "引用表: {}, {}",
            match (&self.table, &self.table_source) {
                (Some(table), Some(path)) => format!("{} 条记录 ({})", table.len(), path.display()),
                (Some(table), None) => format!("{} 条记录", table.len()),
                (None, _) => "未加载".to_string(),
            },
            self.history.summary()
        )
    }

    /// 写回编辑器并记录变更；文本未变化时不记录
    fn apply(&mut self, operation: EditOperation, new_value: String) -> bool {
        let old_value = self.surface.get_value();
        if old_value == new_value {
            return false;
        }

        self.surface.set_value(new_value.clone());
        self.history.add_change(TextChange::new(operation, old_value, new_value));
        true
    }
}
