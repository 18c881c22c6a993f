/// 文本变更追踪模块
///
/// 该模块实现编辑历史，支持撤销/重做功能。
/// 记录会话中每一次修改文本的操作，便于回滚。

use std::collections::VecDeque;
use std::time::Instant;

use crate::utils::RefError;

/// 默认保留的最大撤销深度
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// 编辑历史
///
/// 撤销栈和重做栈直接持有变更。撤销栈超过 `max_depth` 时丢弃最早的变更，
/// 新变更会清空重做栈，所以占用的内存有上限。
#[derive(Debug, Clone)]
pub struct EditHistory {
    /// 撤销栈（队尾为最近的变更）
    undo_stack: VecDeque<TextChange>,
    /// 重做栈
    redo_stack: Vec<TextChange>,
    /// 撤销栈最大深度
    max_depth: usize,
    /// 累计记录过的变更数（包括已丢弃的）
    recorded: usize,
}

/// 修改文本的操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOperation {
    /// ID 替换
    Substitute,
    /// 去除访问器包装
    RemoveAccessor,
    /// 从剪贴板粘贴
    Paste,
    /// 直接设置文本
    SetText,
    /// 恢复占位文本
    Reset,
}

impl std::fmt::Display for EditOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EditOperation::Substitute => "substitute",
            EditOperation::RemoveAccessor => "remove-id-get",
            EditOperation::Paste => "paste",
            EditOperation::SetText => "set-text",
            EditOperation::Reset => "reset",
        };
        f.write_str(name)
    }
}

/// 单次文本变更
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    /// 操作类型
    pub operation: EditOperation,
    /// 修改前的文本
    pub old_value: String,
    /// 修改后的文本
    pub new_value: String,
    /// 应用时间戳
    pub applied_at: Instant,
}

impl TextChange {
    pub fn new(operation: EditOperation, old_value: String, new_value: String) -> Self {
        Self {
            operation,
            old_value,
            new_value,
            applied_at: Instant::now(),
        }
    }
}

impl EditHistory {
    /// 创建新的编辑历史（默认深度）
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// 指定最大撤销深度，至少为 1
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
            recorded: 0,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// 添加一个变更
    ///
    /// 清空重做栈；超出深度时丢弃最早的变更。
    pub fn add_change(&mut self, change: TextChange) {
        self.redo_stack.clear();
        self.undo_stack.push_back(change);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
        self.recorded += 1;
    }

    /// 撤销最后一次操作
    ///
    /// # 返回
    /// 返回被撤销的变更引用，如果没有可撤销的操作则返回错误
    pub fn undo(&mut self) -> Result<&TextChange, RefError> {
        let change = self.undo_stack.pop_back().ok_or(RefError::NothingToUndo)?;
        self.redo_stack.push(change);
        self.redo_stack.last().ok_or(RefError::NothingToUndo)
    }

    /// 重做最后一次撤销的操作
    pub fn redo(&mut self) -> Result<&TextChange, RefError> {
        let change = self.redo_stack.pop().ok_or(RefError::NothingToRedo)?;
        self.undo_stack.push_back(change);
        self.undo_stack.back().ok_or(RefError::NothingToRedo)
    }

    /// 可撤销的变更数量
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// 按应用顺序返回可撤销的变更
    pub fn iter(&self) -> impl Iterator<Item = &TextChange> {
        self.undo_stack.iter()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// 清空所有变更
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.recorded = 0;
    }

    /// 获取某类操作的所有有效变更
    pub fn changes_for(&self, operation: EditOperation) -> Vec<&TextChange> {
        self.iter()
            .filter(|change| change.operation == operation)
            .collect()
    }

    /// 生成变更摘要
    pub fn summary(&self) -> String {
        format!(
            "变更总数: {}, 有效变更: {}, 可撤销: {}, 可重做: {}",
            self.recorded,
            self.undo_stack.len(),
            self.can_undo(),
            self.can_redo()
        )
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// 按字符截断，超出部分用 "..." 表示
fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}

impl std::fmt::Display for TextChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] \"{}\" -> \"{}\"",
            self.operation,
            preview(&self.old_value, 30),
            preview(&self.new_value, 30)
        )
    }
}
