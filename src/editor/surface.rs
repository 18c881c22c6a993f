/// 编辑器表面模块
///
/// 编辑器是唯一的可变文本存储，核心逻辑每次操作时读取并写回，不保留副本。

use crate::config::DEFAULT_PLACEHOLDER;

/// 编辑器表面 trait
pub trait EditorSurface {
    /// 获取当前文本
    fn get_value(&self) -> String;

    /// 替换全部文本
    fn set_value(&mut self, value: String);
}

/// 内存文本缓冲区（默认的编辑器表面）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    value: String,
}

impl TextBuffer {
    /// 创建带初始文本的缓冲区
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    /// 当前文本长度（字节）
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// 行数
    pub fn line_count(&self) -> usize {
        self.value.lines().count()
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER)
    }
}

impl EditorSurface for TextBuffer {
    fn get_value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: String) {
        self.value = value;
    }
}
