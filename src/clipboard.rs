//! 剪贴板模块
//!
//! 复制和粘贴都先检查系统剪贴板能力再选择策略：
//! - 复制：系统剪贴板可用且写入成功时使用它，否则把文本输出到手动选择区域。
//!   X11/Wayland 上剪贴板内容归写入进程所有，进程退出后即丢失，
//!   因此这类后端写入后同样输出到手动选择区域
//! - 粘贴：系统剪贴板不可用时返回提示，让用户手动粘贴

use std::io::Write;
use tracing::{debug, warn};

use crate::utils::{RefError, MANUAL_PASTE_MESSAGE};

/// 剪贴板后端 trait
pub trait ClipboardBackend {
    /// 后端名称（用于日志）
    fn name(&self) -> &'static str;

    /// 当前平台是否可以使用该后端
    fn is_available(&self) -> bool;

    /// 写入文本
    fn write_text(&mut self, text: &str) -> Result<(), RefError>;

    /// 读取文本
    fn read_text(&mut self) -> Result<String, RefError>;

    /// 进程退出后写入的内容是否仍保留
    fn retains_after_exit(&self) -> bool {
        true
    }
}

/// 系统剪贴板（基于 arboard）
#[cfg(feature = "clipboard")]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    /// 尝试连接系统剪贴板，失败时后端标记为不可用
    pub fn new() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                debug!(error = %e, "system clipboard not available");
                None
            }
        };
        Self { inner }
    }
}

#[cfg(feature = "clipboard")]
impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "clipboard")]
impl ClipboardBackend for SystemClipboard {
    fn name(&self) -> &'static str {
        "system"
    }

    fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    fn write_text(&mut self, text: &str) -> Result<(), RefError> {
        let clipboard = self
            .inner
            .as_mut()
            .ok_or_else(|| RefError::ClipboardUnavailable("no system clipboard".to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| RefError::ClipboardUnavailable(e.to_string()))
    }

    fn read_text(&mut self) -> Result<String, RefError> {
        let clipboard = self
            .inner
            .as_mut()
            .ok_or_else(|| RefError::ClipboardUnavailable("no system clipboard".to_string()))?;
        clipboard
            .get_text()
            .map_err(|e| RefError::ClipboardUnavailable(e.to_string()))
    }

    fn retains_after_exit(&self) -> bool {
        // X11/Wayland：内容由写入进程提供，退出后只有剪贴板管理器接管时才保留
        !cfg!(all(
            unix,
            not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
        ))
    }
}

/// 复制结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// 已写入系统剪贴板，退出后仍保留
    Native,
    /// 已输出到手动选择区域（系统剪贴板可能同时持有一份，直到进程退出）
    Manual,
}

/// 剪贴板服务：按能力选择复制/粘贴策略
pub struct ClipboardService {
    backend: Option<Box<dyn ClipboardBackend>>,
}

impl ClipboardService {
    /// 使用指定后端
    pub fn with_backend(backend: Box<dyn ClipboardBackend>) -> Self {
        Self { backend: Some(backend) }
    }

    /// 没有任何后端（总是走手动路径）
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    /// 检测当前平台可用的后端
    pub fn detect() -> Self {
        #[cfg(feature = "clipboard")]
        {
            Self::with_backend(Box::new(SystemClipboard::new()))
        }
        #[cfg(not(feature = "clipboard"))]
        {
            Self::unavailable()
        }
    }

    /// 系统剪贴板是否可用
    pub fn is_available(&self) -> bool {
        self.backend.as_ref().map(|b| b.is_available()).unwrap_or(false)
    }

    /// 复制文本
    ///
    /// 系统剪贴板不可用、写入被拒绝或内容在退出后不保留时，
    /// 把文本写入 `fallback` 供手动选择复制。
    pub fn copy(&mut self, text: &str, fallback: &mut dyn Write) -> Result<CopyOutcome, RefError> {
        if let Some(backend) = self.backend.as_mut().filter(|b| b.is_available()) {
            match backend.write_text(text) {
                Ok(()) if backend.retains_after_exit() => {
                    debug!(backend = backend.name(), bytes = text.len(), "copied to clipboard");
                    return Ok(CopyOutcome::Native);
                }
                Ok(()) => debug!(
                    backend = backend.name(),
                    "clipboard content is owned by this process, also using manual copy"
                ),
                Err(e) => warn!(error = %e, "clipboard write rejected, using manual copy"),
            }
        }

        fallback.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            fallback.write_all(b"\n")?;
        }
        fallback.flush()?;
        Ok(CopyOutcome::Manual)
    }

    /// 粘贴文本
    ///
    /// 系统剪贴板不可用时返回 [`RefError::ClipboardUnavailable`]，提示用户手动粘贴。
    pub fn paste(&mut self) -> Result<String, RefError> {
        match self.backend.as_mut().filter(|b| b.is_available()) {
            Some(backend) => backend.read_text().map_err(|e| {
                warn!(error = %e, "clipboard read rejected");
                RefError::ClipboardUnavailable(MANUAL_PASTE_MESSAGE.to_string())
            }),
            None => Err(RefError::ClipboardUnavailable(MANUAL_PASTE_MESSAGE.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// 内存剪贴板（测试用）
    pub(crate) struct MemoryClipboard {
        pub available: bool,
        pub deny_writes: bool,
        pub retains: bool,
        pub content: Rc<RefCell<String>>,
    }

    impl MemoryClipboard {
        pub(crate) fn new(content: &str) -> (Self, Rc<RefCell<String>>) {
            let shared = Rc::new(RefCell::new(content.to_string()));
            let clipboard = Self {
                available: true,
                deny_writes: false,
                retains: true,
                content: Rc::clone(&shared),
            };
            (clipboard, shared)
        }
    }

    impl ClipboardBackend for MemoryClipboard {
        fn name(&self) -> &'static str {
            "memory"
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn write_text(&mut self, text: &str) -> Result<(), RefError> {
            if self.deny_writes {
                return Err(RefError::ClipboardUnavailable("denied".to_string()));
            }
            *self.content.borrow_mut() = text.to_string();
            Ok(())
        }

        fn read_text(&mut self) -> Result<String, RefError> {
            Ok(self.content.borrow().clone())
        }

        fn retains_after_exit(&self) -> bool {
            self.retains
        }
    }

    #[test]
    fn test_copy_native() {
        let (clipboard, content) = MemoryClipboard::new("");
        let mut service = ClipboardService::with_backend(Box::new(clipboard));
        let mut fallback = Vec::new();

        let outcome = service.copy("select 1", &mut fallback).unwrap();
        assert_eq!(outcome, CopyOutcome::Native);
        assert_eq!(*content.borrow(), "select 1");
        assert!(fallback.is_empty());
    }

    #[test]
    fn test_copy_falls_back_when_unavailable() {
        let mut service = ClipboardService::unavailable();
        let mut fallback = Vec::new();

        let outcome = service.copy("select 1", &mut fallback).unwrap();
        assert_eq!(outcome, CopyOutcome::Manual);
        assert_eq!(String::from_utf8(fallback).unwrap(), "select 1\n");
    }

    #[test]
    fn test_copy_falls_back_when_denied() {
        let (mut clipboard, content) = MemoryClipboard::new("old");
        clipboard.deny_writes = true;
        let mut service = ClipboardService::with_backend(Box::new(clipboard));
        let mut fallback = Vec::new();

        let outcome = service.copy("select 2\n", &mut fallback).unwrap();
        assert_eq!(outcome, CopyOutcome::Manual);
        assert_eq!(*content.borrow(), "old");
        assert_eq!(String::from_utf8(fallback).unwrap(), "select 2\n");
    }

    #[test]
    fn test_copy_also_manual_when_not_retained() {
        let (mut clipboard, content) = MemoryClipboard::new("");
        clipboard.retains = false;
        let mut service = ClipboardService::with_backend(Box::new(clipboard));
        let mut fallback = Vec::new();

        let outcome = service.copy("select 3", &mut fallback).unwrap();
        assert_eq!(outcome, CopyOutcome::Manual);
        assert_eq!(*content.borrow(), "select 3");
        assert_eq!(String::from_utf8(fallback).unwrap(), "select 3\n");
    }

    #[cfg(all(
        feature = "clipboard",
        unix,
        not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
    ))]
    #[test]
    fn test_system_clipboard_not_retained_on_x11_wayland() {
        assert!(!SystemClipboard { inner: None }.retains_after_exit());
    }

    #[test]
    fn test_paste() {
        let (clipboard, _) = MemoryClipboard::new("select 100 from t");
        let mut service = ClipboardService::with_backend(Box::new(clipboard));
        assert!(service.is_available());
        assert_eq!(service.paste().unwrap(), "select 100 from t");
    }

    #[test]
    fn test_paste_unavailable() {
        let (mut clipboard, _) = MemoryClipboard::new("x");
        clipboard.available = false;
        let mut service = ClipboardService::with_backend(Box::new(clipboard));
        assert!(!service.is_available());

        match service.paste() {
            Err(RefError::ClipboardUnavailable(message)) => {
                assert_eq!(message, MANUAL_PASTE_MESSAGE)
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
