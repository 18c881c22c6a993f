use thiserror::Error;
use std::path::Path;

/// 未加载引用表时给用户的提示
pub const MISSING_TABLE_MESSAGE: &str = "Please load a CSV file first";

/// 剪贴板不可用时给用户的提示
pub const MANUAL_PASTE_MESSAGE: &str =
    "Clipboard access is not available. Paste the text manually (stdin or --input).";

/// 自定义错误类型
#[derive(Error, Debug)]
pub enum RefError {
    #[error("{}", MISSING_TABLE_MESSAGE)]
    MissingReferenceTable,

    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 规范化用户输入的前缀（去除首尾空白并转为小写）
pub fn normalize_prefix(prefix: &str) -> String {
    prefix.trim().to_lowercase()
}

/// 检查文件扩展名是否为支持的引用表格式
pub fn is_supported_table_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .map(|ext| crate::SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// 创建文件备份
pub fn create_backup(file_path: &Path) -> Result<std::path::PathBuf, RefError> {
    if !file_path.exists() {
        return Err(RefError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "原文件不存在"
        )));
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S");
    let backup_path = file_path.with_extension(format!("{}.bak", timestamp));

    std::fs::copy(file_path, &backup_path)?;

    Ok(backup_path)
}
