//! 配置模块
//!
//! 从 JSON 文件加载默认设置，命令行参数可以覆盖这些值。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::editor::history::DEFAULT_MAX_DEPTH;
use crate::substitute::SubstituteOptions;
use crate::table_loader::DEFAULT_DELIMITER;
use crate::utils::RefError;

/// 配置文件路径环境变量
pub const CONFIG_ENV_VAR: &str = "OBJ_REF_CONFIG";

/// 编辑器初始占位文本
pub const DEFAULT_PLACEHOLDER: &str = "-- Your PL/SQL code here";

/// 运行设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 是否包装为 `id.get('<name>')`
    pub wrap_accessor: bool,
    /// 前缀（使用前规范化）
    pub prefix: String,
    /// 引用表分隔符
    pub delimiter: char,
    /// 编辑器初始文本
    pub placeholder: String,
    /// 编辑历史最大撤销深度
    pub history_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wrap_accessor: true,
            prefix: String::new(),
            delimiter: DEFAULT_DELIMITER,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            history_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Settings {
    /// 从 JSON 文件加载
    pub fn load(path: &Path) -> Result<Self, RefError> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&content)?;
        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// 从 JSON 字符串解析并校验
    pub fn from_json(content: &str) -> Result<Self, RefError> {
        let settings: Settings = serde_json::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// 按优先级解析配置来源：显式路径 > 环境变量 > 默认值
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, RefError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        match path {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// 校验设置
    pub fn validate(&self) -> Result<(), RefError> {
        if self.delimiter == '\n' || self.delimiter == '\r' {
            return Err(RefError::Config("delimiter cannot be a line break".to_string()));
        }
        if self.history_depth == 0 {
            return Err(RefError::Config("history_depth must be at least 1".to_string()));
        }
        if self.delimiter.is_alphanumeric() {
            return Err(RefError::Config(format!(
                "delimiter '{}' must not be a letter or digit",
                self.delimiter
            )));
        }
        Ok(())
    }

    /// 转换为替换选项
    pub fn substitute_options(&self) -> SubstituteOptions {
        SubstituteOptions::new(self.wrap_accessor, self.prefix.clone())
    }
}
