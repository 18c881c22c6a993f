/// 文件系统 IO 实现
///
/// 提供基于 std::fs 的默认引用表与文本读写实现
use std::path::Path;
use tracing::debug;

use super::traits::{TableReader, TextReader, TextWriter};
use crate::datatypes::DecodedText;
use crate::utils::RefError;

/// 默认的引用表读取器（基于 std::fs，自动识别编码）
#[derive(Debug, Clone, Default)]
pub struct DefaultTableReader;

impl TableReader for DefaultTableReader {
    fn read_table(&self, path: &Path) -> Result<String, RefError> {
        let bytes = std::fs::read(path)?;
        let decoded = DecodedText::decode(&bytes);
        debug!(path = %path.display(), encoding = %decoded.encoding, "decoded reference file");
        Ok(decoded.content)
    }
}

/// 默认的文本读取器（基于 std::fs，自动识别编码）
#[derive(Debug, Clone, Default)]
pub struct DefaultTextReader;

impl TextReader for DefaultTextReader {
    fn read_text(&self, path: &Path) -> Result<String, RefError> {
        let bytes = std::fs::read(path)?;
        Ok(DecodedText::decode(&bytes).content)
    }
}

/// 默认的文本写入器（基于 std::fs，UTF-8）
#[derive(Debug, Clone, Default)]
pub struct DefaultTextWriter;

impl TextWriter for DefaultTextWriter {
    fn write_text(&self, text: &str, path: &Path) -> Result<(), RefError> {
        // 确保父目录存在
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_table_reader() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("refs.csv");
        std::fs::write(&test_file, "title\nOBJ_ID,OBJ_REF\n1,id.a\n").unwrap();

        let reader = DefaultTableReader;
        let text = reader.read_table(&test_file).unwrap();
        assert_eq!(text, "title\nOBJ_ID,OBJ_REF\n1,id.a\n");
    }

    #[test]
    fn test_table_reader_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader = DefaultTableReader;
        let result = reader.read_table(&temp_dir.path().join("missing.csv"));
        assert!(matches!(result, Err(RefError::Io(_))));
    }

    #[test]
    fn test_text_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("query.sql");

        let writer = DefaultTextWriter;
        writer.write_text("select id.get('x') from dual", &test_file).unwrap();

        let reader = DefaultTextReader;
        assert_eq!(reader.read_text(&test_file).unwrap(), "select id.get('x') from dual");
    }

    #[test]
    fn test_writer_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("nested").join("subdir").join("out.sql");

        // 测试自动创建父目录
        let writer = DefaultTextWriter;
        writer.write_text("select 1", &test_file).unwrap();

        assert!(test_file.exists());
    }
}
