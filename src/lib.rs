pub mod clipboard;
pub mod config;
pub mod datatypes;
pub mod editor;
pub mod io;
pub mod prefix_rules;
pub mod reference;
pub mod stats;
pub mod substitute;
pub mod table_loader;
pub mod utils;

// 重新导出主要结构
pub use clipboard::{ClipboardBackend, ClipboardService, CopyOutcome};
pub use config::Settings;
pub use editor::{EditOperation, EditorSurface, Session, TextBuffer};
pub use prefix_rules::{ObjectType, PrefixRuleSet};
pub use reference::{ReferenceRecord, ReferenceTable};
pub use stats::{SubstitutionReport, TableStats};
pub use substitute::{remove_accessor, substitute, substitute_with_report, SubstituteOptions};
pub use table_loader::{parse_table, parse_table_with_delimiter};
pub use utils::{normalize_prefix, RefError};

// 常量定义
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "txt"];
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
