// ==========================================
// 机队维修适航跟踪系统 - 导入层
// ==========================================
// 职责: 外部维修项目清单导入, 归一化后落库
// 支持: CSV
// ==========================================

pub mod error;
pub mod file_parser;
pub mod item_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, RawRow};
pub use item_importer::{ImportSummary, ItemCsvImporter, ItemImportOutcome, RowRejection};
