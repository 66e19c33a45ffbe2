//! 工具函数模块
//!
//! 提供各类通用工具函数，包括：
//! - 输入验证
//! - 表格导出与导入
//! - 文件系统操作

pub mod export;
pub mod file_system;
pub mod validation;

// 重新导出常用函数
pub use export::{parse_csv, to_csv, write_csv, CsvRow, ExportColumn};
pub use file_system::*;
pub use validation::*;
