//! 基础设施层：日志与表格后端

pub mod google_sheets;
pub mod logger;
pub mod memory_sheet;
pub mod sheet_backend;

pub use google_sheets::GoogleSheetsClient;
pub use memory_sheet::MemorySheet;
pub use sheet_backend::{SheetBackend, SheetsError};
