//! 进程内表格后端

use async_trait::async_trait;
use std::sync::RwLock;

use super::sheet_backend::{SheetBackend, SheetsError};

/// 把所有行保存在内存中的表格，第一行通常是表头
#[derive(Debug, Default)]
pub struct MemorySheet {
    rows: RwLock<Vec<Vec<String>>>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// 当前所有行的快照
    pub fn snapshot(&self) -> Vec<Vec<String>> {
        self.rows.read().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

#[async_trait]
impl SheetBackend for MemorySheet {
    async fn read_rows(&self) -> Result<Vec<Vec<String>>, SheetsError> {
        Ok(self.snapshot())
    }

    async fn append_row(&self, row: Vec<String>) -> Result<(), SheetsError> {
        let mut rows = self.rows.write().unwrap_or_else(|p| p.into_inner());
        rows.push(row);
        Ok(())
    }

    async fn update_cell(
        &self,
        row: u32,
        column: usize,
        value: String,
    ) -> Result<(), SheetsError> {
        let mut rows = self.rows.write().unwrap_or_else(|p| p.into_inner());
        let index = (row as usize)
            .checked_sub(1)
            .filter(|i| *i < rows.len())
            .ok_or(SheetsError::RowOutOfRange(row))?;

        let cells = &mut rows[index];
        if cells.len() <= column {
            cells.resize(column + 1, String::new());
        }
        cells[column] = value;
        Ok(())
    }

    async fn ping(&self) -> Result<(), SheetsError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
