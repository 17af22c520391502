//! 表格后端抽象
//!
//! 行号从 1 开始（与表格中显示的行号一致），列号从 0 开始（A 列为 0）。

use async_trait::async_trait;
use std::path::PathBuf;

/// 表格后端错误
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("凭据文件读取失败 {path}: {source}")]
    CredentialsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("凭据文件无效: {0}")]
    CredentialsInvalid(String),
    #[error("访问令牌签名失败: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("HTTP 请求失败: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Google Sheets API 返回 {status}: {body}")]
    Api { status: u16, body: String },
    #[error("行号超出范围: {0}")]
    RowOutOfRange(u32),
}

/// 表格后端
///
/// 只负责原始单元格的读写，不了解库存记录的列含义。
#[async_trait]
pub trait SheetBackend: Send + Sync {
    /// 读取配置范围内的全部行（包括表头）
    async fn read_rows(&self) -> Result<Vec<Vec<String>>, SheetsError>;

    /// 在最后一行之后追加一行
    async fn append_row(&self, row: Vec<String>) -> Result<(), SheetsError>;

    /// 覆盖单个单元格
    async fn update_cell(&self, row: u32, column: usize, value: String)
        -> Result<(), SheetsError>;

    /// 检查后端是否可达
    async fn ping(&self) -> Result<(), SheetsError>;

    /// 后端名称，用于日志
    fn name(&self) -> &'static str;
}

/// 把从 0 开始的列号转换为 A1 记法的列字母
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(3), "D");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
        assert_eq!(column_letter(701), "ZZ");
    }
}
