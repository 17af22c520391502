//! 库存表格适配器
//!
//! 每次读取都重新拉取并解析整张表，不做缓存。
//! `fetch_all` 读失败返回空列表，写失败返回 false，错误只记录日志；
//! 需要区分“无数据”和“读不到”的调用方用 `try_fetch_all`。

use std::sync::Arc;
use tracing::{error, info, warn};

use super::layout::{self, COL_QUANTITY};
use super::model::{NewProduct, Product};
use crate::infrastructure::{SheetBackend, SheetsError};

#[derive(Clone)]
pub struct InventoryRepository {
    backend: Arc<dyn SheetBackend>,
}

impl InventoryRepository {
    pub fn new(backend: Arc<dyn SheetBackend>) -> Self {
        Self { backend }
    }

    /// 读取全部有效记录，后端错误原样返回
    pub async fn try_fetch_all(&self) -> Result<Vec<Product>, SheetsError> {
        let rows = self.backend.read_rows().await?;

        if rows.len() <= layout::HEADER_ROW as usize {
            warn!("库存表格中没有数据行");
            return Ok(Vec::new());
        }

        let products = layout::parse_rows(&rows);
        info!("从表格加载了 {} 条库存记录", products.len());
        Ok(products)
    }

    /// 读取全部有效记录，失败时记录日志并返回空列表
    pub async fn fetch_all(&self) -> Vec<Product> {
        match self.try_fetch_all().await {
            Ok(products) => products,
            Err(e) => {
                error!("读取库存表格失败 ({}): {}", self.backend.name(), e);
                Vec::new()
            }
        }
    }

    /// 在表格末尾追加一条记录
    pub async fn append_row(&self, product: &NewProduct) -> bool {
        let row = layout::row_from_new_product(product);
        match self.backend.append_row(row).await {
            Ok(()) => {
                info!("新增产品成功: {} / {}", product.company, product.name);
                true
            }
            Err(e) => {
                error!("新增产品失败 {}: {}", product.name, e);
                false
            }
        }
    }

    /// 覆盖指定行的数量单元格
    ///
    /// 不做并发检查，后写入者覆盖先写入者。
    pub async fn update_quantity(&self, row_id: u32, quantity: u32) -> bool {
        match self
            .backend
            .update_cell(row_id, COL_QUANTITY, quantity.to_string())
            .await
        {
            Ok(()) => {
                info!("更新数量成功: 第 {} 行, 新数量 {}", row_id, quantity);
                true
            }
            Err(e) => {
                error!("更新数量失败: 第 {} 行: {}", row_id, e);
                false
            }
        }
    }

    /// 检查后端连通性
    pub async fn ping(&self) -> Result<(), SheetsError> {
        self.backend.ping().await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::infrastructure::MemorySheet;
    use async_trait::async_trait;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    /// 所有操作都失败的后端
    pub(crate) struct BrokenSheet;

    #[async_trait]
    impl SheetBackend for BrokenSheet {
        async fn read_rows(&self) -> Result<Vec<Vec<String>>, SheetsError> {
            Err(SheetsError::Api {
                status: 503,
                body: "unavailable".to_string(),
            })
        }

        async fn append_row(&self, _row: Vec<String>) -> Result<(), SheetsError> {
            Err(SheetsError::Api {
                status: 403,
                body: "forbidden".to_string(),
            })
        }

        async fn update_cell(
            &self,
            row: u32,
            _column: usize,
            _value: String,
        ) -> Result<(), SheetsError> {
            Err(SheetsError::RowOutOfRange(row))
        }

        async fn ping(&self) -> Result<(), SheetsError> {
            Err(SheetsError::Api {
                status: 503,
                body: "unavailable".to_string(),
            })
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_fetch_all_reads_sheet() {
        let sheet = MemorySheet::with_rows(vec![
            layout::header_row(),
            row(&["CMES", "Bolt", "", "5"]),
            row(&["", "", "", ""]),
        ]);
        let repo = InventoryRepository::new(Arc::new(sheet));

        let products = repo.fetch_all().await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, 2);
    }

    #[tokio::test]
    async fn test_failures_are_recovered() {
        let repo = InventoryRepository::new(Arc::new(BrokenSheet));

        assert!(matches!(
            repo.try_fetch_all().await,
            Err(SheetsError::Api { status: 503, .. })
        ));
        assert!(repo.fetch_all().await.is_empty());
        assert!(!repo.update_quantity(2, 1).await);
        assert!(repo.ping().await.is_err());

        let product = NewProduct {
            company: "CMES".to_string(),
            name: "Bolt".to_string(),
            alias: String::new(),
            quantity: 1,
            location: String::new(),
            notes: String::new(),
            photo_url: String::new(),
            date_added: String::new(),
            added_by: String::new(),
        };
        assert!(!repo.append_row(&product).await);
    }

    #[tokio::test]
    async fn test_update_quantity_writes_quantity_column() {
        let sheet = Arc::new(MemorySheet::with_rows(vec![
            layout::header_row(),
            row(&["CMES", "Bolt", "", "5"]),
        ]));
        let repo = InventoryRepository::new(sheet.clone());

        assert!(repo.update_quantity(2, 3).await);
        assert_eq!(sheet.snapshot()[1][COL_QUANTITY], "3");
    }
}
