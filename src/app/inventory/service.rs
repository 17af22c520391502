//! 库存业务服务

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::kpi::compute_kpi;
use super::model::{AddProductRequest, Kpi, NewProduct, Product, ProductQuery, WithdrawRequest};
use super::query;
use super::repository::InventoryRepository;
use crate::config::InventoryConfig;
use crate::core::error::CoreError;
use crate::infrastructure::SheetsError;

/// 未提供位置时的默认货架位置
const DEFAULT_LOCATION: &str = "1-1";

#[derive(Clone)]
pub struct InventoryService {
    repository: InventoryRepository,
    settings: Arc<InventoryConfig>,
}

impl InventoryService {
    pub fn new(repository: InventoryRepository, settings: InventoryConfig) -> Self {
        Self {
            repository,
            settings: Arc::new(settings),
        }
    }

    pub async fn fetch_all(&self) -> Vec<Product> {
        self.repository.fetch_all().await
    }

    pub async fn search(&self, term: &str) -> Vec<Product> {
        query::search_products(self.repository.fetch_all().await, term)
    }

    pub async fn filter_by_company(&self, company: &str) -> Vec<Product> {
        query::filter_by_company(
            self.repository.fetch_all().await,
            company,
            self.company_aliases(),
        )
    }

    /// 列表查询：有搜索词时按搜索词，否则按公司筛选
    pub async fn list(&self, params: &ProductQuery) -> Vec<Product> {
        match params.search.as_deref() {
            Some(term) if !term.trim().is_empty() => self.search(term).await,
            _ => match params.company.as_deref() {
                Some(company) if !query::is_all_companies(company) => {
                    self.filter_by_company(company).await
                }
                _ => self.fetch_all().await,
            },
        }
    }

    /// 新增产品，`date_added` 取当天日期
    pub async fn add_product(&self, request: AddProductRequest) -> Result<(), CoreError> {
        let company = required_text(request.company, "company")?;
        let name = required_text(request.name, "name")?;
        let quantity = match request.quantity {
            None => return Err(missing_field("quantity")),
            Some(input) => input
                .as_i64()
                .filter(|q| *q >= 0)
                .and_then(|q| u32::try_from(q).ok())
                .ok_or_else(|| {
                    CoreError::BadRequest("Quantity must be a non-negative integer".to_string())
                })?,
        };

        let location = request
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        let product = NewProduct {
            company,
            name,
            alias: trimmed(request.alias),
            quantity,
            location,
            notes: trimmed(request.notes),
            photo_url: trimmed(request.photo_url),
            date_added: chrono::Local::now().format("%Y-%m-%d").to_string(),
            added_by: trimmed(request.added_by),
        };

        if self.repository.append_row(&product).await {
            Ok(())
        } else {
            Err(CoreError::InternalServerError(
                "Failed to add product".to_string(),
            ))
        }
    }

    /// 出库：读取当前数量，扣减后写回
    ///
    /// 读和写之间没有加锁，同一行的并发出库可能丢失更新。
    pub async fn withdraw(&self, row_id: u32, request: &WithdrawRequest) -> Result<u32, CoreError> {
        let amount = request
            .quantity
            .as_i64()
            .filter(|q| *q > 0)
            .and_then(|q| u32::try_from(q).ok())
            .ok_or_else(|| CoreError::BadRequest("Invalid withdrawal quantity".to_string()))?;

        let products = self.repository.try_fetch_all().await.map_err(|e| {
            error!("出库前读取库存失败: 第 {} 行: {}", row_id, e);
            CoreError::InternalServerError("Withdrawal failed".to_string())
        })?;
        let product = products
            .iter()
            .find(|p| p.id == row_id)
            .ok_or_else(|| CoreError::NotFound(format!("Product {} not found", row_id)))?;

        if amount > product.quantity {
            warn!(
                "库存不足: 第 {} 行 {} 现有 {}, 申请出库 {}",
                row_id, product.name, product.quantity, amount
            );
            return Err(CoreError::BadRequest(format!(
                "Insufficient stock: requested {}, available {}",
                amount, product.quantity
            )));
        }

        let remaining = product.quantity - amount;
        if !self.repository.update_quantity(row_id, remaining).await {
            return Err(CoreError::InternalServerError(
                "Withdrawal failed".to_string(),
            ));
        }

        info!(
            "产品 {} 出库: {} 件, 原因: {}, 领取人: {}, 签名: {}",
            row_id,
            amount,
            request.reason,
            request.recipient,
            if request.signature.trim().is_empty() {
                "无"
            } else {
                "有"
            }
        );

        Ok(amount)
    }

    pub async fn kpi(&self) -> Kpi {
        let products = self.repository.fetch_all().await;
        compute_kpi(&products, self.settings.low_stock_threshold)
    }

    /// 重新拉取表格，返回记录数
    pub async fn sync(&self) -> usize {
        self.repository.fetch_all().await.len()
    }

    pub async fn health(&self) -> Result<(), SheetsError> {
        self.repository.ping().await
    }

    fn company_aliases(&self) -> &BTreeMap<String, String> {
        &self.settings.company_aliases
    }
}

fn missing_field(field: &str) -> CoreError {
    CoreError::BadRequest(format!("Missing required field: {}", field))
}

fn required_text(value: Option<String>, field: &str) -> Result<String, CoreError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing_field(field))
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}
