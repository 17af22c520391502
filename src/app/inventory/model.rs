//! 库存数据模型

use serde::{Deserialize, Serialize};

/// 一条库存记录，对应表格中的一行
///
/// `id` 是表格行号，插入或删除行后会变化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub company: String,
    pub name: String,
    pub alias: String,
    pub quantity: u32,
    pub location: String,
    pub notes: String,
    pub photo_url: String,
    pub date_added: String,
    pub added_by: String,
}

/// 待写入表格的新记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub company: String,
    pub name: String,
    pub alias: String,
    pub quantity: u32,
    pub location: String,
    pub notes: String,
    pub photo_url: String,
    pub date_added: String,
    pub added_by: String,
}

/// 数量字段，前端表单可能以数字或字符串提交
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(i64),
    Text(String),
}

impl QuantityInput {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            QuantityInput::Number(n) => Some(*n),
            QuantityInput::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// 新增产品请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddProductRequest {
    pub company: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    pub quantity: Option<QuantityInput>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub added_by: Option<String>,
}

/// 出库请求
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawRequest {
    pub quantity: QuantityInput,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub signature: String,
}

/// 搜索请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search: String,
}

/// 列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

/// 产品列表响应体
#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub count: usize,
}

impl From<Vec<Product>> for ProductList {
    fn from(products: Vec<Product>) -> Self {
        let count = products.len();
        Self { products, count }
    }
}

/// 仪表盘指标
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Kpi {
    pub total_products: usize,
    pub total_units: u64,
    pub low_stock_alerts: usize,
    pub active_companies: usize,
}

#[derive(Debug, Serialize)]
pub struct KpiBody {
    pub data: Kpi,
}

/// 手动同步响应体
#[derive(Debug, Serialize)]
pub struct SyncBody {
    pub message: String,
    pub timestamp: String,
    pub products_count: usize,
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub google_sheets_connected: bool,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_input_accepts_number_and_text() {
        let req: WithdrawRequest = serde_json::from_str(r#"{"quantity": 4}"#).unwrap();
        assert_eq!(req.quantity.as_i64(), Some(4));
        assert_eq!(req.reason, "");

        let req: WithdrawRequest = serde_json::from_str(r#"{"quantity": " 12 "}"#).unwrap();
        assert_eq!(req.quantity.as_i64(), Some(12));

        let req: WithdrawRequest = serde_json::from_str(r#"{"quantity": "many"}"#).unwrap();
        assert_eq!(req.quantity.as_i64(), None);
    }

    #[test]
    fn test_product_list_counts() {
        let list = ProductList::from(Vec::new());
        assert_eq!(list.count, 0);
    }
}
