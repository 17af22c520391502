//! 请求日志中间件
//!
//! 按库存操作分类记录每个请求，出库请求额外带上行号。

use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

/// 请求对应的库存操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Login,
    ListProducts,
    SearchProducts,
    AddProduct,
    Withdraw(String),
    Kpi,
    Sync,
    Health,
    Other,
}

impl Operation {
    /// 根据方法和路径识别操作
    pub fn classify(method: &Method, path: &str) -> Self {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match (method.as_str(), segments.as_slice()) {
            ("POST", ["api", "auth", "login"]) => Self::Login,
            ("GET", ["api", "products"]) => Self::ListProducts,
            ("POST", ["api", "products", "search"]) => Self::SearchProducts,
            ("POST", ["api", "products", "add"]) => Self::AddProduct,
            ("POST", ["api", "products", id, "withdraw"]) => Self::Withdraw(id.to_string()),
            ("GET", ["api", "kpi"]) => Self::Kpi,
            ("POST", ["api", "sync"]) => Self::Sync,
            ("GET", ["api", "health"]) => Self::Health,
            _ => Self::Other,
        }
    }

    /// 是否会写入表格
    pub fn writes_sheet(&self) -> bool {
        matches!(self, Self::AddProduct | Self::Withdraw(_))
    }

    fn label(&self) -> String {
        match self {
            Self::Login => "登录".to_string(),
            Self::ListProducts => "产品列表".to_string(),
            Self::SearchProducts => "产品搜索".to_string(),
            Self::AddProduct => "新增产品".to_string(),
            Self::Withdraw(id) => format!("出库 第 {} 行", id),
            Self::Kpi => "KPI".to_string(),
            Self::Sync => "同步".to_string(),
            Self::Health => "健康检查".to_string(),
            Self::Other => "其他".to_string(),
        }
    }
}

/// 服务端错误，或被拒绝的写操作，按 warn 记录
fn needs_attention(operation: &Operation, status: StatusCode) -> bool {
    status.is_server_error() || (operation.writes_sheet() && status.is_client_error())
}

/// 请求日志中间件
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let operation = Operation::classify(req.method(), req.uri().path());
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis();

    if needs_attention(&operation, status) {
        warn!(
            "[{}] {} {} - {} - {}ms",
            operation.label(),
            method,
            uri,
            status,
            elapsed_ms
        );
    } else {
        info!(
            "[{}] {} {} - {} - {}ms",
            operation.label(),
            method,
            uri,
            status,
            elapsed_ms
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_inventory_routes() {
        assert_eq!(
            Operation::classify(&Method::POST, "/api/products/7/withdraw"),
            Operation::Withdraw("7".to_string())
        );
        assert_eq!(
            Operation::classify(&Method::GET, "/api/products"),
            Operation::ListProducts
        );
        assert_eq!(
            Operation::classify(&Method::POST, "/api/products/add"),
            Operation::AddProduct
        );
        assert_eq!(
            Operation::classify(&Method::GET, "/api/health"),
            Operation::Health
        );
        assert_eq!(
            Operation::classify(&Method::GET, "/api/products/add"),
            Operation::Other
        );
    }

    #[test]
    fn test_rejected_writes_are_warned() {
        let withdraw = Operation::Withdraw("2".to_string());
        assert!(needs_attention(&withdraw, StatusCode::BAD_REQUEST));
        assert!(!needs_attention(&withdraw, StatusCode::OK));
        assert!(!needs_attention(&Operation::Login, StatusCode::UNAUTHORIZED));
        assert!(needs_attention(
            &Operation::Health,
            StatusCode::SERVICE_UNAVAILABLE
        ));
        assert_eq!(withdraw.label(), "出库 第 2 行");
    }
}
