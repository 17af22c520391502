//! 核心响应处理模块

use axum::extract::{FromRequest, FromRequestParts};
use serde::Serialize;

use super::error::CoreError;

/// API 响应结构
///
/// 所有成功响应都带 `success: true`，其余字段由 `body` 平铺到顶层。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T> ApiResponse<T> {
    pub fn success(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}

/// 只包含提示信息的响应体
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// JSON 请求体提取器，解析失败时返回统一的 JSON 错误
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(CoreError))]
pub struct AppJson<T>(pub T);

/// 路径参数提取器
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(CoreError))]
pub struct AppPath<T>(pub T);
