//! 库存处理器

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use tracing::error;

use super::model::{
    AddProductRequest, HealthResponse, KpiBody, ProductList, ProductQuery, SearchRequest,
    SyncBody, WithdrawRequest,
};
use crate::app::AppState;
use crate::core::error::CoreError;
use crate::core::response::{ApiResponse, AppJson, AppPath, MessageBody};

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductQuery>,
) -> Json<ApiResponse<ProductList>> {
    let products = state.inventory.list(&params).await;
    Json(ApiResponse::success(products.into()))
}

pub async fn search_products(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SearchRequest>,
) -> Json<ApiResponse<ProductList>> {
    let products = state.inventory.search(&payload.search).await;
    Json(ApiResponse::success(products.into()))
}

pub async fn add_product(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AddProductRequest>,
) -> Result<Json<ApiResponse<MessageBody>>, CoreError> {
    state.inventory.add_product(payload).await?;
    Ok(Json(ApiResponse::success(MessageBody::new(
        "Product added successfully",
    ))))
}

pub async fn withdraw_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<u32>,
    AppJson(payload): AppJson<WithdrawRequest>,
) -> Result<Json<ApiResponse<MessageBody>>, CoreError> {
    let amount = state.inventory.withdraw(id, &payload).await?;
    Ok(Json(ApiResponse::success(MessageBody::new(format!(
        "Successfully withdrew {} units",
        amount
    )))))
}

pub async fn get_kpi(State(state): State<AppState>) -> Json<ApiResponse<KpiBody>> {
    let data = state.inventory.kpi().await;
    Json(ApiResponse::success(KpiBody { data }))
}

pub async fn sync_data(State(state): State<AppState>) -> Json<ApiResponse<SyncBody>> {
    let products_count = state.inventory.sync().await;
    Json(ApiResponse::success(SyncBody {
        message: "Data synchronized successfully".to_string(),
        timestamp: chrono::Local::now().to_rfc3339(),
        products_count,
    }))
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let timestamp = chrono::Local::now().to_rfc3339();

    match state.inventory.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                success: true,
                google_sheets_connected: true,
                timestamp,
                error: None,
            }),
        ),
        Err(e) => {
            error!("健康检查失败: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    success: false,
                    google_sheets_connected: false,
                    timestamp,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
