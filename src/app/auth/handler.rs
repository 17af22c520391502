//! 登录处理器

use axum::{extract::State, response::Json};

use super::model::{LoginBody, LoginRequest};
use crate::app::AppState;
use crate::core::error::CoreError;
use crate::core::response::{ApiResponse, AppJson};

pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginBody>>, CoreError> {
    let user = state.auth.login(&payload.username, &payload.password)?;
    Ok(Json(ApiResponse::success(LoginBody { user })))
}
