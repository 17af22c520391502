//! 登录数据模型

use serde::{Deserialize, Serialize};

/// 登录请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// 登录成功的用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct LoginBody {
    pub user: AuthenticatedUser,
}
