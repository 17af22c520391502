//! 登录服务
//!
//! 只做静态账号比对，不是安全机制。

use std::sync::Arc;
use tracing::{info, warn};

use super::model::AuthenticatedUser;
use crate::config::UserEntry;
use crate::core::error::CoreError;

/// 用户存储
pub trait UserStore: Send + Sync {
    /// 账号密码匹配时返回用户信息
    fn verify(&self, username: &str, password: &str) -> Option<AuthenticatedUser>;
}

/// 由配置文件提供的用户列表
pub struct ConfigUserStore {
    users: Vec<UserEntry>,
}

impl ConfigUserStore {
    pub fn new(users: Vec<UserEntry>) -> Self {
        Self { users }
    }
}

impl UserStore for ConfigUserStore {
    fn verify(&self, username: &str, password: &str) -> Option<AuthenticatedUser> {
        self.users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .map(|u| AuthenticatedUser {
                username: u.username.clone(),
                role: u.role.clone(),
            })
    }
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<AuthenticatedUser, CoreError> {
        match self.store.verify(username, password) {
            Some(user) => {
                info!("用户登录成功: {} ({})", user.username, user.role);
                Ok(user)
            }
            None => {
                warn!("用户登录失败: {}", username);
                Err(CoreError::Unauthorized("Invalid credentials".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        let store = ConfigUserStore::new(vec![
            UserEntry {
                username: "alice".to_string(),
                password: "secret".to_string(),
                role: "admin".to_string(),
            },
            UserEntry {
                username: "CMES".to_string(),
                password: "12345".to_string(),
                role: "guest".to_string(),
            },
        ]);
        AuthService::new(Arc::new(store))
    }

    #[test]
    fn test_login_success_returns_role() {
        let user = service().login("CMES", "12345").unwrap();
        assert_eq!(user.role, "guest");

        let user = service().login("alice", "secret").unwrap();
        assert_eq!(user.role, "admin");
    }

    #[test]
    fn test_login_failure() {
        assert!(matches!(
            service().login("alice", "wrong"),
            Err(CoreError::Unauthorized(_))
        ));
        assert!(matches!(
            service().login("", ""),
            Err(CoreError::Unauthorized(_))
        ));
    }
}
