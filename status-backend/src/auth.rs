// src/auth.rs

//! 呼び出し元ユーザー
//!
//! 認証そのものは外部の認証コンポーネントが行い、ここでは検証済みの
//! `is_superuser` フラグだけを受け取る。

use crate::error::{AppError, AppResult};
use uuid::Uuid;

/// 認証済みユーザー情報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub is_superuser: bool,
}

impl AuthenticatedUser {
    pub fn new(user_id: Uuid, is_superuser: bool) -> Self {
        Self {
            user_id,
            is_superuser,
        }
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self::new(user_id, true)
    }

    pub fn resident(user_id: Uuid) -> Self {
        Self::new(user_id, false)
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// 管理者かチェック
    pub fn is_admin(&self) -> bool {
        self.is_superuser
    }

    /// 管理者でなければ Forbidden を返す
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.user_id, "Non-admin user attempted an admin operation");
            Err(AppError::Forbidden(
                "Accès réservé aux administrateurs".to_string(),
            ))
        }
    }
}
