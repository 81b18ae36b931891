// src/error.rs

use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Multiple validation errors: {}", .0.join(", "))]
    ValidationErrors(Vec<String>),

    #[error("Validation failed")]
    ValidationFailure(#[from] ValidationErrors),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// API 層がステータスコードへ対応付けるためのエラー種別
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::DbErr(DbErr::RecordNotFound(_)) => "not_found",
            AppError::DbErr(_) => "database_error",
            AppError::NotFound(_) => "not_found",
            AppError::ValidationError(_) => "validation_error",
            AppError::ValidationErrors(_) | AppError::ValidationFailure(_) => "validation_errors",
            AppError::Forbidden(_) => "forbidden",
            AppError::Conflict(_) => "conflict",
            AppError::InternalServerError(_) => "internal_server_error",
        }
    }

    /// バリデーション系エラーかどうか
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::ValidationError(_)
                | AppError::ValidationErrors(_)
                | AppError::ValidationFailure(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
