// src/utils/transaction.rs

//! トランザクション管理
//!
//! サービスの各操作は 1 つのトランザクション内で実行する。リトライは行わず、
//! 失敗はロールバックしてそのまま呼び出し元へ返す。

use crate::error::AppError;
use crate::utils::error_helper::internal_server_error;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::future::Future;
use tracing::{debug, error, info_span, warn, Instrument};

/// Boxed Future
pub type BoxFuture<'a, T> = std::pin::Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// トランザクション実行を抽象化するトレイト
pub trait TransactionManager {
    /// `label` はログとスパンに出す操作名（例: "incident.create"）
    fn execute_in_transaction<F, R>(
        &self,
        label: &'static str,
        operation: F,
    ) -> impl Future<Output = Result<R, AppError>> + Send
    where
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, Result<R, AppError>>
            + Send
            + 'static,
        R: Send + 'static;
}

impl TransactionManager for DatabaseConnection {
    fn execute_in_transaction<F, R>(
        &self,
        label: &'static str,
        operation: F,
    ) -> impl Future<Output = Result<R, AppError>> + Send
    where
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, Result<R, AppError>>
            + Send
            + 'static,
        R: Send + 'static,
    {
        let span = info_span!("database_transaction", operation = label);

        async move {
            let started = std::time::Instant::now();

            let txn = self.begin().await.map_err(|e| {
                internal_server_error(e, label, "Impossible de démarrer la transaction")
            })?;

            match operation(&txn).await {
                Ok(value) => {
                    txn.commit().await.map_err(|e| {
                        internal_server_error(e, label, "Impossible de valider la transaction")
                    })?;

                    debug!(
                        duration_ms = started.elapsed().as_millis() as u64,
                        "Transaction committed"
                    );
                    Ok(value)
                }
                Err(app_error) => {
                    // 業務エラー（検証、競合など）でもロールバックしてから返す
                    if let Err(rollback_error) = txn.rollback().await {
                        error!(
                            original_error = %app_error,
                            rollback_error = %rollback_error,
                            "Failed to rollback transaction"
                        );
                        return Err(AppError::InternalServerError(
                            "Échec de la transaction et de son annulation".to_string(),
                        ));
                    }

                    warn!(
                        error_type = app_error.error_type(),
                        error = %app_error,
                        duration_ms = started.elapsed().as_millis() as u64,
                        "Transaction rolled back"
                    );
                    Err(app_error)
                }
            }
        }
        .instrument(span)
    }
}

/// トランザクション内での操作を簡単に記述するマクロ
///
/// ```ignore
/// let incident = with_transaction!(db, "incident.get", |txn| async move {
///     IncidentRepository::find_in_copro(txn, copro_id, id).await
/// })?;
/// ```
#[macro_export]
macro_rules! with_transaction {
    ($db:expr, $label:expr, |$txn:ident| $body:expr) => {{
        use $crate::utils::transaction::TransactionManager;

        $db.execute_in_transaction($label, move |$txn| Box::pin($body))
            .await
    }};
}
