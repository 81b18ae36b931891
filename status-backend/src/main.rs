// src/main.rs
use chrono::Utc;
use status_backend::config::AppConfig;
use status_backend::db::{create_db_pool, run_migrations};
use status_backend::logging::init_tracing;
use status_backend::service::copro_service::CoproService;
use status_backend::service::status_service::StatusService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 設定を読み込む
    let app_config = AppConfig::from_env()?;

    // トレーシングの設定
    init_tracing(app_config.log_filter.as_deref());
    tracing::info!(
        environment = %app_config.environment,
        "Starting status backend..."
    );

    // データベース接続を作成
    let db_pool = create_db_pool(&app_config.database).await?;
    tracing::info!("Database connection established");

    // マイグレーションを適用
    run_migrations(&db_pool).await?;
    tracing::info!("Migrations applied");

    // 有効なコプロはここで一度だけ解決し、以降は ID を明示的に渡す
    let copro_id = CoproService::new(db_pool.clone())
        .find_active()
        .await?
        .map(|copro| copro.id);
    if copro_id.is_none() {
        tracing::warn!("No active copro configured, status page will be empty");
    }

    let page = StatusService::new(db_pool)
        .status_page(copro_id, Utc::now())
        .await?;

    tracing::info!(
        overall_status = %page.overall_status,
        services = page.services.len(),
        incidents = page.incidents.len(),
        maintenances = page.maintenances.len(),
        "Status page computed"
    );
    println!("{}", serde_json::to_string_pretty(&page)?);

    Ok(())
}
