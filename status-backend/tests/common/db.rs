//! インメモリ SQLite を使うテスト用データベース

use status_backend::config::AppConfig;
use status_backend::db::{create_db_pool, run_migrations, DbPool};

pub struct TestDatabase {
    pub connection: DbPool,
}

impl TestDatabase {
    /// テストごとに独立した DB を作成し、マイグレーションを適用する
    pub async fn new() -> Self {
        super::init_test_env();

        let config = AppConfig::for_testing();
        let connection = create_db_pool(&config.database)
            .await
            .expect("connect to in-memory sqlite");

        run_migrations(&connection)
            .await
            .expect("run migrations");

        Self { connection }
    }

    pub fn pool(&self) -> DbPool {
        self.connection.clone()
    }
}
