// src/config/app.rs

use dotenvy::dotenv;
use std::env;

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub sqlx_logging: bool,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: String,
    pub database: DatabaseConfig,
    /// tracing の EnvFilter。未設定ならデフォルトのフィルタを使う
    pub log_filter: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok(); // .env ファイルを読み込む (存在しなくてもエラーにしない)

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let is_development = environment == "development";

        Ok(Self {
            environment,
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
                max_connections: parse_var("DB_MAX_CONNECTIONS", 10)?,
                min_connections: parse_var("DB_MIN_CONNECTIONS", 1)?,
                connect_timeout_secs: parse_var("DB_CONNECT_TIMEOUT_SECS", 8)?,
                sqlx_logging: is_development,
            },
            log_filter: env::var("RUST_LOG").ok(),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_test(&self) -> bool {
        self.environment == "test"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// テスト用の設定を作成（インメモリ SQLite）
    pub fn for_testing() -> Self {
        Self {
            environment: "test".to_string(),
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                // インメモリ DB は接続ごとに別物になるため 1 本に固定する
                max_connections: 1,
                min_connections: 1,
                connect_timeout_secs: 8,
                sqlx_logging: false,
            },
            log_filter: None,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("Invalid {} value: '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}
