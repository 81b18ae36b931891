// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// テナント・建物・ユーザー
mod m20250801_000001_create_copros_table;
mod m20250801_000002_create_buildings_table;
mod m20250801_000003_create_users_table;

// 設備
mod m20250801_000004_create_service_instances_table;

// インシデント関連（本体・設備リンク・更新履歴・コメント）
mod m20250801_000005_create_incidents_tables;

// チケット関連
mod m20250801_000006_create_tickets_tables;

// メンテナンス関連
mod m20250801_000007_create_maintenances_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 依存関係のないテーブル
            Box::new(m20250801_000001_create_copros_table::Migration),
            // 2. copros に依存するテーブル
            Box::new(m20250801_000002_create_buildings_table::Migration),
            Box::new(m20250801_000003_create_users_table::Migration),
            Box::new(m20250801_000004_create_service_instances_table::Migration),
            // 3. 設備・ユーザーに依存するテーブル
            Box::new(m20250801_000005_create_incidents_tables::Migration),
            Box::new(m20250801_000006_create_tickets_tables::Migration),
            Box::new(m20250801_000007_create_maintenances_tables::Migration),
        ]
    }
}
