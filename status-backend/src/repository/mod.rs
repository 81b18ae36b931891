// src/repository/mod.rs

//! データアクセス層
//!
//! リポジトリは状態を持たず、`ConnectionTrait` を実装する任意の接続
//! （プール接続またはトランザクション）に対して同じ呼び出しができる。

pub mod building_repository;
pub mod copro_repository;
pub mod incident_repository;
pub mod maintenance_repository;
pub mod service_instance_repository;
pub mod ticket_repository;
pub mod user_repository;
