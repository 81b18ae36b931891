// src/dto/mod.rs

//! サービス層の入出力型
//!
//! 入力 DTO は `validator` で検証し、出力 DTO はエンティティから変換する。

pub mod building_dto;
pub mod copro_dto;
pub mod equipment_dto;
pub mod incident_dto;
pub mod maintenance_dto;
pub mod statistics_dto;
pub mod status_dto;
pub mod ticket_dto;
pub mod user_dto;
