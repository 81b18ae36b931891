// src/domain/service_status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 設備の稼働状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Operational,
    Degraded,
    PartialOutage,
    MajorOutage,
    Maintenance,
}

impl ServiceStatus {
    /// 文字列から ServiceStatus に変換（完全一致のみ）
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "operational" => Some(Self::Operational),
            "degraded" => Some(Self::Degraded),
            "partial_outage" => Some(Self::PartialOutage),
            "major_outage" => Some(Self::MajorOutage),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::Degraded => "degraded",
            Self::PartialOutage => "partial_outage",
            Self::MajorOutage => "major_outage",
            Self::Maintenance => "maintenance",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::Operational,
            Self::Degraded,
            Self::PartialOutage,
            Self::MajorOutage,
            Self::Maintenance,
        ]
    }

    /// 全体ステータス集計での重み（大きいほど深刻）
    ///
    /// major_outage > partial_outage > degraded > maintenance > operational
    pub fn severity(&self) -> u8 {
        match self {
            Self::Operational => 0,
            Self::Maintenance => 1,
            Self::Degraded => 2,
            Self::PartialOutage => 3,
            Self::MajorOutage => 4,
        }
    }

    /// インシデント作成時に設備へ設定できるか（operational は不可）
    pub fn is_incident_status(&self) -> bool {
        !matches!(self, Self::Operational)
    }
}

impl Default for ServiceStatus {
    fn default() -> Self {
        Self::Operational
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ServiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| {
            format!(
                "Statut invalide: '{}'. Valeurs acceptées: {}",
                s,
                Self::all()
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

impl From<ServiceStatus> for String {
    fn from(status: ServiceStatus) -> Self {
        status.as_str().to_string()
    }
}

impl TryFrom<&str> for ServiceStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
