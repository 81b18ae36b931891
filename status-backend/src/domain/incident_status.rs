// src/domain/incident_status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// インシデントの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Investigating,
    InProgress,
    Resolved,
    Closed,
    Scheduled,
}

impl IncidentStatus {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "investigating" => Some(Self::Investigating),
            "in_progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            "closed" => Some(Self::Closed),
            "scheduled" => Some(Self::Scheduled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Investigating => "investigating",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
            Self::Scheduled => "scheduled",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::Investigating,
            Self::InProgress,
            Self::Resolved,
            Self::Closed,
            Self::Scheduled,
        ]
    }

    /// 遷移表に明示されている遷移先
    ///
    /// `closed` にはエントリがない。エントリがない状態からは scheduled 以外の
    /// 4 状態すべてへ遷移できる（closed は実質的に終端ではない）。
    pub fn declared_transitions(&self) -> Option<&'static [IncidentStatus]> {
        match self {
            Self::Investigating => Some(&[Self::InProgress, Self::Resolved, Self::Closed]),
            Self::InProgress => Some(&[Self::Resolved, Self::Closed, Self::Investigating]),
            Self::Resolved => Some(&[Self::Closed, Self::InProgress]),
            Self::Scheduled => Some(&[
                Self::Investigating,
                Self::InProgress,
                Self::Resolved,
                Self::Closed,
            ]),
            Self::Closed => None,
        }
    }

    /// 有効なステータス遷移かチェック
    pub fn can_transition_to(&self, new_status: Self) -> bool {
        if *self == new_status {
            return true;
        }

        match self.declared_transitions() {
            Some(targets) => targets.contains(&new_status),
            None => new_status != Self::Scheduled,
        }
    }

    /// resolved_at を記録すべき状態か
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

impl Default for IncidentStatus {
    fn default() -> Self {
        Self::Investigating
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for IncidentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| {
            format!(
                "Statut d'incident invalide: '{}'. Valeurs acceptées: {}",
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

impl From<IncidentStatus> for String {
    fn from(status: IncidentStatus) -> Self {
        status.as_str().to_string()
    }
}
