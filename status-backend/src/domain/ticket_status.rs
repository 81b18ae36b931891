// src/domain/ticket_status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// チケットの状態（遷移制約なし）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Analyzing,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "analyzing" => Some(Self::Analyzing),
            "in_progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analyzing => "analyzing",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Analyzing, Self::InProgress, Self::Resolved, Self::Closed]
    }
}

impl Default for TicketStatus {
    fn default() -> Self {
        Self::Analyzing
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| {
            format!(
                "Statut de ticket invalide: '{}'. Valeurs acceptées: {}",
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

/// チケット種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    /// 設備の不具合（設備の指定が必須）
    Incident,
    /// 一般的な依頼
    Request,
}

impl TicketType {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "incident" => Some(Self::Incident),
            "request" => Some(Self::Request),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incident => "incident",
            Self::Request => "request",
        }
    }

    pub fn requires_equipment(&self) -> bool {
        matches!(self, Self::Incident)
    }
}

impl Default for TicketType {
    fn default() -> Self {
        Self::Incident
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TicketType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| {
            format!(
                "Type de ticket invalide: '{}'. Valeurs acceptées: incident, request",
                s
            )
        })
    }
}
