//! Enum types for console entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// RESOURCE KINDS
// ============================================================================

/// Resource type discriminator. Each kind owns its REST paths and numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Staff,
    Chatbot,
    Namespace,
    Role,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Staff,
        ResourceKind::Chatbot,
        ResourceKind::Namespace,
        ResourceKind::Role,
    ];

    /// Path of the collection listing endpoint.
    pub fn list_path(&self) -> &'static str {
        match self {
            ResourceKind::Staff => "/staff_all",
            ResourceKind::Chatbot => "/chatbots",
            ResourceKind::Namespace => "/namespaces",
            ResourceKind::Role => "/roles",
        }
    }

    /// Base path for create and per-item endpoints.
    pub fn base_path(&self) -> &'static str {
        match self {
            ResourceKind::Staff => "/staff",
            ResourceKind::Chatbot => "/chatbots",
            ResourceKind::Namespace => "/namespaces",
            ResourceKind::Role => "/roles",
        }
    }

    /// Prefix of the human-readable sequential number.
    pub fn number_prefix(&self) -> &'static str {
        match self {
            ResourceKind::Staff => "",
            ResourceKind::Chatbot => "BOT",
            ResourceKind::Namespace => "NS",
            ResourceKind::Role => "ROLE",
        }
    }

    /// Zero-padding width of the sequential number.
    pub fn number_width(&self) -> usize {
        3
    }

    /// Human label used in notifications ("Chatbot Added").
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Staff => "Staff",
            ResourceKind::Chatbot => "Chatbot",
            ResourceKind::Namespace => "Namespace",
            ResourceKind::Role => "Role",
        }
    }

    /// Lower-case noun used in notification bodies.
    pub fn noun(&self) -> &'static str {
        match self {
            ResourceKind::Staff => "staff member",
            ResourceKind::Chatbot => "chatbot",
            ResourceKind::Namespace => "namespace",
            ResourceKind::Role => "role",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// STATUS ENUMS
// ============================================================================

/// Employment status of a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StaffStatus {
    #[default]
    Active,
    Inactive,
}

impl StaffStatus {
    pub const ALL: [StaffStatus; 2] = [StaffStatus::Active, StaffStatus::Inactive];

    pub fn as_str(&self) -> &'static str {
        match self {
            StaffStatus::Active => "Active",
            StaffStatus::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for StaffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(StaffStatus::Active),
            "inactive" => Ok(StaffStatus::Inactive),
            _ => Err(StatusParseError {
                kind: ResourceKind::Staff,
                value: s.to_string(),
            }),
        }
    }
}

/// Operational status of a chatbot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChatbotStatus {
    #[default]
    Online,
    Offline,
    Maintenance,
}

impl ChatbotStatus {
    pub const ALL: [ChatbotStatus; 3] = [
        ChatbotStatus::Online,
        ChatbotStatus::Offline,
        ChatbotStatus::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatbotStatus::Online => "Online",
            ChatbotStatus::Offline => "Offline",
            ChatbotStatus::Maintenance => "Maintenance",
        }
    }
}

impl fmt::Display for ChatbotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatbotStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "online" => Ok(ChatbotStatus::Online),
            "offline" => Ok(ChatbotStatus::Offline),
            "maintenance" => Ok(ChatbotStatus::Maintenance),
            _ => Err(StatusParseError {
                kind: ResourceKind::Chatbot,
                value: s.to_string(),
            }),
        }
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusParseError {
    pub kind: ResourceKind,
    pub value: String,
}

impl fmt::Display for StatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {} status: {}", self.kind.noun(), self.value)
    }
}

impl std::error::Error for StatusParseError {}
