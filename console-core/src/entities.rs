//! Core entity structures
//!
//! Every entity is the authoritative record returned by the remote authority.
//! `created_at`/`updated_at` are kept as the raw strings the server sent; the
//! console never interprets them.

use crate::{ChatbotId, ChatbotStatus, MemberId, NamespaceId, RoleId, StaffId, StaffStatus, Timestamp};
use serde::{Deserialize, Serialize};

/// A staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    #[serde(default)]
    pub number: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: StaffStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A deployed chatbot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chatbot {
    pub id: ChatbotId,
    #[serde(default)]
    pub number: String,
    pub name: String,
    pub role: String,
    pub status: ChatbotStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A knowledge namespace with its ordered membership set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub id: NamespaceId,
    #[serde(default)]
    pub number: String,
    pub name: String,
    pub document_title: String,
    #[serde(default)]
    pub members: Vec<Membership>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Namespace {
    /// Whether `member` already belongs to this namespace.
    pub fn has_member(&self, member: &MemberId) -> bool {
        self.members.iter().any(|m| &m.member.id == member)
    }

    pub fn membership(&self, member: &MemberId) -> Option<&Membership> {
        self.members.iter().find(|m| &m.member.id == member)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// A role definition. Level 5 is the highest privilege.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    #[serde(default)]
    pub number: String,
    pub name: String,
    pub level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Non-owning reference to a person held by the external member directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberRef {
    pub id: MemberId,
    pub name: String,
    pub email: String,
}

impl MemberRef {
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Relation record linking a namespace to a member.
///
/// `added_at` orders the list and keys rows; it carries no business meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    #[serde(flatten)]
    pub member: MemberRef,
    #[serde(rename = "addedAt", default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<Timestamp>,
}

impl Membership {
    pub fn new(member: MemberRef, added_at: Timestamp) -> Self {
        Self {
            member,
            added_at: Some(added_at),
        }
    }
}

impl From<MemberRef> for Membership {
    fn from(member: MemberRef) -> Self {
        Self {
            member,
            added_at: None,
        }
    }
}

/// Authenticated operator as reported by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}
