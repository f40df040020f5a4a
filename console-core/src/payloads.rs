//! Create and update payloads.
//!
//! Create flows send a `*Draft` with every required field populated; edit
//! flows send a `*Patch` carrying only the fields that changed.

use crate::{ChatbotStatus, ConsoleError, ConsoleResult, StaffStatus};
use serde::{Deserialize, Serialize};

/// Lowest and highest assignable role level.
pub const ROLE_LEVEL_MIN: u8 = 1;
pub const ROLE_LEVEL_MAX: u8 = 5;

/// Payload for a create request.
pub trait DraftPayload: Serialize + Send + Sync {
    /// Reject incomplete drafts before they reach the gateway.
    fn validate(&self) -> ConsoleResult<()>;
}

/// Payload for a partial update request.
pub trait PatchPayload: Serialize + Send + Sync {
    /// Reject malformed changes before they reach the gateway.
    fn validate(&self) -> ConsoleResult<()>;

    /// True when the patch carries no changes at all.
    fn is_empty(&self) -> bool;
}

fn require_text(field: &str, value: &str) -> ConsoleResult<()> {
    if value.trim().is_empty() {
        return Err(ConsoleError::validation(field, "must not be blank"));
    }
    Ok(())
}

fn require_email(value: &str) -> ConsoleResult<()> {
    require_text("email", value)?;
    if !value.contains('@') {
        return Err(ConsoleError::validation("email", "must contain '@'"));
    }
    Ok(())
}

fn require_level(level: u8) -> ConsoleResult<()> {
    if !(ROLE_LEVEL_MIN..=ROLE_LEVEL_MAX).contains(&level) {
        return Err(ConsoleError::validation(
            "level",
            format!("must be between {ROLE_LEVEL_MIN} and {ROLE_LEVEL_MAX}"),
        ));
    }
    Ok(())
}

fn optional<T>(value: Option<&T>, check: impl FnOnce(&T) -> ConsoleResult<()>) -> ConsoleResult<()> {
    value.map_or(Ok(()), check)
}

// ============================================================================
// STAFF
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffDraft {
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: StaffStatus,
}

impl DraftPayload for StaffDraft {
    fn validate(&self) -> ConsoleResult<()> {
        require_text("name", &self.name)?;
        require_email(&self.email)?;
        require_text("role", &self.role)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StaffStatus>,
}

impl PatchPayload for StaffPatch {
    fn validate(&self) -> ConsoleResult<()> {
        optional(self.name.as_ref(), |v| require_text("name", v))?;
        optional(self.email.as_ref(), |v| require_email(v))?;
        optional(self.role.as_ref(), |v| require_text("role", v))
    }

    fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.role.is_none() && self.status.is_none()
    }
}

// ============================================================================
// CHATBOT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatbotDraft {
    pub name: String,
    pub role: String,
    pub status: ChatbotStatus,
}

impl DraftPayload for ChatbotDraft {
    fn validate(&self) -> ConsoleResult<()> {
        require_text("name", &self.name)?;
        require_text("role", &self.role)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatbotPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ChatbotStatus>,
}

impl PatchPayload for ChatbotPatch {
    fn validate(&self) -> ConsoleResult<()> {
        optional(self.name.as_ref(), |v| require_text("name", v))?;
        optional(self.role.as_ref(), |v| require_text("role", v))
    }

    fn is_empty(&self) -> bool {
        self.name.is_none() && self.role.is_none() && self.status.is_none()
    }
}

// ============================================================================
// NAMESPACE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceDraft {
    pub name: String,
    pub document_title: String,
}

impl DraftPayload for NamespaceDraft {
    fn validate(&self) -> ConsoleResult<()> {
        require_text("name", &self.name)?;
        require_text("document_title", &self.document_title)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespacePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_title: Option<String>,
}

impl PatchPayload for NamespacePatch {
    fn validate(&self) -> ConsoleResult<()> {
        optional(self.name.as_ref(), |v| require_text("name", v))?;
        optional(self.document_title.as_ref(), |v| require_text("document_title", v))
    }

    fn is_empty(&self) -> bool {
        self.name.is_none() && self.document_title.is_none()
    }
}

// ============================================================================
// ROLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDraft {
    pub name: String,
    pub level: u8,
}

impl DraftPayload for RoleDraft {
    fn validate(&self) -> ConsoleResult<()> {
        require_text("name", &self.name)?;
        require_level(self.level)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

impl PatchPayload for RolePatch {
    fn validate(&self) -> ConsoleResult<()> {
        optional(self.name.as_ref(), |v| require_text("name", v))?;
        optional(self.level.as_ref(), |v| require_level(*v))
    }

    fn is_empty(&self) -> bool {
        self.name.is_none() && self.level.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_draft_requires_email_shape() {
        let draft = StaffDraft {
            name: "John Doe".to_string(),
            email: "john.example.com".to_string(),
            role: "Manager".to_string(),
            status: StaffStatus::Active,
        };
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, ConsoleError::ValidationRequired { ref field, .. } if field == "email"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let draft = ChatbotDraft {
            name: "  ".to_string(),
            role: "Sales".to_string(),
            status: ChatbotStatus::Online,
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_role_level_bounds() {
        let ok = RoleDraft {
            name: "Admin".to_string(),
            level: 5,
        };
        assert!(ok.validate().is_ok());
        let too_high = RoleDraft {
            name: "Root".to_string(),
            level: 6,
        };
        assert!(too_high.validate().is_err());
        let patch = RolePatch {
            name: None,
            level: Some(0),
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_patch_serializes_only_changed_fields() {
        let patch = ChatbotPatch {
            name: Some("Support Bot".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "name": "Support Bot" }));
    }

    #[test]
    fn test_empty_patch_detection() {
        assert!(NamespacePatch::default().is_empty());
        assert!(!NamespacePatch {
            name: None,
            document_title: Some("Playbook".to_string()),
        }
        .is_empty());
        assert!(StaffPatch::default().is_empty());
        assert!(!StaffPatch {
            status: Some(StaffStatus::Inactive),
            ..Default::default()
        }
        .is_empty());
    }
}
