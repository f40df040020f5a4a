//! Admin Console Test Utilities
//!
//! Shared test infrastructure for the console workspace:
//! - An in-memory gateway with failure injection and call recording
//! - Proptest generators for every entity, draft, and patch type
//! - Fixtures mirroring the console's sample data

mod mock;

pub mod fixtures;
pub mod generators;

pub use mock::{MockCall, MockGateway, MockResource, MockState};

// Re-export core types for convenience
pub use console_core::{
    Chatbot, ChatbotDraft, ChatbotId, ChatbotPatch, ChatbotStatus, ConsoleError, ConsoleResult,
    EntityIdType, MemberId, MemberRef, Membership, Namespace, NamespaceDraft, NamespaceId,
    NamespacePatch, Resource, ResourceKind, Role, RoleDraft, RoleId, RolePatch, Staff, StaffDraft,
    StaffId, StaffPatch, StaffStatus, Timestamp,
};
