//! Proptest strategies for console entity, draft, and patch types.

use console_core::{
    Chatbot, ChatbotDraft, ChatbotId, ChatbotPatch, ChatbotStatus, MemberId, MemberRef,
    Membership, Namespace, NamespaceDraft, NamespaceId, NamespacePatch, Role, RoleDraft, RoleId,
    RolePatch, Staff, StaffDraft, StaffId, StaffPatch, StaffStatus, Timestamp, ROLE_LEVEL_MAX,
    ROLE_LEVEL_MIN,
};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::HashSet;

// === Primitive Generators ===

/// Non-blank display name.
pub fn arb_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,10}( [A-Z][a-z]{2,10})?"
}

pub fn arb_email() -> impl Strategy<Value = String> {
    "[a-z]{3,8}\\.[a-z]{3,8}@[a-z]{4,8}\\.com"
}

pub fn arb_id() -> impl Strategy<Value = String> {
    "[a-z0-9]{6,12}"
}

/// Generate a Timestamp (DateTime<Utc>).
pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
    // 2020-2030
    (1577836800i64..1893456000i64)
        .prop_map(|secs| chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(chrono::Utc::now))
}

// === Enum Generators ===

pub fn arb_staff_status() -> impl Strategy<Value = StaffStatus> {
    prop::sample::select(StaffStatus::ALL.to_vec())
}

pub fn arb_chatbot_status() -> impl Strategy<Value = ChatbotStatus> {
    prop::sample::select(ChatbotStatus::ALL.to_vec())
}

pub fn arb_role_level() -> impl Strategy<Value = u8> {
    ROLE_LEVEL_MIN..=ROLE_LEVEL_MAX
}

// === Draft Generators ===

pub fn arb_staff_draft() -> impl Strategy<Value = StaffDraft> {
    (arb_name(), arb_email(), arb_name(), arb_staff_status()).prop_map(|(name, email, role, status)| {
        StaffDraft {
            name,
            email,
            role,
            status,
        }
    })
}

pub fn arb_chatbot_draft() -> impl Strategy<Value = ChatbotDraft> {
    (arb_name(), arb_name(), arb_chatbot_status())
        .prop_map(|(name, role, status)| ChatbotDraft { name, role, status })
}

pub fn arb_namespace_draft() -> impl Strategy<Value = NamespaceDraft> {
    (arb_name(), arb_name()).prop_map(|(name, document_title)| NamespaceDraft {
        name,
        document_title,
    })
}

pub fn arb_role_draft() -> impl Strategy<Value = RoleDraft> {
    (arb_name(), arb_role_level()).prop_map(|(name, level)| RoleDraft { name, level })
}

// === Patch Generators ===
// Every generated patch changes at least one field.

pub fn arb_staff_patch() -> impl Strategy<Value = StaffPatch> {
    (
        prop::option::of(arb_name()),
        prop::option::of(arb_email()),
        prop::option::of(arb_name()),
        prop::option::of(arb_staff_status()),
    )
        .prop_map(|(name, email, role, status)| StaffPatch {
            name,
            email,
            role,
            status,
        })
        .prop_filter("patch must change a field", |p| {
            p.name.is_some() || p.email.is_some() || p.role.is_some() || p.status.is_some()
        })
}

pub fn arb_chatbot_patch() -> impl Strategy<Value = ChatbotPatch> {
    (
        prop::option::of(arb_name()),
        prop::option::of(arb_name()),
        prop::option::of(arb_chatbot_status()),
    )
        .prop_map(|(name, role, status)| ChatbotPatch { name, role, status })
        .prop_filter("patch must change a field", |p| {
            p.name.is_some() || p.role.is_some() || p.status.is_some()
        })
}

pub fn arb_namespace_patch() -> impl Strategy<Value = NamespacePatch> {
    (prop::option::of(arb_name()), prop::option::of(arb_name()))
        .prop_map(|(name, document_title)| NamespacePatch {
            name,
            document_title,
        })
        .prop_filter("patch must change a field", |p| {
            p.name.is_some() || p.document_title.is_some()
        })
}

pub fn arb_role_patch() -> impl Strategy<Value = RolePatch> {
    (prop::option::of(arb_name()), prop::option::of(arb_role_level()))
        .prop_map(|(name, level)| RolePatch { name, level })
        .prop_filter("patch must change a field", |p| p.name.is_some() || p.level.is_some())
}

// === Entity Generators ===

pub fn arb_member_ref() -> impl Strategy<Value = MemberRef> {
    (arb_id(), arb_name(), arb_email()).prop_map(|(id, name, email)| MemberRef {
        id: MemberId::new(id),
        name,
        email,
    })
}

/// Directory of members with distinct ids.
pub fn arb_directory(max: usize) -> impl Strategy<Value = Vec<MemberRef>> {
    vec(arb_member_ref(), 1..=max).prop_map(|members| {
        let mut seen = HashSet::new();
        members
            .into_iter()
            .filter(|m| seen.insert(m.id.clone()))
            .collect()
    })
}

pub fn arb_staff() -> impl Strategy<Value = Staff> {
    (arb_id(), arb_staff_draft()).prop_map(|(id, draft)| Staff {
        id: StaffId::new(id),
        number: String::new(),
        name: draft.name,
        email: draft.email,
        role: draft.role,
        status: draft.status,
        created_at: None,
        updated_at: None,
    })
}

pub fn arb_chatbot() -> impl Strategy<Value = Chatbot> {
    (arb_id(), arb_chatbot_draft()).prop_map(|(id, draft)| Chatbot {
        id: ChatbotId::new(id),
        number: String::new(),
        name: draft.name,
        role: draft.role,
        status: draft.status,
        created_at: None,
        updated_at: None,
    })
}

pub fn arb_role() -> impl Strategy<Value = Role> {
    (arb_id(), arb_role_draft()).prop_map(|(id, draft)| Role {
        id: RoleId::new(id),
        number: String::new(),
        name: draft.name,
        level: draft.level,
        created_at: None,
        updated_at: None,
    })
}

/// Namespace whose members are a subset of `directory`, each stamped in
/// increasing time order.
pub fn arb_namespace_from(directory: Vec<MemberRef>) -> impl Strategy<Value = Namespace> {
    let size = directory.len();
    (
        arb_id(),
        arb_namespace_draft(),
        prop::sample::subsequence(directory, 0..=size),
        arb_timestamp(),
    )
        .prop_map(|(id, draft, members, start)| Namespace {
            id: NamespaceId::new(id),
            number: String::new(),
            name: draft.name,
            document_title: draft.document_title,
            members: members
                .into_iter()
                .enumerate()
                .map(|(i, m)| Membership::new(m, start + chrono::Duration::seconds(i as i64)))
                .collect(),
            created_at: None,
            updated_at: None,
        })
}

/// Collection with distinct ids in generation order.
pub fn arb_chatbots(max: usize) -> impl Strategy<Value = Vec<Chatbot>> {
    vec(arb_chatbot(), 0..=max).prop_map(|items| {
        let mut seen = HashSet::new();
        items
            .into_iter()
            .filter(|c| seen.insert(c.id.clone()))
            .collect()
    })
}

pub fn arb_roles(max: usize) -> impl Strategy<Value = Vec<Role>> {
    vec(arb_role(), 0..=max).prop_map(|items| {
        let mut seen = HashSet::new();
        items
            .into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .collect()
    })
}
