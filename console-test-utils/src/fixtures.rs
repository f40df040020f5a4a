//! Pre-built fixtures matching the console's sample data.

use chrono::{DateTime, Utc};
use console_core::{
    Chatbot, ChatbotDraft, ChatbotId, ChatbotStatus, MemberRef, Membership, Namespace,
    NamespaceId, Role, RoleId, Staff, StaffId, StaffStatus, Timestamp,
};

/// 2024-01-15T09:00:00Z, the time every seeded membership was recorded.
const SEEDED_AT_SECS: i64 = 1_705_309_200;

/// Membership timestamp `minutes` after the seed time.
pub fn seeded_at(minutes: i64) -> Timestamp {
    DateTime::from_timestamp(SEEDED_AT_SECS + minutes * 60, 0).unwrap_or_else(Utc::now)
}

pub fn john() -> MemberRef {
    MemberRef::new("1", "John Doe", "john@example.com")
}

pub fn jane() -> MemberRef {
    MemberRef::new("2", "Jane Smith", "jane@example.com")
}

pub fn robert() -> MemberRef {
    MemberRef::new("3", "Robert Johnson", "robert@example.com")
}

pub fn emily() -> MemberRef {
    MemberRef::new("4", "Emily Davis", "emily@example.com")
}

pub fn michael() -> MemberRef {
    MemberRef::new("5", "Michael Wilson", "michael@example.com")
}

/// The external member directory.
pub fn directory() -> Vec<MemberRef> {
    vec![john(), jane(), robert(), emily(), michael()]
}

fn namespace(id: &str, number: &str, name: &str, title: &str, members: Vec<MemberRef>) -> Namespace {
    Namespace {
        id: NamespaceId::new(id),
        number: number.to_string(),
        name: name.to_string(),
        document_title: title.to_string(),
        members: members
            .into_iter()
            .enumerate()
            .map(|(i, m)| Membership::new(m, seeded_at(i as i64)))
            .collect(),
        created_at: None,
        updated_at: None,
    }
}

pub fn namespaces() -> Vec<Namespace> {
    vec![
        namespace(
            "1",
            "NS001",
            "Customer Support",
            "Support Documentation",
            vec![john(), jane()],
        ),
        namespace("2", "NS002", "Sales Knowledge", "Sales Playbook", vec![jane(), michael()]),
        namespace(
            "3",
            "NS003",
            "Technical Docs",
            "Technical Documentation",
            vec![robert(), emily()],
        ),
        namespace(
            "4",
            "NS004",
            "Product Specs",
            "Product Specifications",
            vec![john(), robert(), michael()],
        ),
    ]
}

fn chatbot(id: &str, number: &str, name: &str, role: &str, status: ChatbotStatus) -> Chatbot {
    Chatbot {
        id: ChatbotId::new(id),
        number: number.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        status,
        created_at: None,
        updated_at: None,
    }
}

pub fn chatbots() -> Vec<Chatbot> {
    vec![
        chatbot("1", "BOT001", "Customer Support Bot", "Customer Service", ChatbotStatus::Online),
        chatbot("2", "BOT002", "Sales Assistant", "Sales", ChatbotStatus::Online),
        chatbot("3", "BOT003", "Technical Support", "Technical Support", ChatbotStatus::Maintenance),
        chatbot("4", "BOT004", "Product Advisor", "Product Consultation", ChatbotStatus::Online),
        chatbot("5", "BOT005", "FAQ Bot", "General Support", ChatbotStatus::Offline),
    ]
}

fn staff_member(id: &str, name: &str, email: &str, role: &str, status: StaffStatus) -> Staff {
    Staff {
        id: StaffId::new(id),
        number: format!("{id:0>3}"),
        name: name.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        status,
        created_at: None,
        updated_at: None,
    }
}

pub fn staff() -> Vec<Staff> {
    vec![
        staff_member("1", "John Doe", "john.doe@gdhardy.com", "Administrator", StaffStatus::Active),
        staff_member("2", "Jane Smith", "jane.smith@gdhardy.com", "Manager", StaffStatus::Active),
        staff_member(
            "3",
            "Robert Johnson",
            "robert.johnson@gdhardy.com",
            "Support Agent",
            StaffStatus::Inactive,
        ),
        staff_member("4", "Emily Davis", "emily.davis@gdhardy.com", "Support Agent", StaffStatus::Active),
        staff_member("5", "Michael Wilson", "michael.wilson@gdhardy.com", "Manager", StaffStatus::Active),
    ]
}

fn role(id: &str, number: &str, name: &str, level: u8) -> Role {
    Role {
        id: RoleId::new(id),
        number: number.to_string(),
        name: name.to_string(),
        level,
        created_at: None,
        updated_at: None,
    }
}

pub fn roles() -> Vec<Role> {
    vec![
        role("1", "ROLE001", "Administrator", 5),
        role("2", "ROLE002", "Manager", 4),
        role("3", "ROLE003", "Team Lead", 3),
        role("4", "ROLE004", "Support Agent", 2),
        role("5", "ROLE005", "Viewer", 1),
    ]
}

/// Draft used by the "Add Chatbot" walkthrough.
pub fn sales_assistant_draft() -> ChatbotDraft {
    ChatbotDraft {
        name: "Sales Assistant".to_string(),
        role: "Sales".to_string(),
        status: ChatbotStatus::Online,
    }
}
