//! In-memory gateway standing in for the remote authority.

use async_trait::async_trait;
use console_client::gateway::{
    AuthGateway, AuthResponse, LoginCredentials, MembershipGateway, ResourceGateway,
};
use console_core::{
    parse_ordinal, sequential_number, AuthUser, Chatbot, ChatbotDraft, ChatbotPatch, ConsoleError,
    ConsoleResult, EntityIdType, MemberId, MemberRef, Membership, Namespace, NamespaceDraft,
    NamespaceId, NamespacePatch, Resource, ResourceKind, Role, RoleDraft, RolePatch, Staff,
    StaffDraft, StaffPatch,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// A gateway call as observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub kind: ResourceKind,
    pub op: &'static str,
    pub id: Option<String>,
}

/// Server-side state behind a [`MockGateway`].
#[derive(Debug)]
pub struct MockState {
    staff: Vec<Staff>,
    chatbots: Vec<Chatbot>,
    namespaces: Vec<Namespace>,
    roles: Vec<Role>,
    directory: Vec<MemberRef>,
    sequences: HashMap<ResourceKind, usize>,
    assign_numbers: bool,
    queued_ids: VecDeque<String>,
    fail_next: VecDeque<ConsoleError>,
    fail_always: Option<ConsoleError>,
    calls: Vec<MockCall>,
    token: String,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            staff: Vec::new(),
            chatbots: Vec::new(),
            namespaces: Vec::new(),
            roles: Vec::new(),
            directory: Vec::new(),
            sequences: HashMap::new(),
            assign_numbers: true,
            queued_ids: VecDeque::new(),
            fail_next: VecDeque::new(),
            fail_always: None,
            calls: Vec::new(),
            token: "mock-token".to_string(),
        }
    }
}

impl MockState {
    fn record(&mut self, kind: ResourceKind, op: &'static str, id: Option<&str>) -> ConsoleResult<()> {
        self.calls.push(MockCall {
            kind,
            op,
            id: id.map(str::to_string),
        });
        if let Some(err) = &self.fail_always {
            return Err(err.clone());
        }
        match self.fail_next.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn next_id(&mut self) -> String {
        self.queued_ids
            .pop_front()
            .unwrap_or_else(|| Uuid::now_v7().to_string())
    }

    /// Server-side sequence: one above the highest ordinal ever stored.
    fn next_number(&mut self, kind: ResourceKind, existing: &[&str]) -> String {
        if !self.assign_numbers {
            return String::new();
        }
        let prefix = kind.number_prefix();
        let seen = existing
            .iter()
            .filter_map(|n| parse_ordinal(prefix, n))
            .max()
            .unwrap_or(0);
        let sequence = self.sequences.entry(kind).or_insert(0);
        *sequence = (*sequence).max(seen);
        let number = sequential_number(prefix, *sequence, kind.number_width());
        *sequence = sequence.saturating_add(1);
        number
    }
}

/// Resource types the mock can store.
pub trait MockResource: Resource {
    fn records(state: &MockState) -> &Vec<Self>;

    fn records_mut(state: &mut MockState) -> &mut Vec<Self>;

    fn build(id: Self::Id, number: String, draft: &Self::Draft) -> Self;

    fn apply(&mut self, patch: &Self::Patch);
}

fn set<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

impl MockResource for Staff {
    fn records(state: &MockState) -> &Vec<Self> {
        &state.staff
    }

    fn records_mut(state: &mut MockState) -> &mut Vec<Self> {
        &mut state.staff
    }

    fn build(id: Self::Id, number: String, draft: &StaffDraft) -> Self {
        Staff {
            id,
            number,
            name: draft.name.clone(),
            email: draft.email.clone(),
            role: draft.role.clone(),
            status: draft.status,
            created_at: None,
            updated_at: None,
        }
    }

    fn apply(&mut self, patch: &StaffPatch) {
        set(&mut self.name, &patch.name);
        set(&mut self.email, &patch.email);
        set(&mut self.role, &patch.role);
        set(&mut self.status, &patch.status);
    }
}

impl MockResource for Chatbot {
    fn records(state: &MockState) -> &Vec<Self> {
        &state.chatbots
    }

    fn records_mut(state: &mut MockState) -> &mut Vec<Self> {
        &mut state.chatbots
    }

    fn build(id: Self::Id, number: String, draft: &ChatbotDraft) -> Self {
        Chatbot {
            id,
            number,
            name: draft.name.clone(),
            role: draft.role.clone(),
            status: draft.status,
            created_at: None,
            updated_at: None,
        }
    }

    fn apply(&mut self, patch: &ChatbotPatch) {
        set(&mut self.name, &patch.name);
        set(&mut self.role, &patch.role);
        set(&mut self.status, &patch.status);
    }
}

impl MockResource for Namespace {
    fn records(state: &MockState) -> &Vec<Self> {
        &state.namespaces
    }

    fn records_mut(state: &mut MockState) -> &mut Vec<Self> {
        &mut state.namespaces
    }

    fn build(id: Self::Id, number: String, draft: &NamespaceDraft) -> Self {
        Namespace {
            id,
            number,
            name: draft.name.clone(),
            document_title: draft.document_title.clone(),
            members: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn apply(&mut self, patch: &NamespacePatch) {
        set(&mut self.name, &patch.name);
        set(&mut self.document_title, &patch.document_title);
    }
}

impl MockResource for Role {
    fn records(state: &MockState) -> &Vec<Self> {
        &state.roles
    }

    fn records_mut(state: &mut MockState) -> &mut Vec<Self> {
        &mut state.roles
    }

    fn build(id: Self::Id, number: String, draft: &RoleDraft) -> Self {
        Role {
            id,
            number,
            name: draft.name.clone(),
            level: draft.level,
            created_at: None,
            updated_at: None,
        }
    }

    fn apply(&mut self, patch: &RolePatch) {
        set(&mut self.name, &patch.name);
        set(&mut self.level, &patch.level);
    }
}

/// In-memory gateway with failure injection and call recording.
///
/// Clones share state, so a test can keep a handle while a controller owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    state: Arc<RwLock<MockState>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock seeded with every sample collection and the member directory.
    pub fn seeded() -> Self {
        let gateway = Self::new()
            .with_records(crate::fixtures::staff())
            .with_records(crate::fixtures::chatbots())
            .with_records(crate::fixtures::namespaces())
            .with_records(crate::fixtures::roles());
        gateway.set_directory(crate::fixtures::directory());
        gateway
    }

    pub fn with_records<R: MockResource>(self, records: Vec<R>) -> Self {
        *R::records_mut(&mut self.write()) = records;
        self
    }

    pub fn set_directory(&self, members: Vec<MemberRef>) {
        self.write().directory = members;
    }

    /// Leave `number` blank on created records.
    pub fn without_numbering(self) -> Self {
        self.write().assign_numbers = false;
        self
    }

    /// Use `id` for the next created record instead of a fresh UUIDv7.
    pub fn queue_id(&self, id: impl Into<String>) {
        self.write().queued_ids.push_back(id.into());
    }

    /// Fail the next call with `err`. Queued failures apply in order.
    pub fn fail_next(&self, err: ConsoleError) {
        self.write().fail_next.push_back(err);
    }

    /// Fail every call with `err` until [`recover`](Self::recover).
    pub fn fail_always(&self, err: ConsoleError) {
        self.write().fail_always = Some(err);
    }

    pub fn recover(&self) {
        let mut state = self.write();
        state.fail_always = None;
        state.fail_next.clear();
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.read().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.read().calls.len()
    }

    pub fn count_calls(&self, kind: ResourceKind, op: &str) -> usize {
        self.read()
            .calls
            .iter()
            .filter(|c| c.kind == kind && c.op == op)
            .count()
    }

    /// Server-side copy of every record of type `R`.
    pub fn records<R: MockResource>(&self) -> Vec<R> {
        R::records(&self.read()).clone()
    }

    pub fn namespace(&self, id: &NamespaceId) -> Option<Namespace> {
        self.read().namespaces.iter().find(|n| &n.id == id).cloned()
    }

    fn read(&self) -> RwLockReadGuard<'_, MockState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MockState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn not_found<R: Resource>(id: &R::Id) -> ConsoleError {
    ConsoleError::not_found(R::KIND, id.as_str())
}

#[async_trait]
impl<R: MockResource> ResourceGateway<R> for MockGateway {
    async fn list(&self) -> ConsoleResult<Vec<R>> {
        let mut state = self.write();
        state.record(R::KIND, "list", None)?;
        Ok(R::records(&state).clone())
    }

    async fn get(&self, id: &R::Id) -> ConsoleResult<R> {
        let mut state = self.write();
        state.record(R::KIND, "get", Some(id.as_str()))?;
        R::records(&state)
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| not_found::<R>(id))
    }

    async fn create(&self, draft: &R::Draft) -> ConsoleResult<R> {
        let mut state = self.write();
        state.record(R::KIND, "create", None)?;
        let id = R::Id::from_raw(state.next_id());
        let existing: Vec<String> = R::records(&state)
            .iter()
            .map(|r| r.number().to_string())
            .collect();
        let existing: Vec<&str> = existing.iter().map(String::as_str).collect();
        let number = state.next_number(R::KIND, &existing);
        let record = R::build(id, number, draft);
        R::records_mut(&mut state).push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &R::Id, patch: &R::Patch) -> ConsoleResult<R> {
        let mut state = self.write();
        state.record(R::KIND, "update", Some(id.as_str()))?;
        let record = R::records_mut(&mut state)
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| not_found::<R>(id))?;
        record.apply(patch);
        Ok(record.clone())
    }

    async fn delete(&self, id: &R::Id) -> ConsoleResult<()> {
        let mut state = self.write();
        state.record(R::KIND, "delete", Some(id.as_str()))?;
        let records = R::records_mut(&mut state);
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(not_found::<R>(id));
        }
        Ok(())
    }
}

#[async_trait]
impl MembershipGateway for MockGateway {
    async fn add_member(&self, namespace: &NamespaceId, member: &MemberId) -> ConsoleResult<Namespace> {
        let mut state = self.write();
        state.record(ResourceKind::Namespace, "add_member", Some(member.as_str()))?;
        let person = state
            .directory
            .iter()
            .find(|m| &m.id == member)
            .cloned()
            .ok_or_else(|| ConsoleError::NotFound {
                entity: "Member".to_string(),
                id: member.to_string(),
            })?;
        let ns = state
            .namespaces
            .iter_mut()
            .find(|n| &n.id == namespace)
            .ok_or_else(|| ConsoleError::not_found(ResourceKind::Namespace, namespace.as_str()))?;
        if ns.has_member(member) {
            return Err(ConsoleError::Conflict {
                reason: format!("{} is already a member", person.name),
            });
        }
        // The server does not stamp membership time.
        ns.members.push(Membership::from(person));
        Ok(ns.clone())
    }

    async fn remove_member(&self, namespace: &NamespaceId, member: &MemberId) -> ConsoleResult<()> {
        let mut state = self.write();
        state.record(ResourceKind::Namespace, "remove_member", Some(member.as_str()))?;
        let ns = state
            .namespaces
            .iter_mut()
            .find(|n| &n.id == namespace)
            .ok_or_else(|| ConsoleError::not_found(ResourceKind::Namespace, namespace.as_str()))?;
        if !ns.has_member(member) {
            return Err(ConsoleError::member_not_found(member.as_str(), &ns.name));
        }
        ns.members.retain(|m| &m.member.id != member);
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for MockGateway {
    async fn login(&self, credentials: &LoginCredentials) -> ConsoleResult<AuthResponse> {
        let mut state = self.write();
        state.record(ResourceKind::Staff, "login", Some(credentials.email.as_str()))?;
        let user = state
            .staff
            .iter()
            .find(|s| s.email == credentials.email)
            .map(|s| AuthUser {
                id: s.id.to_string(),
                email: s.email.clone(),
                name: s.name.clone(),
                role: s.role.clone(),
            })
            .ok_or(ConsoleError::Unauthorized)?;
        Ok(AuthResponse {
            token: state.token.clone(),
            user,
        })
    }

    async fn logout(&self) -> ConsoleResult<()> {
        self.write().record(ResourceKind::Staff, "logout", None)
    }

    async fn current_user(&self) -> ConsoleResult<AuthUser> {
        let mut state = self.write();
        state.record(ResourceKind::Staff, "me", None)?;
        state
            .staff
            .first()
            .map(|s| AuthUser {
                id: s.id.to_string(),
                email: s.email.clone(),
                name: s.name.clone(),
                role: s.role.clone(),
            })
            .ok_or(ConsoleError::Unauthorized)
    }
}
