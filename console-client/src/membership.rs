//! Namespace membership management.
//!
//! Wraps the namespace controller and enforces the relation invariants the
//! generic controller does not know about: a member joins a namespace at most
//! once, and removing a non-member is reported rather than ignored.

use crate::collection::Collection;
use crate::controller::{keep_number, EntityController, Operation};
use crate::dialog::{DialogError, MembershipDialog};
use crate::gateway::MembershipGateway;
use crate::notifications::Notifier;
use crate::session::Session;
use chrono::Utc;
use console_core::{
    ConsoleError, ConsoleResult, EntityIdType, MemberId, MemberRef, Membership, Namespace,
    NamespaceId, ResourceKind, Staff, Timestamp,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Source of people who may join a namespace.
pub trait MemberDirectory {
    fn members(&self) -> &[MemberRef];
}

/// Directory backed by a fixed list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticDirectory {
    members: Vec<MemberRef>,
}

impl StaticDirectory {
    pub fn new(members: Vec<MemberRef>) -> Self {
        Self { members }
    }

    /// Every staff member is eligible for namespace membership.
    pub fn from_staff(staff: &Collection<Staff>) -> Self {
        let members = staff
            .iter()
            .map(|s| MemberRef::new(s.id.as_str(), s.name.clone(), s.email.clone()))
            .collect();
        Self { members }
    }
}

impl MemberDirectory for StaticDirectory {
    fn members(&self) -> &[MemberRef] {
        &self.members
    }
}

/// Directory members not yet in a namespace, in directory order.
///
/// Filtering happens as the iterator advances. Clone it to walk the same
/// candidates again.
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    directory: std::slice::Iter<'a, MemberRef>,
    excluded: Arc<HashSet<MemberId>>,
}

impl<'a> Candidates<'a> {
    pub fn new(directory: &'a [MemberRef], namespace: &Namespace) -> Self {
        let excluded = namespace
            .members
            .iter()
            .map(|m| m.member.id.clone())
            .collect();
        Self {
            directory: directory.iter(),
            excluded: Arc::new(excluded),
        }
    }
}

impl<'a> Iterator for Candidates<'a> {
    type Item = &'a MemberRef;

    fn next(&mut self) -> Option<Self::Item> {
        let excluded = &self.excluded;
        self.directory.find(|m| !excluded.contains(&m.id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.directory.size_hint().1)
    }
}

pub struct MembershipManager<G>
where
    G: MembershipGateway + ?Sized,
{
    namespaces: EntityController<Namespace, G>,
    dialog: MembershipDialog,
}

impl<G> MembershipManager<G>
where
    G: MembershipGateway + ?Sized,
{
    pub fn new(gateway: Arc<G>, session: Session, notifier: Notifier) -> Self {
        Self {
            namespaces: EntityController::new(gateway, session, notifier),
            dialog: MembershipDialog::Closed,
        }
    }

    pub fn namespaces(&self) -> &EntityController<Namespace, G> {
        &self.namespaces
    }

    pub fn namespaces_mut(&mut self) -> &mut EntityController<Namespace, G> {
        &mut self.namespaces
    }

    pub fn dialog(&self) -> &MembershipDialog {
        &self.dialog
    }

    pub fn open_members(&mut self, namespace: &NamespaceId) -> Result<(), DialogError> {
        if !self.namespaces.snapshot().contains(namespace) {
            return Err(DialogError::UnknownNamespace(namespace.clone()));
        }
        self.dialog.open_members(namespace.clone())
    }

    pub fn open_picker(&mut self) -> Result<(), DialogError> {
        self.dialog.open_picker()
    }

    pub fn back_to_list(&mut self) -> Result<(), DialogError> {
        self.dialog.back_to_list()
    }

    pub fn cancel(&mut self) {
        self.dialog.cancel();
    }

    /// Directory members eligible to join `namespace`.
    pub fn available_candidates<'d, D>(
        &self,
        namespace: &NamespaceId,
        directory: &'d D,
    ) -> ConsoleResult<Candidates<'d>>
    where
        D: MemberDirectory + ?Sized,
    {
        let snapshot = self.namespaces.snapshot();
        let ns = snapshot
            .get(namespace)
            .ok_or_else(|| ConsoleError::not_found(ResourceKind::Namespace, namespace.as_str()))?;
        Ok(Candidates::new(directory.members(), ns))
    }

    pub async fn add_member(
        &mut self,
        namespace: &NamespaceId,
        member: &MemberRef,
    ) -> ConsoleResult<Arc<Namespace>> {
        let local = self.lookup(Operation::AddMember, namespace)?;
        if local.has_member(&member.id) {
            let err = ConsoleError::AlreadyMember {
                member: member.name.clone(),
                namespace: local.name.clone(),
            };
            return Err(self.namespaces.report(Operation::AddMember, err));
        }
        self.namespaces.require_session(Operation::AddMember)?;

        let result = self.namespaces.gateway().add_member(namespace, &member.id).await;
        let server = match result {
            Ok(server) => server,
            Err(ConsoleError::Conflict { .. }) => {
                let err = ConsoleError::AlreadyMember {
                    member: member.name.clone(),
                    namespace: local.name.clone(),
                };
                return Err(self.namespaces.report(Operation::AddMember, err));
            }
            Err(err) => return Err(self.namespaces.report(Operation::AddMember, err)),
        };

        let updated = reconcile_added(&local, server, member, Utc::now());
        tracing::info!(
            namespace = %namespace,
            member = %member.id,
            members = updated.member_count(),
            "Member added"
        );
        self.namespaces.replace(updated.clone());
        if matches!(&self.dialog, MembershipDialog::AddOpen { namespace: open } if open == namespace) {
            self.dialog = MembershipDialog::ListOpen {
                namespace: namespace.clone(),
            };
        }
        self.namespaces.notifier().success(
            "Member Added",
            format!("{} has been added to {}.", member.name, updated.name),
        );
        Ok(Arc::new(updated))
    }

    pub async fn remove_member(
        &mut self,
        namespace: &NamespaceId,
        member: &MemberId,
    ) -> ConsoleResult<Arc<Namespace>> {
        let local = self.lookup(Operation::RemoveMember, namespace)?;
        let Some(membership) = local.membership(member).cloned() else {
            let err = ConsoleError::member_not_found(member.as_str(), &local.name);
            return Err(self.namespaces.report(Operation::RemoveMember, err));
        };
        self.namespaces.require_session(Operation::RemoveMember)?;

        if let Err(err) = self.namespaces.gateway().remove_member(namespace, member).await {
            return Err(self.namespaces.report(Operation::RemoveMember, err));
        }

        let mut updated = Namespace::clone(&local);
        updated.members.retain(|m| &m.member.id != member);
        tracing::info!(
            namespace = %namespace,
            member = %member,
            members = updated.member_count(),
            "Member removed"
        );
        self.namespaces.replace(updated.clone());
        self.namespaces.notifier().success(
            "Member Removed",
            format!("{} has been removed from {}.", membership.member.name, updated.name),
        );
        Ok(Arc::new(updated))
    }

    /// Delete a namespace together with its membership set.
    pub async fn delete_namespace(&mut self, namespace: &NamespaceId) -> ConsoleResult<()> {
        self.namespaces.remove(namespace).await?;
        if self.dialog.namespace() == Some(namespace) {
            self.dialog.cancel();
        }
        Ok(())
    }

    fn lookup(&self, op: Operation, namespace: &NamespaceId) -> ConsoleResult<Arc<Namespace>> {
        match self.namespaces.snapshot().get(namespace) {
            Some(ns) => Ok(Arc::clone(ns)),
            None => {
                let err = ConsoleError::not_found(ResourceKind::Namespace, namespace.as_str());
                Err(self.namespaces.report(op, err))
            }
        }
    }
}

/// Merge the server's namespace after an add.
///
/// The server decides membership and order. Known `added_at` values carry
/// over by member id; the new member is stamped after every existing entry
/// when the server did not stamp it.
fn reconcile_added(local: &Namespace, mut server: Namespace, added: &MemberRef, now: Timestamp) -> Namespace {
    keep_number(&mut server, local);
    let known: HashMap<&MemberId, Timestamp> = local
        .members
        .iter()
        .filter_map(|m| m.added_at.map(|at| (&m.member.id, at)))
        .collect();
    for membership in server.members.iter_mut() {
        if membership.added_at.is_none() {
            membership.added_at = known.get(&membership.member.id).copied();
        }
    }
    if !server.has_member(&added.id) {
        tracing::warn!(member = %added.id, "Server response omitted the added member");
        server.members.push(Membership::from(added.clone()));
    }

    let latest = server
        .members
        .iter()
        .filter(|m| m.member.id != added.id)
        .filter_map(|m| m.added_at)
        .max();
    let stamp = match latest {
        Some(latest) if latest >= now => latest + chrono::Duration::microseconds(1),
        _ => now,
    };
    if let Some(entry) = server.members.iter_mut().find(|m| m.member.id == added.id) {
        if entry.added_at.is_none() {
            entry.added_at = Some(stamp);
        }
    }
    server
}
