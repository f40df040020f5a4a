//! Top-level bundle of every controller sharing one session.

use crate::controller::EntityController;
use crate::gateway::{MembershipGateway, ResourceGateway};
use crate::membership::{MembershipManager, StaticDirectory};
use crate::notifications::Notifier;
use crate::session::Session;
use console_core::{Chatbot, ConsoleResult, ResourceKind, Role, Staff};
use std::sync::Arc;

/// Gateway able to serve every resource type the console manages.
pub trait ConsoleGateway:
    ResourceGateway<Staff> + ResourceGateway<Chatbot> + ResourceGateway<Role> + MembershipGateway
{
}

impl<T> ConsoleGateway for T where
    T: ResourceGateway<Staff> + ResourceGateway<Chatbot> + ResourceGateway<Role> + MembershipGateway
{
}

/// Outcome of loading one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub kind: ResourceKind,
    pub result: ConsoleResult<usize>,
}

pub struct Console<G: ConsoleGateway> {
    pub staff: EntityController<Staff, G>,
    pub chatbots: EntityController<Chatbot, G>,
    pub roles: EntityController<Role, G>,
    pub memberships: MembershipManager<G>,
    session: Session,
}

impl<G: ConsoleGateway> Console<G> {
    pub fn new(gateway: Arc<G>, session: Session, notifier: Notifier) -> Self {
        Self {
            staff: EntityController::new(Arc::clone(&gateway), session.clone(), notifier.clone()),
            chatbots: EntityController::new(Arc::clone(&gateway), session.clone(), notifier.clone()),
            roles: EntityController::new(Arc::clone(&gateway), session.clone(), notifier.clone()),
            memberships: MembershipManager::new(gateway, session.clone(), notifier),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// List every collection in turn. Failures are already notified; a
    /// rejected credential stops the remaining loads.
    pub async fn load_all(&mut self) -> Vec<LoadSummary> {
        let mut summaries = Vec::with_capacity(ResourceKind::ALL.len());
        for kind in ResourceKind::ALL {
            let result = match kind {
                ResourceKind::Staff => self.staff.list().await.map(|c| c.len()),
                ResourceKind::Chatbot => self.chatbots.list().await.map(|c| c.len()),
                ResourceKind::Namespace => self
                    .memberships
                    .namespaces_mut()
                    .list()
                    .await
                    .map(|c| c.len()),
                ResourceKind::Role => self.roles.list().await.map(|c| c.len()),
            };
            let fatal = matches!(&result, Err(err) if err.is_session_fatal());
            summaries.push(LoadSummary { kind, result });
            if fatal {
                break;
            }
        }
        summaries
    }

    /// Directory of people eligible for namespace membership.
    pub fn member_directory(&self) -> StaticDirectory {
        StaticDirectory::from_staff(&self.staff.snapshot())
    }
}
