//! Entity collection controller.
//!
//! One controller owns the collection of one resource type and mediates every
//! transition between what the operator asked for and what the remote
//! authority confirmed. Collections change only after the gateway succeeds.

use crate::collection::Collection;
use crate::gateway::ResourceGateway;
use crate::notifications::Notifier;
use crate::session::Session;
use console_core::{
    parse_ordinal, sequential_number, ConsoleError, ConsoleResult, DraftPayload, EntityIdType,
    PatchPayload, Resource, ResourceKind,
};
use std::sync::Arc;
use tokio::sync::watch;

/// Fetch state of a controller's collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Operation that raised a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Fetch,
    Create,
    Update,
    Delete,
    AddMember,
    RemoveMember,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Load => "load",
            Operation::Fetch => "fetch",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::AddMember => "add_member",
            Operation::RemoveMember => "remove_member",
        }
    }

    fn failure_title(&self, kind: ResourceKind) -> String {
        match self {
            Operation::Load => format!("Failed to load {}", kind.label().to_lowercase()),
            Operation::Fetch => format!("Failed to fetch {}", kind.noun()),
            Operation::Create => format!("Failed to add {}", kind.noun()),
            Operation::Update => format!("Failed to update {}", kind.noun()),
            Operation::Delete => format!("Failed to delete {}", kind.noun()),
            Operation::AddMember => "Failed to add member".to_string(),
            Operation::RemoveMember => "Failed to remove member".to_string(),
        }
    }
}

/// "staff member" -> "Staff member"
fn capitalized(noun: &str) -> String {
    let mut chars = noun.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct EntityController<R, G>
where
    R: Resource,
    G: ResourceGateway<R> + ?Sized,
{
    gateway: Arc<G>,
    session: Session,
    notifier: Notifier,
    collection: Collection<R>,
    status: watch::Sender<LoadStatus>,
    selected: Option<R::Id>,
    /// Highest ordinal seen this session; locally derived numbers start above it.
    high_water: usize,
}

impl<R, G> EntityController<R, G>
where
    R: Resource,
    G: ResourceGateway<R> + ?Sized,
{
    pub fn new(gateway: Arc<G>, session: Session, notifier: Notifier) -> Self {
        let (status, _rx) = watch::channel(LoadStatus::Idle);
        Self {
            gateway,
            session,
            notifier,
            collection: Collection::default(),
            status,
            selected: None,
            high_water: 0,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        R::KIND
    }

    /// Current collection without contacting the gateway.
    pub fn snapshot(&self) -> Collection<R> {
        self.collection.clone()
    }

    pub fn status(&self) -> LoadStatus {
        *self.status.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<LoadStatus> {
        self.status.subscribe()
    }

    /// Current collection, fetching it first when it has not loaded yet.
    pub async fn list(&mut self) -> ConsoleResult<Collection<R>> {
        if self.status() == LoadStatus::Ready {
            return Ok(self.snapshot());
        }
        self.refresh().await
    }

    /// Re-fetch and replace the collection wholesale.
    pub async fn refresh(&mut self) -> ConsoleResult<Collection<R>> {
        self.require_session(Operation::Load)?;
        self.status.send_replace(LoadStatus::Loading);
        match self.gateway.list().await {
            Ok(mut items) => {
                self.number_fetched(&mut items);
                self.collection = Collection::from_vec(items);
                self.status.send_replace(LoadStatus::Ready);
                tracing::debug!(kind = %R::KIND, count = self.collection.len(), "Collection loaded");
                Ok(self.snapshot())
            }
            Err(err) => {
                self.status.send_replace(LoadStatus::Failed);
                Err(self.report(Operation::Load, err))
            }
        }
    }

    /// Fetch one entity and refresh the local copy when present.
    pub async fn get(&mut self, id: &R::Id) -> ConsoleResult<Arc<R>> {
        self.require_id(Operation::Fetch, id)?;
        self.require_session(Operation::Fetch)?;
        match self.gateway.get(id).await {
            Ok(mut item) => {
                if let Some(existing) = self.collection.get(id).cloned() {
                    keep_number(&mut item, &existing);
                    self.observe(item.number());
                    self.collection.upsert(item.clone());
                }
                Ok(Arc::new(item))
            }
            Err(err) => Err(self.report(Operation::Fetch, err)),
        }
    }

    pub async fn create(&mut self, draft: R::Draft) -> ConsoleResult<Arc<R>> {
        if let Err(err) = draft.validate() {
            return Err(self.report(Operation::Create, err));
        }
        self.require_session(Operation::Create)?;
        match self.gateway.create(&draft).await {
            Ok(mut item) => {
                if item.id().is_blank() {
                    let err = ConsoleError::InvalidResponse {
                        reason: format!("created {} has no id", R::KIND.noun()),
                    };
                    return Err(self.report(Operation::Create, err));
                }
                self.number_created(&mut item);
                tracing::info!(kind = %R::KIND, id = %item.id(), number = item.number(), "Entity created");
                self.collection.upsert(item.clone());
                self.notifier.success(
                    format!("{} Added", R::KIND.label()),
                    format!("New {} has been added successfully.", R::KIND.noun()),
                );
                Ok(Arc::new(item))
            }
            Err(err) => Err(self.report(Operation::Create, err)),
        }
    }

    /// Apply `patch` to the entity `id`, replacing it with the server record.
    pub async fn update(&mut self, id: &R::Id, patch: R::Patch) -> ConsoleResult<Arc<R>> {
        self.require_id(Operation::Update, id)?;
        if patch.is_empty() {
            let err = ConsoleError::validation("patch", "no fields changed");
            return Err(self.report(Operation::Update, err));
        }
        if let Err(err) = patch.validate() {
            return Err(self.report(Operation::Update, err));
        }
        let Some(existing) = self.collection.get(id).cloned() else {
            let err = ConsoleError::not_found(R::KIND, id.as_str());
            return Err(self.report(Operation::Update, err));
        };
        self.require_session(Operation::Update)?;
        match self.gateway.update(id, &patch).await {
            Ok(mut item) => {
                if item.id() != id {
                    let err = ConsoleError::InvalidResponse {
                        reason: format!("update of {id} returned {}", item.id()),
                    };
                    return Err(self.report(Operation::Update, err));
                }
                keep_number(&mut item, &existing);
                self.observe(item.number());
                tracing::info!(kind = %R::KIND, id = %id, "Entity updated");
                self.collection.upsert(item.clone());
                self.deselect(id);
                self.notifier.success(
                    format!("{} Updated", R::KIND.label()),
                    format!("{} has been updated successfully.", capitalized(R::KIND.noun())),
                );
                Ok(Arc::new(item))
            }
            Err(err) => Err(self.report(Operation::Update, err)),
        }
    }

    /// Delete through the gateway, then drop the local copy.
    pub async fn remove(&mut self, id: &R::Id) -> ConsoleResult<()> {
        self.require_id(Operation::Delete, id)?;
        self.require_session(Operation::Delete)?;
        match self.gateway.delete(id).await {
            Ok(()) => {
                self.collection.remove(id);
                self.deselect(id);
                tracing::info!(kind = %R::KIND, id = %id, "Entity deleted");
                self.notifier.success(
                    format!("{} Deleted", R::KIND.label()),
                    format!("{} has been deleted successfully.", capitalized(R::KIND.noun())),
                );
                Ok(())
            }
            Err(err) => Err(self.report(Operation::Delete, err)),
        }
    }

    /// Mark an entity as the target of the edit dialog.
    pub fn select_for_edit(&mut self, id: &R::Id) -> ConsoleResult<Arc<R>> {
        match self.collection.get(id) {
            Some(item) => {
                let item = Arc::clone(item);
                self.selected = Some(id.clone());
                Ok(item)
            }
            None => Err(ConsoleError::not_found(R::KIND, id.as_str())),
        }
    }

    pub fn selected(&self) -> Option<Arc<R>> {
        self.selected
            .as_ref()
            .and_then(|id| self.collection.get(id))
            .cloned()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // ------------------------------------------------------------------
    // Crate-internal hooks for the membership manager
    // ------------------------------------------------------------------

    pub(crate) fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub(crate) fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Publish a server-confirmed replacement of an existing entity.
    pub(crate) fn replace(&mut self, item: R) {
        self.collection.upsert(item);
    }

    pub(crate) fn require_session(&self, op: Operation) -> ConsoleResult<()> {
        match self.session.require() {
            Ok(_) => Ok(()),
            Err(err) => {
                tracing::warn!(kind = %R::KIND, op = op.as_str(), "Operation attempted without credential");
                self.notifier.failure(op.failure_title(R::KIND), &err);
                Err(err)
            }
        }
    }

    /// Route a failure to the session and the notification stream.
    pub(crate) fn report(&self, op: Operation, err: ConsoleError) -> ConsoleError {
        if err.is_session_fatal() {
            self.session.expire();
            tracing::error!(kind = %R::KIND, op = op.as_str(), "Credential rejected");
            self.notifier.failure("Session Expired", &err);
        } else {
            tracing::warn!(kind = %R::KIND, op = op.as_str(), error = %err, "Operation failed");
            self.notifier.failure(op.failure_title(R::KIND), &err);
        }
        err
    }

    fn require_id(&self, op: Operation, id: &R::Id) -> ConsoleResult<()> {
        if id.is_blank() {
            let err = ConsoleError::validation("id", format!("{} has not been saved yet", R::KIND.noun()));
            return Err(self.report(op, err));
        }
        Ok(())
    }

    fn deselect(&mut self, id: &R::Id) {
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
    }

    // ------------------------------------------------------------------
    // Numbering
    // ------------------------------------------------------------------

    fn observe(&mut self, number: &str) {
        if let Some(ordinal) = parse_ordinal(R::KIND.number_prefix(), number) {
            self.high_water = self.high_water.max(ordinal);
        }
    }

    fn next_number(&mut self, count: usize) -> String {
        let kind = R::KIND;
        let number = sequential_number(
            kind.number_prefix(),
            count.max(self.high_water),
            kind.number_width(),
        );
        self.observe(&number);
        number
    }

    fn number_fetched(&mut self, items: &mut [R]) {
        for item in items.iter_mut() {
            if let Some(existing) = self.collection.get(item.id()).cloned() {
                keep_number(item, &existing);
            }
            self.observe(item.number());
        }
        for (index, item) in items.iter_mut().enumerate() {
            if item.number().trim().is_empty() {
                let number = self.next_number(index);
                item.assign_number(number);
            }
        }
    }

    fn number_created(&mut self, item: &mut R) {
        if item.number().trim().is_empty() {
            let number = self.next_number(self.collection.len());
            item.assign_number(number);
        } else {
            self.observe(item.number());
        }
    }
}

/// Server wins, except that a blank number never erases a known one.
pub(crate) fn keep_number<R: Resource>(item: &mut R, existing: &R) {
    if item.number().trim().is_empty() && !existing.number().is_empty() {
        item.assign_number(existing.number().to_string());
    }
}
