//! Binding between an entity type and its identifier, payloads and kind.

use crate::{
    Chatbot, ChatbotDraft, ChatbotId, ChatbotPatch, DraftPayload, EntityIdType, Namespace,
    NamespaceDraft, NamespaceId, NamespacePatch, PatchPayload, ResourceKind, Role, RoleDraft,
    RoleId, RolePatch, Staff, StaffDraft, StaffId, StaffPatch,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// A resource type managed by an entity collection controller.
///
/// # Implementation Requirements
///
/// - `KIND` must be the same for every instance
/// - `id()` returns the authoritative identifier assigned by the server
/// - `number()` returns the human-readable sequential code, possibly empty
///   when the server did not assign one
pub trait Resource:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Id: EntityIdType;
    type Draft: DraftPayload + Debug + Clone;
    type Patch: PatchPayload + Debug + Clone;

    const KIND: ResourceKind;

    fn id(&self) -> &Self::Id;

    fn number(&self) -> &str;

    /// Overwrite the sequential number. Only used when the server left it empty.
    fn assign_number(&mut self, number: String);

    /// Name shown to operators in notifications.
    fn display_name(&self) -> &str;
}

macro_rules! impl_resource {
    ($entity:ty, $id:ty, $draft:ty, $patch:ty, $kind:expr) => {
        impl Resource for $entity {
            type Id = $id;
            type Draft = $draft;
            type Patch = $patch;

            const KIND: ResourceKind = $kind;

            fn id(&self) -> &Self::Id {
                &self.id
            }

            fn number(&self) -> &str {
                &self.number
            }

            fn assign_number(&mut self, number: String) {
                self.number = number;
            }

            fn display_name(&self) -> &str {
                &self.name
            }
        }
    };
}

impl_resource!(Staff, StaffId, StaffDraft, StaffPatch, ResourceKind::Staff);
impl_resource!(Chatbot, ChatbotId, ChatbotDraft, ChatbotPatch, ResourceKind::Chatbot);
impl_resource!(
    Namespace,
    NamespaceId,
    NamespaceDraft,
    NamespacePatch,
    ResourceKind::Namespace
);
impl_resource!(Role, RoleId, RoleDraft, RolePatch, ResourceKind::Role);
