//! Remote resource gateway contracts.
//!
//! Controllers talk to the remote authority only through these traits. The
//! production implementation is [`RestGateway`]; tests substitute an
//! in-memory double.

mod rest;

pub use rest::RestGateway;

use async_trait::async_trait;
use console_core::{AuthUser, ConsoleResult, MemberId, Namespace, NamespaceId, Resource};
use secrecy::SecretString;
use serde::Deserialize;

/// CRUD access to one resource type.
#[async_trait]
pub trait ResourceGateway<R: Resource>: Send + Sync {
    /// Fetch the whole collection in server order.
    async fn list(&self) -> ConsoleResult<Vec<R>>;

    /// Fetch a single entity.
    async fn get(&self, id: &R::Id) -> ConsoleResult<R>;

    /// Persist a draft and return the authoritative record.
    async fn create(&self, draft: &R::Draft) -> ConsoleResult<R>;

    /// Apply a partial update and return the authoritative record.
    async fn update(&self, id: &R::Id, patch: &R::Patch) -> ConsoleResult<R>;

    async fn delete(&self, id: &R::Id) -> ConsoleResult<()>;
}

/// Namespace gateway extended with the membership relation.
#[async_trait]
pub trait MembershipGateway: ResourceGateway<Namespace> {
    /// Add `member` and return the namespace with its updated membership set.
    async fn add_member(&self, namespace: &NamespaceId, member: &MemberId) -> ConsoleResult<Namespace>;

    async fn remove_member(&self, namespace: &NamespaceId, member: &MemberId) -> ConsoleResult<()>;
}

/// Operator authentication endpoints.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, credentials: &LoginCredentials) -> ConsoleResult<AuthResponse>;

    async fn logout(&self) -> ConsoleResult<()>;

    async fn current_user(&self) -> ConsoleResult<AuthUser>;
}

#[derive(Debug)]
pub struct LoginCredentials {
    pub email: String,
    pub password: SecretString,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::new(password.into().into_boxed_str()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
}
