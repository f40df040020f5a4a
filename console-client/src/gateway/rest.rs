//! HTTP implementation of the gateway traits.

use super::{AuthGateway, AuthResponse, LoginCredentials, MembershipGateway, ResourceGateway};
use crate::config::ConsoleConfig;
use crate::session::Session;
use async_trait::async_trait;
use console_core::{
    AuthUser, ConsoleError, ConsoleResult, EntityIdType, MemberId, Namespace, NamespaceId,
    Resource, ResourceKind,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// What a request addresses, used to describe `404` responses.
struct Target<'a> {
    entity: &'a str,
    id: &'a str,
}

#[derive(Debug, Clone)]
pub struct RestGateway {
    client: reqwest::Client,
    base_url: String,
    session: Session,
}

impl RestGateway {
    pub fn new(config: &ConsoleConfig, session: Session) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        Self::with_timeout(&config.api_base_url, timeout, session)
    }

    pub fn with_timeout(
        base_url: &str,
        timeout: Duration,
        session: Session,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build an authenticated request. Fails without sending when the
    /// session holds no credential.
    fn authorized(&self, method: Method, path: &str) -> ConsoleResult<RequestBuilder> {
        let token = self.session.require()?;
        tracing::debug!(method = %method, path, "Gateway request");
        Ok(self
            .client
            .request(method, self.url(path))
            .bearer_auth(token.expose_secret()))
    }

    async fn get_json<T>(&self, path: &str, target: Target<'_>) -> ConsoleResult<T>
    where
        T: DeserializeOwned,
    {
        let request = self.authorized(Method::GET, path)?;
        self.execute(request, target).await
    }

    async fn send_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        target: Target<'_>,
    ) -> ConsoleResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.authorized(method, path)?.json(body);
        self.execute(request, target).await
    }

    async fn delete_path(&self, path: &str, target: Target<'_>) -> ConsoleResult<()> {
        let request = self.authorized(Method::DELETE, path)?;
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(self.status_error(status, response, target).await)
    }

    async fn execute<T>(&self, request: RequestBuilder, target: Target<'_>) -> ConsoleResult<T>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(transport_error)?;
        self.parse_response(response, target).await
    }

    async fn parse_response<T>(&self, response: Response, target: Target<'_>) -> ConsoleResult<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            return Err(self.status_error(status, response, target).await);
        }
        let bytes = response.bytes().await.map_err(transport_error)?;
        // 204 and empty bodies decode as JSON null.
        let body: &[u8] = if status == StatusCode::NO_CONTENT || bytes.is_empty() {
            b"null"
        } else {
            &bytes
        };
        serde_json::from_slice(body).map_err(|e| ConsoleError::InvalidResponse {
            reason: e.to_string(),
        })
    }

    async fn status_error(
        &self,
        status: StatusCode,
        response: Response,
        target: Target<'_>,
    ) -> ConsoleError {
        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
        let err = map_status(status, message, &target);
        match &err {
            ConsoleError::Unauthorized => self.session.expire(),
            _ => tracing::warn!(status = status.as_u16(), error = %err, "Gateway request failed"),
        }
        err
    }
}

fn map_status(status: StatusCode, message: String, target: &Target<'_>) -> ConsoleError {
    match status {
        StatusCode::UNAUTHORIZED => ConsoleError::Unauthorized,
        StatusCode::NOT_FOUND => ConsoleError::NotFound {
            entity: target.entity.to_string(),
            id: target.id.to_string(),
        },
        StatusCode::CONFLICT => ConsoleError::Conflict { reason: message },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ConsoleError::ValidationRequired {
            field: "request".to_string(),
            reason: message,
        },
        other => ConsoleError::Rejected {
            status: other.as_u16(),
            message,
        },
    }
}

fn transport_error(err: reqwest::Error) -> ConsoleError {
    if err.is_decode() {
        ConsoleError::InvalidResponse {
            reason: err.to_string(),
        }
    } else {
        ConsoleError::network(err.to_string())
    }
}

/// Pull a human message out of an error body.
///
/// JSON bodies contribute their `detail` or `message` field; anything else is
/// used verbatim.
fn error_message(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => {
            let field = value.get("detail").or_else(|| value.get("message"));
            match field {
                Some(serde_json::Value::String(s)) => Some(s.clone()),
                Some(other) => Some(other.to_string()),
                None => Some(text.to_string()),
            }
        }
        Err(_) => Some(text.to_string()),
    }
}

fn item_path(kind: ResourceKind, id: &str) -> String {
    format!("{}/{}", kind.base_path(), id)
}

#[async_trait]
impl<R: Resource> ResourceGateway<R> for RestGateway {
    async fn list(&self) -> ConsoleResult<Vec<R>> {
        let kind = R::KIND;
        let target = Target {
            entity: kind.label(),
            id: kind.list_path(),
        };
        self.get_json(kind.list_path(), target).await
    }

    async fn get(&self, id: &R::Id) -> ConsoleResult<R> {
        let kind = R::KIND;
        let target = Target {
            entity: kind.label(),
            id: id.as_str(),
        };
        self.get_json(&item_path(kind, id.as_str()), target).await
    }

    async fn create(&self, draft: &R::Draft) -> ConsoleResult<R> {
        let kind = R::KIND;
        let target = Target {
            entity: kind.label(),
            id: kind.base_path(),
        };
        self.send_json(Method::POST, kind.base_path(), draft, target)
            .await
    }

    async fn update(&self, id: &R::Id, patch: &R::Patch) -> ConsoleResult<R> {
        let kind = R::KIND;
        let target = Target {
            entity: kind.label(),
            id: id.as_str(),
        };
        self.send_json(Method::PATCH, &item_path(kind, id.as_str()), patch, target)
            .await
    }

    async fn delete(&self, id: &R::Id) -> ConsoleResult<()> {
        let kind = R::KIND;
        let target = Target {
            entity: kind.label(),
            id: id.as_str(),
        };
        self.delete_path(&item_path(kind, id.as_str()), target).await
    }
}

#[derive(Serialize)]
struct AddMemberBody<'a> {
    member_id: &'a MemberId,
}

#[async_trait]
impl MembershipGateway for RestGateway {
    async fn add_member(&self, namespace: &NamespaceId, member: &MemberId) -> ConsoleResult<Namespace> {
        let path = format!("{}/members", item_path(ResourceKind::Namespace, namespace.as_str()));
        let target = Target {
            entity: ResourceKind::Namespace.label(),
            id: namespace.as_str(),
        };
        self.send_json(Method::POST, &path, &AddMemberBody { member_id: member }, target)
            .await
    }

    async fn remove_member(&self, namespace: &NamespaceId, member: &MemberId) -> ConsoleResult<()> {
        let path = format!(
            "{}/members/{}",
            item_path(ResourceKind::Namespace, namespace.as_str()),
            member.as_str()
        );
        let entity = format!("Member of namespace {namespace}");
        let target = Target {
            entity: &entity,
            id: member.as_str(),
        };
        self.delete_path(&path, target).await
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[async_trait]
impl AuthGateway for RestGateway {
    async fn login(&self, credentials: &LoginCredentials) -> ConsoleResult<AuthResponse> {
        let body = LoginBody {
            email: &credentials.email,
            password: credentials.password.expose_secret(),
        };
        tracing::debug!(email = %credentials.email, "Login request");
        let request = self.client.post(self.url("/auth/login")).json(&body);
        let target = Target {
            entity: "Account",
            id: &credentials.email,
        };
        self.execute(request, target).await
    }

    async fn logout(&self) -> ConsoleResult<()> {
        let target = Target {
            entity: "Session",
            id: "/auth/logout",
        };
        let request = self.authorized(Method::POST, "/auth/logout")?;
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(self.status_error(status, response, target).await)
    }

    async fn current_user(&self) -> ConsoleResult<AuthUser> {
        let target = Target {
            entity: "Session",
            id: "/auth/me",
        };
        self.get_json("/auth/me", target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Target<'static> {
        Target {
            entity: "Chatbot",
            id: "b1",
        }
    }

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(
            error_message(r#"{"detail":"Namespace not found"}"#).as_deref(),
            Some("Namespace not found")
        );
        assert_eq!(
            error_message(r#"{"message":"bad input"}"#).as_deref(),
            Some("bad input")
        );
        assert_eq!(error_message("plain failure").as_deref(), Some("plain failure"));
        assert_eq!(error_message("   "), None);
    }

    #[test]
    fn test_structured_detail_is_stringified() {
        let msg = error_message(r#"{"detail":[{"loc":["body","name"]}]}"#).unwrap();
        assert!(msg.contains("loc"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            map_status(StatusCode::UNAUTHORIZED, String::new(), &target()),
            ConsoleError::Unauthorized
        );
        assert_eq!(
            map_status(StatusCode::NOT_FOUND, String::new(), &target()),
            ConsoleError::NotFound {
                entity: "Chatbot".to_string(),
                id: "b1".to_string()
            }
        );
        assert!(matches!(
            map_status(StatusCode::CONFLICT, "dup".to_string(), &target()),
            ConsoleError::Conflict { .. }
        ));
        assert!(matches!(
            map_status(StatusCode::UNPROCESSABLE_ENTITY, "bad".to_string(), &target()),
            ConsoleError::ValidationRequired { .. }
        ));
        assert_eq!(
            map_status(StatusCode::SERVICE_UNAVAILABLE, "down".to_string(), &target()),
            ConsoleError::Rejected {
                status: 503,
                message: "down".to_string()
            }
        );
    }

    #[test]
    fn test_item_path() {
        assert_eq!(item_path(ResourceKind::Staff, "7"), "/staff/7");
        assert_eq!(item_path(ResourceKind::Role, "r1"), "/roles/r1");
    }
}
