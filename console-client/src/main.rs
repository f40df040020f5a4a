//! Admin console entry point.

use console_client::config::{ConsoleConfig, PASSWORD_ENV};
use console_client::error::ClientError;
use console_client::gateway::{AuthGateway, LoginCredentials, RestGateway};
use console_client::telemetry;
use console_client::{Console, Notifier, Session};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    let config = ConsoleConfig::load()?;
    telemetry::init_tracing(&config.log)?;

    let session = Session::new();
    let gateway = Arc::new(RestGateway::new(&config, session.clone())?);
    authenticate(&config, &session, gateway.as_ref()).await?;

    let (notifier, mut notifications) = Notifier::channel();
    let mut console = Console::new(gateway, session, notifier.clone());

    let mut loaded = Vec::new();
    for summary in console.load_all().await {
        match summary.result {
            Ok(count) => {
                tracing::info!(kind = %summary.kind, count, "Collection ready");
                loaded.push(format!("{}: {count}", summary.kind));
            }
            Err(err) => tracing::warn!(kind = %summary.kind, error = %err, "Collection unavailable"),
        }
    }
    if !loaded.is_empty() {
        notifier.info("Collections Loaded", loaded.join(", "));
    }
    for namespace in console.memberships.namespaces().snapshot().iter() {
        tracing::info!(
            number = %namespace.number,
            name = %namespace.name,
            members = namespace.member_count(),
            "Namespace"
        );
    }

    while let Ok(notification) = notifications.try_recv() {
        println!(
            "[{:?}] {}: {}",
            notification.level, notification.title, notification.message
        );
    }
    Ok(())
}

async fn authenticate(
    config: &ConsoleConfig,
    session: &Session,
    gateway: &RestGateway,
) -> Result<(), ClientError> {
    if let Some(token) = config.auth.token.as_deref().filter(|t| !t.trim().is_empty()) {
        session.init(token, None);
        match gateway.current_user().await {
            Ok(user) => {
                tracing::info!(user = %user.email, "Session restored");
                session.init(token, Some(user));
            }
            Err(err) => tracing::warn!(error = %err, "Could not resolve current user"),
        }
        return Ok(());
    }
    if let Some(email) = config.auth.email.as_deref() {
        let password = std::env::var(PASSWORD_ENV).map_err(|_| ClientError::MissingEnv(PASSWORD_ENV))?;
        session.login(gateway, &LoginCredentials::new(email, password)).await?;
    }
    Ok(())
}
