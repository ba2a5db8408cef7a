//! One-stop wiring of session, transport, dispatcher and guard

use std::sync::Arc;
use tracing::info;

use crate::api::{AuthRedirect, Dispatcher, RedirectEvent, Transport};
use crate::config::{Config, TransportMode};
use crate::error::Result;
use crate::navigation::NavigationGuard;
use crate::session::SessionStore;

/// Everything a front end needs, sharing a single session store
#[derive(Debug, Clone)]
pub struct Client {
    dispatcher: Dispatcher,
    guard: NavigationGuard,
}

impl Client {
    /// Restore any stored session and build the configured transport
    pub async fn from_config(config: &Config) -> Result<Self> {
        let session = SessionStore::from_config(&config.session).await?;
        Self::with_session(config, session)
    }

    /// Like [`Client::from_config`] with a caller-supplied session store
    pub fn with_session(config: &Config, session: SessionStore) -> Result<Self> {
        let transport = Transport::from_config(&config.transport)?;
        let redirect = Arc::new(AuthRedirect::new(config.navigation.login.clone()));
        let dispatcher = Dispatcher::new(transport, session.clone(), redirect);
        let guard = NavigationGuard::new(session, config.navigation.clone());

        let target = match config.transport.mode {
            TransportMode::Live => config.transport.base_url.as_str(),
            TransportMode::Mock => "in-process mock",
        };
        info!(mode = %config.transport.mode, target, "Client ready");
        Ok(Self { dispatcher, guard })
    }

    pub fn api(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn session(&self) -> &SessionStore {
        self.dispatcher.session()
    }

    /// Login redirects raised by authentication failures
    pub fn redirects(&self) -> tokio::sync::broadcast::Receiver<RedirectEvent> {
        self.dispatcher.redirect().subscribe()
    }
}
