//! Single entry point every logical operation goes through

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::envelope::Envelope;
use super::redirect::AuthRedirect;
use super::result::{ApiError, ApiResult};
use super::transport::{LiveTransport, RequestOptions};
use crate::config::{TransportConfig, TransportMode};
use crate::error::Result;
use crate::mock::MockRouter;
use crate::session::SessionStore;

/// Where envelopes come from
#[derive(Debug, Clone)]
pub enum Transport {
    /// In-process simulation, answered after a fixed delay
    Mock {
        router: Arc<MockRouter>,
        delay: Duration,
    },
    Live(LiveTransport),
}

impl Transport {
    /// Build the transport selected by `config.mode`
    pub fn from_config(config: &TransportConfig) -> Result<Self> {
        match config.mode {
            TransportMode::Live => Ok(Transport::Live(LiveTransport::new(config)?)),
            TransportMode::Mock => Ok(Transport::Mock {
                router: Arc::new(MockRouter::with_default_routes()?),
                delay: config.mock_delay(),
            }),
        }
    }

    pub fn mode(&self) -> TransportMode {
        match self {
            Transport::Mock { .. } => TransportMode::Mock,
            Transport::Live(_) => TransportMode::Live,
        }
    }
}

/// Sends logical operations through the configured transport and
/// normalizes every outcome into an [`ApiResult`].
///
/// A `401` from either transport clears the session and raises the
/// deduplicated login redirect before the error is returned.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    transport: Transport,
    session: SessionStore,
    redirect: Arc<AuthRedirect>,
}

impl Dispatcher {
    pub fn new(transport: Transport, session: SessionStore, redirect: Arc<AuthRedirect>) -> Self {
        Self {
            transport,
            session,
            redirect,
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn redirect(&self) -> &Arc<AuthRedirect> {
        &self.redirect
    }

    /// Token read from storage at dispatch time
    async fn bearer(&self) -> Option<String> {
        match self.session.load().await {
            Ok(session) => session.map(|s| s.token),
            Err(e) => {
                warn!("Could not read session, sending without credentials: {}", e);
                None
            }
        }
    }

    async fn exchange(&self, endpoint: &str, options: RequestOptions, bearer: Option<&str>) -> ApiResult<Envelope> {
        match &self.transport {
            Transport::Mock { router, delay } => {
                tokio::time::sleep(*delay).await;
                let params = options.payload.to_params();
                Ok(router.resolve_as(endpoint, &params, bearer))
            }
            Transport::Live(live) => live.exchange(endpoint, options, bearer).await,
        }
    }

    /// Perform one logical operation and return its payload
    pub async fn invoke(&self, endpoint: &str, options: RequestOptions) -> ApiResult<Value> {
        let bearer = if options.requires_auth {
            self.bearer().await
        } else {
            None
        };
        debug!(
            %endpoint,
            mode = %self.transport.mode(),
            authenticated = bearer.is_some(),
            "Dispatching"
        );

        let result = self
            .exchange(endpoint, options, bearer.as_deref())
            .await
            .and_then(Envelope::into_result);

        if let Err(err) = &result {
            if err.is_auth_required() {
                self.on_auth_required().await;
            }
            debug!(%endpoint, kind = %err.kind, "Operation failed: {}", err.message);
        }
        result
    }

    /// [`invoke`](Self::invoke) and decode the payload into `T`
    pub async fn call<T: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> ApiResult<T> {
        let payload = self.invoke(endpoint, options).await?;
        serde_json::from_value(payload).map_err(|e| {
            warn!(%endpoint, "Payload did not match the expected shape: {}", e);
            ApiError::network("Malformed response from server")
        })
    }

    async fn on_auth_required(&self) {
        if let Err(e) = self.session.clear().await {
            warn!("Failed to clear session after 401: {}", e);
        }
        if self.redirect.trigger() {
            info!("Session expired, login required");
        }
    }
}
