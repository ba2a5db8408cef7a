//! Session persistence across the persistent and ephemeral scopes

use crate::config::SessionConfig;
use crate::error::Result;
use crate::session::models::{Scope, Session, UserProfile};
use crate::session::storage::{FileStore, KeyValueStore, MemoryStore};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Slot holding the bearer token
pub const TOKEN_KEY: &str = "rag_token";
/// Slot holding the JSON-serialized user profile
pub const USER_INFO_KEY: &str = "rag_user_info";

/// Shared handle to the two session scopes.
///
/// Cloning is cheap; clones observe the same storage and snapshot.
#[derive(Clone)]
pub struct SessionStore {
    persistent: Arc<dyn KeyValueStore>,
    ephemeral: Arc<dyn KeyValueStore>,
    snapshot: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    /// Build a store over the given scopes and restore any existing session
    pub async fn open(
        persistent: Arc<dyn KeyValueStore>,
        ephemeral: Arc<dyn KeyValueStore>,
    ) -> Result<Self> {
        let store = Self {
            persistent,
            ephemeral,
            snapshot: Arc::new(RwLock::new(None)),
        };
        store.load().await?;
        Ok(store)
    }

    /// File-backed persistent scope under `config.dir`, in-memory ephemeral scope
    pub async fn from_config(config: &SessionConfig) -> Result<Self> {
        let persistent = Arc::new(FileStore::open(&config.dir)?);
        Self::open(persistent, Arc::new(MemoryStore::new())).await
    }

    /// Both scopes in memory
    pub async fn in_memory() -> Result<Self> {
        Self::open(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new())).await
    }

    fn scope(&self, scope: Scope) -> &dyn KeyValueStore {
        match scope {
            Scope::Persistent => self.persistent.as_ref(),
            Scope::Ephemeral => self.ephemeral.as_ref(),
        }
    }

    /// Persist a freshly authenticated session.
    ///
    /// Any previous session is wiped from both scopes first, so token and
    /// profile are always replaced together.
    pub async fn save(&self, token: &str, remember: bool, profile: &UserProfile) -> Result<()> {
        let scope = if remember {
            Scope::Persistent
        } else {
            Scope::Ephemeral
        };
        let profile_json = serde_json::to_string(profile)?;

        let mut snapshot = self.snapshot.write().await;
        *snapshot = None;
        self.wipe_scopes()?;

        // profile first: a token is never stored without its profile
        let target = self.scope(scope);
        let written = target
            .set(USER_INFO_KEY, &profile_json)
            .and_then(|()| target.set(TOKEN_KEY, token));
        if let Err(e) = written {
            warn!(%scope, "Session save failed, rolling back: {}", e);
            if let Err(rollback) = self.wipe_scopes() {
                warn!("Session rollback incomplete: {}", rollback);
            }
            return Err(e);
        }

        *snapshot = Some(Session {
            token: token.to_string(),
            scope,
            user: Some(profile.clone()),
        });
        info!(username = %profile.username, %scope, "Session saved");
        Ok(())
    }

    /// Read the current session from storage.
    ///
    /// The persistent scope is consulted first; the first present token wins.
    pub async fn load(&self) -> Result<Option<Session>> {
        let mut found = None;
        for scope in [Scope::Persistent, Scope::Ephemeral] {
            let store = self.scope(scope);
            if let Some(token) = store.get(TOKEN_KEY)?.filter(|t| !t.is_empty()) {
                let user = match store.get(USER_INFO_KEY)? {
                    Some(raw) => match serde_json::from_str::<UserProfile>(&raw) {
                        Ok(profile) => Some(profile),
                        Err(e) => {
                            warn!(%scope, "Ignoring unreadable stored profile: {}", e);
                            None
                        }
                    },
                    None => None,
                };
                found = Some(Session { token, scope, user });
                break;
            }
        }

        *self.snapshot.write().await = found.clone();
        Ok(found)
    }

    /// Remove token and profile from both scopes.
    ///
    /// Both scopes are always attempted; the first failure is returned.
    pub async fn clear(&self) -> Result<()> {
        let mut snapshot = self.snapshot.write().await;
        *snapshot = None;
        let result = self.wipe_scopes();
        match &result {
            Ok(()) => info!("Session cleared"),
            Err(e) => warn!("Session clear incomplete: {}", e),
        }
        result
    }

    fn wipe_scopes(&self) -> Result<()> {
        let mut first_error = None;
        for scope in [Scope::Persistent, Scope::Ephemeral] {
            let store = self.scope(scope);
            for key in [TOKEN_KEY, USER_INFO_KEY] {
                if let Err(e) = store.remove(key) {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Drop the ephemeral scope, as happens when the consuming process ends
    pub async fn discard_ephemeral(&self) -> Result<()> {
        self.ephemeral.clear()?;
        debug!("Ephemeral scope discarded");
        self.load().await?;
        Ok(())
    }

    /// Last session seen by `save`, `load` or `clear`, without touching storage
    pub async fn snapshot(&self) -> Option<Session> {
        self.snapshot.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.snapshot.read().await.is_some()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}
