//! Per-navigation access decisions
//!
//! The guard only reads the cached session snapshot. It never talks to the
//! backend, so a token revoked server side is noticed on the next dispatched
//! operation rather than here.

use tracing::debug;

use super::routes::{default_routes, RouteTable};
use crate::api::endpoints::normalize_path;
use crate::config::NavigationConfig;
use crate::session::{Role, Session, SessionStore};

/// Authentication state the guard reasons about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Unauthenticated,
    AuthenticatedUser,
    AuthenticatedAdmin,
}

impl GuardState {
    pub fn from_session(session: Option<&Session>) -> Self {
        match session.map(Session::role) {
            None => GuardState::Unauthenticated,
            Some(Role::Admin) => GuardState::AuthenticatedAdmin,
            Some(Role::User) => GuardState::AuthenticatedUser,
        }
    }

    fn role(self) -> Option<Role> {
        match self {
            GuardState::Unauthenticated => None,
            GuardState::AuthenticatedUser => Some(Role::User),
            GuardState::AuthenticatedAdmin => Some(Role::Admin),
        }
    }
}

/// Outcome of one navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(String),
}

#[derive(Debug, Clone)]
pub struct NavigationGuard {
    session: SessionStore,
    routes: RouteTable,
    config: NavigationConfig,
}

impl NavigationGuard {
    pub fn new(session: SessionStore, config: NavigationConfig) -> Self {
        Self::with_routes(session, config, default_routes())
    }

    pub fn with_routes(session: SessionStore, config: NavigationConfig, routes: RouteTable) -> Self {
        Self {
            session,
            routes,
            config,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Decide a navigation attempt from `from` to `to`
    pub async fn evaluate(&self, from: &str, to: &str) -> Decision {
        let snapshot = self.session.snapshot().await;
        let state = GuardState::from_session(snapshot.as_ref());
        let decision = decide(&self.routes, &self.config, state, to);
        debug!(from, to, ?state, ?decision, "Navigation evaluated");
        decision
    }
}

fn landing(config: &NavigationConfig, state: GuardState) -> &str {
    match state {
        GuardState::AuthenticatedAdmin => &config.admin_landing,
        _ => &config.landing,
    }
}

/// Pure decision for a target path given an authentication state
pub fn decide(routes: &RouteTable, config: &NavigationConfig, state: GuardState, to: &str) -> Decision {
    if let Some(target) = routes.alias_target(to) {
        return Decision::Redirect(target.to_string());
    }

    let path = normalize_path(to);
    let policy = routes.policy_for(path);

    if policy.requires_auth && state == GuardState::Unauthenticated {
        return Decision::Redirect(config.login.clone());
    }

    if path == normalize_path(&config.login) && state != GuardState::Unauthenticated {
        return Decision::Redirect(landing(config, state).to_string());
    }

    if let Some(required) = policy.requires_role {
        if state.role() != Some(required) {
            return Decision::Redirect(config.landing.clone());
        }
    }

    Decision::Allow
}
