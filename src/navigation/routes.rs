//! Route access policies

use std::collections::HashMap;

use crate::api::endpoints::normalize_path;
use crate::session::Role;

/// Who may enter a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoutePolicy {
    pub requires_auth: bool,
    pub requires_role: Option<Role>,
}

impl RoutePolicy {
    pub const PUBLIC: Self = Self {
        requires_auth: false,
        requires_role: None,
    };

    pub const AUTHENTICATED: Self = Self {
        requires_auth: true,
        requires_role: None,
    };

    pub const ADMIN: Self = Self {
        requires_auth: true,
        requires_role: Some(Role::Admin),
    };
}

/// Registered paths, their policies and path aliases
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    policies: HashMap<String, RoutePolicy>,
    aliases: HashMap<String, String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, path: &str, policy: RoutePolicy) -> Self {
        self.policies
            .insert(normalize_path(path).to_string(), policy);
        self
    }

    /// Visiting `from` lands on `to` instead
    pub fn alias(mut self, from: &str, to: &str) -> Self {
        self.aliases
            .insert(normalize_path(from).to_string(), to.to_string());
        self
    }

    pub fn alias_target(&self, path: &str) -> Option<&str> {
        self.aliases.get(normalize_path(path)).map(String::as_str)
    }

    /// Policy of the path or its closest registered parent.
    ///
    /// Unregistered paths are public.
    pub fn policy_for(&self, path: &str) -> RoutePolicy {
        let mut current = normalize_path(path);
        loop {
            if let Some(policy) = self.policies.get(current) {
                return *policy;
            }
            match current.rfind('/') {
                Some(0) | None => return RoutePolicy::PUBLIC,
                Some(idx) => current = &current[..idx],
            }
        }
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

/// The application's page layout
pub fn default_routes() -> RouteTable {
    RouteTable::new()
        .route("/login", RoutePolicy::PUBLIC)
        .route("/knowledge", RoutePolicy::AUTHENTICATED)
        .route("/chat", RoutePolicy::AUTHENTICATED)
        .route("/search", RoutePolicy::AUTHENTICATED)
        .route("/profile", RoutePolicy::AUTHENTICATED)
        .route("/dashboard", RoutePolicy::ADMIN)
        .route("/models", RoutePolicy::ADMIN)
        .route("/users", RoutePolicy::ADMIN)
        .alias("/", "/knowledge")
}
