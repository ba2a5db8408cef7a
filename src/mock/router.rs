//! Priority-ordered registry resolving endpoints to simulated envelopes

use regex::Regex;
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, warn};

use super::state::{MockData, MockState};
use super::token::{validate_token, Claims};
use super::{handlers, HandlerResult, MockError};
use crate::api::endpoints::normalize_path;
use crate::api::Envelope;
use crate::error::Result;

/// Which endpoints a registry entry answers
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Exactly this path
    Exact(String),
    /// This path or anything nested below it (`/a/b` matches `/a/b/c`, not `/a/bc`)
    Prefix(String),
    Pattern(Regex),
}

impl Predicate {
    pub fn exact(path: &str) -> Self {
        Predicate::Exact(normalize_path(path).to_string())
    }

    pub fn prefix(path: &str) -> Self {
        Predicate::Prefix(normalize_path(path).to_string())
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Predicate::Pattern)
            .map_err(|e| crate::error::Error::Mock(format!("Invalid route pattern: {}", e)))
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Predicate::Exact(p) => p == path,
            Predicate::Prefix(p) => {
                path == p
                    || path
                        .strip_prefix(p.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            Predicate::Pattern(re) => re.is_match(path),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Exact(p) => write!(f, "{}", p),
            Predicate::Prefix(p) => write!(f, "{}/*", p),
            Predicate::Pattern(re) => write!(f, "~{}", re.as_str()),
        }
    }
}

/// What a handler sees besides its parameters
pub struct MockContext<'a> {
    state: &'a MockState,
    bearer: Option<&'a str>,
}

impl<'a> MockContext<'a> {
    /// Claims of the bearer token attached to the request
    pub fn caller(&self) -> std::result::Result<Claims, MockError> {
        let token = self
            .bearer
            .ok_or_else(|| MockError::Unauthenticated("Please log in first".to_string()))?;
        validate_token(token)
    }

    pub fn data<R>(&self, f: impl FnOnce(&mut MockData) -> R) -> R {
        self.state.with(f)
    }
}

type Handler = Box<dyn Fn(&MockContext<'_>, &Value) -> HandlerResult + Send + Sync>;

struct Route {
    predicate: Predicate,
    handler: Handler,
}

/// Simulated backend.
///
/// Routes are tried in registration order and the first match wins, so a
/// specific predicate must be registered before any broader one covering it.
/// Endpoints nothing matches resolve to an empty success envelope.
pub struct MockRouter {
    routes: Vec<Route>,
    shadowed: Vec<String>,
    state: MockState,
}

impl MockRouter {
    /// Empty registry over the given fixture state
    pub fn new(state: MockState) -> Self {
        Self {
            routes: Vec::new(),
            shadowed: Vec::new(),
            state,
        }
    }

    /// Seeded fixtures with every built-in handler registered
    pub fn with_default_routes() -> Result<Self> {
        let mut router = Self::new(MockState::seeded()?);
        handlers::register_defaults(&mut router);
        Ok(router)
    }

    /// Append a route at the lowest priority
    pub fn register<F>(&mut self, predicate: Predicate, handler: F) -> &mut Self
    where
        F: Fn(&MockContext<'_>, &Value) -> HandlerResult + Send + Sync + 'static,
    {
        if let Predicate::Exact(path) = &predicate {
            if let Some(earlier) = self.routes.iter().find(|r| r.predicate.matches(path)) {
                warn!(route = %path, shadowed_by = %earlier.predicate, "Mock route is unreachable");
                self.shadowed.push(path.clone());
            }
        }
        self.routes.push(Route {
            predicate,
            handler: Box::new(handler),
        });
        self
    }

    /// Exact routes registered after a broader predicate already covering them
    pub fn shadowed_routes(&self) -> &[String] {
        &self.shadowed
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn state(&self) -> &MockState {
        &self.state
    }

    pub fn resolve(&self, endpoint: &str, params: &Value) -> Envelope {
        self.resolve_as(endpoint, params, None)
    }

    /// Resolve with the caller's bearer token available to handlers
    pub fn resolve_as(&self, endpoint: &str, params: &Value, bearer: Option<&str>) -> Envelope {
        let path = normalize_path(endpoint);
        let Some(route) = self.routes.iter().find(|r| r.predicate.matches(path)) else {
            debug!(%path, "No mock route, answering with empty success");
            return Envelope::success(json!({}));
        };

        let ctx = MockContext {
            state: &self.state,
            bearer,
        };
        match (route.handler)(&ctx, params) {
            Ok(payload) => Envelope::success(payload),
            Err(err) => {
                debug!(%path, "Mock handler rejected request: {}", err);
                err.into_envelope()
            }
        }
    }
}

impl fmt::Debug for MockRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes: Vec<String> = self.routes.iter().map(|r| r.predicate.to_string()).collect();
        f.debug_struct("MockRouter").field("routes", &routes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::state::MockData;

    fn empty_router() -> MockRouter {
        MockRouter::new(MockState::new(MockData::default()))
    }

    #[test]
    fn test_prefix_respects_segments() {
        let p = Predicate::prefix("/api/models/update");
        assert!(p.matches("/api/models/update"));
        assert!(p.matches("/api/models/update/batch"));
        assert!(!p.matches("/api/models/update-status"));
    }

    #[test]
    fn test_first_match_wins() {
        let mut router = empty_router();
        router
            .register(Predicate::exact("/api/models/update-status"), |_, _| Ok(json!("status")))
            .register(Predicate::pattern("^/api/models/update").unwrap(), |_, _| Ok(json!("update")));

        assert_eq!(router.resolve("/api/models/update-status", &json!({})).payload, json!("status"));
        assert_eq!(router.resolve("/api/models/update", &json!({})).payload, json!("update"));
        assert!(router.shadowed_routes().is_empty());
    }

    #[test]
    fn test_general_before_specific_is_reported() {
        let mut router = empty_router();
        router
            .register(Predicate::pattern("^/api/models/update").unwrap(), |_, _| Ok(json!("update")))
            .register(Predicate::exact("/api/models/update-status"), |_, _| Ok(json!("status")));

        assert_eq!(router.shadowed_routes(), ["/api/models/update-status".to_string()]);
        assert_eq!(router.resolve("/api/models/update-status", &json!({})).payload, json!("update"));
    }

    #[test]
    fn test_unmatched_is_empty_success() {
        let router = empty_router();
        let envelope = router.resolve("/api/not/registered", &json!({"x": 1}));
        assert!(envelope.is_success());
        assert_eq!(envelope.payload, json!({}));
    }

    #[test]
    fn test_validation_becomes_business_envelope() {
        let mut router = empty_router();
        router.register(Predicate::exact("/api/x"), |_, _| {
            Err(MockError::validation(3001, "Session ID is required"))
        });
        let envelope = router.resolve("/api/x", &json!({}));
        assert_eq!(envelope.status_code, 3001);
        assert_eq!(envelope.message, "Session ID is required");
    }

    #[test]
    fn test_caller_requires_token() {
        let mut router = empty_router();
        router.register(Predicate::exact("/api/me"), |ctx, _| {
            let claims = ctx.caller()?;
            Ok(json!(claims.username))
        });
        assert_eq!(router.resolve("/api/me", &json!({})).status_code, 401);
        assert_eq!(router.resolve_as("/api/me", &json!({}), Some("garbage")).status_code, 401);
    }
}
