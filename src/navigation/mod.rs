//! Client-side route protection

pub mod guard;
pub mod routes;

pub use guard::{decide, Decision, GuardState, NavigationGuard};
pub use routes::{default_routes, RoutePolicy, RouteTable};

pub use crate::api::endpoints::normalize_path;
