//! Mock router tests through its public surface
//!
//! Run with: cargo test --test mock_router_tests

use ragdesk::api::{codes, ErrorKind};
use ragdesk::mock::{MockError, MockRouter, MockState, Predicate};
use serde_json::json;

fn login(router: &MockRouter, username: &str, password: &str) -> String {
    let envelope = router.resolve(
        "/api/auth/login",
        &json!({ "username": username, "password": password }),
    );
    assert_eq!(envelope.status_code, codes::SUCCESS, "{}", envelope.message);
    envelope.payload["token"].as_str().unwrap().to_string()
}

#[test]
fn test_default_routes_have_no_shadowing() {
    let router = MockRouter::with_default_routes().unwrap();
    assert!(router.shadowed_routes().is_empty());
    assert!(router.route_count() > 50);
}

#[test]
fn test_query_and_trailing_slash_ignored() {
    let router = MockRouter::with_default_routes().unwrap();
    let plain = router.resolve("/api/search/doc-types", &json!({}));
    let decorated = router.resolve("/api/search/doc-types/?v=2", &json!({}));
    assert_eq!(plain.payload, decorated.payload);
}

#[test]
fn test_unknown_endpoint_succeeds_empty() {
    let router = MockRouter::with_default_routes().unwrap();
    let envelope = router.resolve("/api/does/not/exist", &json!({ "x": 1 }));
    assert!(envelope.is_success());
    assert_eq!(envelope.payload, json!({}));
}

#[test]
fn test_pattern_routes() {
    let mut router = MockRouter::new(MockState::new(Default::default()));
    router.register(Predicate::pattern(r"^/api/files/\d+$").unwrap(), |_, _| Ok(json!("file")));
    router.register(Predicate::prefix("/api/files"), |_, _| Ok(json!("listing")));

    assert_eq!(router.resolve("/api/files/42", &json!({})).payload, "file");
    assert_eq!(router.resolve("/api/files/abc", &json!({})).payload, "listing");
}

#[test]
fn test_shadowed_route_is_reported() {
    let mut router = MockRouter::new(MockState::new(Default::default()));
    router.register(Predicate::prefix("/api/models/update"), |_, _| Ok(json!("update")));
    router.register(Predicate::exact("/api/models/update-status"), |_, _| Ok(json!("status")));

    assert_eq!(router.shadowed_routes().len(), 0);

    router.register(Predicate::exact("/api/models/update/extra"), |_, _| Ok(json!("never")));
    assert_eq!(router.shadowed_routes().len(), 1);
    assert_eq!(router.resolve("/api/models/update/extra", &json!({})).payload, "update");
}

#[test]
fn test_handler_errors_map_to_envelopes() {
    let mut router = MockRouter::new(MockState::new(Default::default()));
    router.register(Predicate::exact("/v"), |_, _| Err(MockError::validation(4242, "Bad input")));
    router.register(Predicate::exact("/i"), |_, _| Err(MockError::Internal("boom".to_string())));

    let validation = router.resolve("/v", &json!({}));
    assert_eq!(validation.status_code, 4242);
    let err = validation.into_result().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Business);
    assert_eq!(err.message, "Bad input");

    let internal = router.resolve("/i", &json!({})).into_result().unwrap_err();
    assert_eq!(internal.kind, ErrorKind::Server);
    assert!(!internal.message.contains("boom"));
}

#[test]
fn test_identity_scoped_handlers() {
    let router = MockRouter::with_default_routes().unwrap();

    let anonymous = router.resolve("/api/user/profile", &json!({}));
    assert_eq!(anonymous.status_code, codes::AUTH_REQUIRED);

    let token = login(&router, "user", "user123");
    let profile = router.resolve_as("/api/user/profile", &json!({}), Some(&token));
    assert_eq!(profile.payload["username"], "user");
    assert_eq!(profile.payload["role"], "user");
}

#[test]
fn test_created_records_are_listed() {
    let router = MockRouter::with_default_routes().unwrap();
    let token = login(&router, "admin", "admin123");

    let created = router.resolve_as(
        "/api/admin/users/create",
        &json!({
            "username": "zhaoliu",
            "password": "zhaoliu123",
            "name": "Zhao Liu",
            "email": "zhaoliu@company.com",
            "role": "user",
        }),
        Some(&token),
    );
    assert!(created.is_success(), "{}", created.message);

    let listed = router.resolve_as("/api/admin/users/list", &json!({ "keyword": "zhao" }), Some(&token));
    assert_eq!(listed.payload["total"], 1);

    // the new account can log in straight away
    login(&router, "zhaoliu", "zhaoliu123");
}
