//! Matching against a realistic REST route table.
//!
//! The table mirrors the Parse REST API: literal, parameter and wildcard
//! routes sharing prefixes, several methods per resource, and one route
//! (`/1/:type/Category/Item`) that competes with the class routes.

use http::Method;
use proptest::prelude::*;
use waypoint_router::{MethodFilter, Router};

const PARSE_API: &[(&str, &str)] = &[
    // Objects
    ("POST", "/1/classes/:className"),
    ("GET", "/1/classes/:className/:objectId"),
    ("PUT", "/1/classes/:className/:objectId"),
    ("GET", "/1/classes/:className"),
    ("DELETE", "/1/classes/:className/:objectId"),
    ("GET", "/1/:type/Category/Item"),
    // Users
    ("POST", "/1/users"),
    ("GET", "/1/login"),
    ("GET", "/1/users/:objectId"),
    ("PUT", "/1/users/:objectId"),
    ("GET", "/1/users"),
    ("DELETE", "/1/users/:objectId"),
    ("POST", "/1/requestPasswordReset"),
    // Roles
    ("POST", "/1/Roles"),
    ("GET", "/1/Roles/:objectId"),
    ("PUT", "/1/Roles/:objectId"),
    ("GET", "/1/Roles"),
    ("DELETE", "/1/Roles/:objectId"),
    // Files
    ("POST", "/1/files/:fileName"),
    // Analytics
    ("POST", "/1/events/:eventName"),
    // Push Notifications
    ("POST", "/1/push"),
    // Installations
    ("POST", "/1/installations"),
    ("GET", "/1/installations/:objectId"),
    ("PUT", "/1/installations/:objectId"),
    ("GET", "/1/installations"),
    ("DELETE", "/1/installations/:objectId"),
    // Cloud Functions
    ("GET", "/1/functions/*"),
];

/// Each route's handler is its own `METHOD pattern` label.
fn parse_api_router() -> Router<String> {
    let mut router = Router::new();
    for (method, pattern) in PARSE_API {
        let filter: MethodFilter = method.parse().unwrap();
        router
            .add(filter, pattern, [format!("{method} {pattern}")])
            .unwrap();
    }
    router
}

fn matched_pattern(router: &Router<String>, method: &Method, path: &str) -> Option<String> {
    router.find(method, path).map(|m| m.pattern.to_string())
}

#[test]
fn test_every_route_matches_itself() {
    let router = parse_api_router();
    assert_eq!(router.len(), PARSE_API.len());

    for (method, pattern) in PARSE_API {
        let method: Method = method.parse().unwrap();
        let path = pattern.replace(":", "x").replace('*', "rest");
        let found = router.find(&method, &path).unwrap();
        assert_eq!(&*found.pattern, *pattern, "{method} {path}");
        assert_eq!(found.handlers[0], format!("{method} {pattern}"));
    }
}

#[test]
fn test_trailing_slash_matches_literal() {
    let router = parse_api_router();
    assert_eq!(
        matched_pattern(&router, &Method::GET, "/1/users/").as_deref(),
        Some("/1/users")
    );
}

#[test]
fn test_two_params_bound() {
    let router = parse_api_router();
    let found = router.find(&Method::GET, "/1/classes/a/Obj").unwrap();

    assert_eq!(&*found.pattern, "/1/classes/:className/:objectId");
    assert_eq!(found.params.get("className"), Some("a"));
    assert_eq!(found.params.get("objectId"), Some("Obj"));
}

#[test]
fn test_no_chain_for_method_is_no_match() {
    let router = parse_api_router();
    assert!(router.find(&Method::POST, "/1/classes/a/Obj").is_none());
}

#[test]
fn test_fewer_params_beat_literal_prefix() {
    let router = parse_api_router();
    let found = router.find(&Method::GET, "/1/classes/Category/Item").unwrap();

    assert_eq!(&*found.pattern, "/1/:type/Category/Item");
    assert_eq!(found.params.get("type"), Some("classes"));
    assert_eq!(found.params.len(), 1);
}

#[test]
fn test_wildcard_with_empty_suffix() {
    let router = parse_api_router();
    let found = router.find(&Method::GET, "/1/functions/").unwrap();

    assert_eq!(&*found.pattern, "/1/functions/*");
    assert_eq!(found.wildcard.as_deref(), Some(""));
}

#[test]
fn test_wildcard_with_deep_suffix() {
    let router = parse_api_router();
    let found = router
        .find(&Method::GET, "/1/functions/funcA/hello-world")
        .unwrap();

    assert_eq!(&*found.pattern, "/1/functions/*");
    assert_eq!(found.wildcard.as_deref(), Some("funcA/hello-world"));
}

#[test]
fn test_literals_ignore_case() {
    let router = parse_api_router();

    assert_eq!(
        matched_pattern(&router, &Method::GET, "/1/roles").as_deref(),
        Some("/1/Roles")
    );
    assert_eq!(
        matched_pattern(&router, &Method::GET, "/1/USERS/Abc").as_deref(),
        Some("/1/users/:objectId")
    );
    let found = router.find(&Method::GET, "/1/USERS/Abc").unwrap();
    assert_eq!(found.params.get("objectId"), Some("Abc"));
}

#[test]
fn test_user_scenario() {
    let mut router = Router::new();
    router.add(Method::GET, "/1/users/:id", ["getUser"]).unwrap();
    router.add(Method::GET, "/1/functions/*", ["callFunction"]).unwrap();

    let found = router.find(&Method::GET, "/1/users/abc").unwrap();
    assert_eq!(found.params.get("id"), Some("abc"));
    assert_eq!(&*found.handlers, &["getUser"]);

    let found = router.find(&Method::GET, "/1/functions/foo/bar").unwrap();
    assert_eq!(&*found.handlers, &["callFunction"]);
    assert_eq!(found.wildcard.as_deref(), Some("foo/bar"));

    assert!(router.find(&Method::DELETE, "/1/users/abc").is_none());
}

#[test]
fn test_unknown_paths() {
    let router = parse_api_router();

    assert!(router.find(&Method::GET, "/").is_none());
    assert!(router.find(&Method::GET, "/2/users").is_none());
    assert!(router.find(&Method::GET, "/1/users/a/b").is_none());
    assert!(router.find(&Method::PATCH, "/1/users/abc").is_none());
}

fn segment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("1".to_string()),
        Just("classes".to_string()),
        Just("users".to_string()),
        Just("Roles".to_string()),
        Just("functions".to_string()),
        Just("Category".to_string()),
        Just("Item".to_string()),
        "[a-zA-Z0-9_-]{1,8}",
    ]
}

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(segment_strategy(), 0..6).prop_map(|parts| format!("/{}", parts.join("/")))
}

fn method_strategy() -> impl Strategy<Value = Method> {
    prop::sample::select(waypoint_router::METHODS.to_vec())
}

proptest! {
    #[test]
    fn prop_matching_is_deterministic(method in method_strategy(), path in path_strategy()) {
        let first = parse_api_router();
        let second = parse_api_router();

        let a = matched_pattern(&first, &method, &path);
        let b = matched_pattern(&first, &method, &path);
        let c = matched_pattern(&second, &method, &path);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&a, &c);
    }

    #[test]
    fn prop_bound_values_come_from_the_path(method in method_strategy(), path in path_strategy()) {
        let router = parse_api_router();
        if let Some(found) = router.find(&method, &path) {
            let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            for (_, value) in found.params.iter() {
                prop_assert!(parts.contains(&value));
            }
            prop_assert_eq!(found.handlers.len(), 1);
        }
    }

    #[test]
    fn prop_case_does_not_change_the_winner(method in method_strategy(), path in path_strategy()) {
        let router = parse_api_router();
        let lower = matched_pattern(&router, &method, &path.to_lowercase());
        let upper = matched_pattern(&router, &method, &path.to_uppercase());
        prop_assert_eq!(lower, upper);
    }
}
