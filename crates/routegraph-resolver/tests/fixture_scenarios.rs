//! End-to-end resolution of realistic application layouts.
//!
//! Each scenario declares routers, routes and inclusions the way a web
//! framework front end would report them and checks the complete route
//! table: paths, merged metadata and ordering.

use routegraph_resolver::routegraph_core::{HttpMethod, Inclusion, Route, RouteTable, Router};
use routegraph_resolver::routegraph_store::DeclarationStore;
use routegraph_resolver::{
    ConflictPolicy, ResolveError, ResolverConfig, TableOrder, resolve, resolve_with,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn keys(table: &RouteTable) -> Vec<String> {
    table
        .iter()
        .map(|e| format!("{} {}", e.method, e.path))
        .collect()
}

fn get(path: &str) -> Route {
    Route::new(HttpMethod::Get, path)
}

fn post(path: &str) -> Route {
    Route::new(HttpMethod::Post, path)
}

// =============================================================================
// Scenario 1: nested routers with edge prefixes
// =============================================================================

/// Root routes, a prefixed users router, an unprefixed auth router mounted
/// under api_v1 with an edge prefix, and an empty api_v2.
fn nested_app() -> DeclarationStore {
    let mut store = DeclarationStore::with_root("app");
    let app = store.root_id().clone();

    let users = store
        .add_router(Router::new("user_router").with_prefix("/users"))
        .unwrap();
    let api_v1 = store
        .add_router(Router::new("api_v1").with_prefix("/api/v1"))
        .unwrap();
    let api_v2 = store
        .add_router(Router::new("api_v2").with_prefix("/api/v2"))
        .unwrap();
    let auth = store.add_router(Router::new("auth_router")).unwrap();

    store.add_route(&users, get("/")).unwrap();
    store.add_route(&users, get("/{user_id}")).unwrap();
    store.add_route(&users, post("/")).unwrap();
    store.add_route(&auth, post("/login")).unwrap();
    store.add_route(&auth, post("/logout")).unwrap();
    store.add_route(&auth, get("/profile")).unwrap();
    store.add_route(&app, get("/")).unwrap();
    store.add_route(&app, get("/health")).unwrap();

    store.add_inclusion(&app, &users, Inclusion::new()).unwrap();
    store
        .add_inclusion(&api_v1, &auth, Inclusion::new().with_prefix("/auth"))
        .unwrap();
    store.add_inclusion(&app, &api_v1, Inclusion::new()).unwrap();
    store.add_inclusion(&app, &api_v2, Inclusion::new()).unwrap();

    store
}

#[test]
fn nested_routers_resolve_to_full_paths() {
    let table = resolve(&nested_app()).unwrap();

    assert_eq!(
        keys(&table),
        vec![
            "GET /",
            "GET /health",
            "GET /users/",
            "GET /users/{user_id}",
            "POST /users/",
            "POST /api/v1/auth/login",
            "POST /api/v1/auth/logout",
            "GET /api/v1/auth/profile",
        ]
    );
}

#[test]
fn sorted_order_groups_by_path() {
    let config = ResolverConfig::default().with_order(TableOrder::Sorted);
    let table = resolve_with(&nested_app(), &config).unwrap();

    assert_eq!(
        keys(&table),
        vec![
            "GET /",
            "POST /api/v1/auth/login",
            "POST /api/v1/auth/logout",
            "GET /api/v1/auth/profile",
            "GET /health",
            "GET /users/",
            "POST /users/",
            "GET /users/{user_id}",
        ]
    );
}

#[test]
fn edge_prefix_mounts_unprefixed_router() {
    let mut store = DeclarationStore::with_root("app");
    let app = store.root_id().clone();
    let api_v1 = store
        .add_router(Router::new("api_v1").with_prefix("/api/v1"))
        .unwrap();
    let profile = store.add_router(Router::new("profile_router")).unwrap();

    store
        .add_route(
            &profile,
            Route::builder(HttpMethod::Get, "/profile")
                .handler("get_profile")
                .build(),
        )
        .unwrap();
    store
        .add_route(
            &profile,
            Route::builder(HttpMethod::Put, "/profile")
                .handler("update_profile")
                .build(),
        )
        .unwrap();

    store
        .add_inclusion(&api_v1, &profile, Inclusion::new().with_prefix("/user"))
        .unwrap();
    store.add_inclusion(&app, &api_v1, Inclusion::new()).unwrap();

    let table = resolve(&store).unwrap();
    assert_eq!(
        keys(&table),
        vec!["GET /api/v1/user/profile", "PUT /api/v1/user/profile"]
    );
    assert_eq!(table.endpoints[1].handler.as_deref(), Some("update_profile"));
}

// =============================================================================
// Scenario 2: five-endpoint application
// =============================================================================

#[test]
fn api_v1_users_has_exactly_five_endpoints() {
    let mut store = DeclarationStore::with_root("app");
    let app = store.root_id().clone();
    store.add_route(&app, get("/")).unwrap();
    store.add_route(&app, get("/health")).unwrap();

    let users = store
        .add_router(Router::new("users").with_prefix("/users"))
        .unwrap();
    store.add_route(&users, get("/")).unwrap();
    store.add_route(&users, get("/{user_id}")).unwrap();
    store.add_route(&users, post("/")).unwrap();

    let api_v1 = store
        .add_router(Router::new("api_v1").with_prefix("/api/v1"))
        .unwrap();
    store.add_inclusion(&api_v1, &users, Inclusion::new()).unwrap();
    store.add_inclusion(&app, &api_v1, Inclusion::new()).unwrap();

    let table = resolve(&store).unwrap();
    assert_eq!(table.len(), 5);
    assert!(table.find(&HttpMethod::Get, "/users/").is_none());
    assert!(table.find(&HttpMethod::Get, "/api/v1/users/{user_id}").is_some());
}

// =============================================================================
// Scenario 3: metadata-rich manifest
// =============================================================================

const ENHANCED_MANIFEST: &str = r#"{
    "root": { "id": "app" },
    "routers": [
        { "id": "users_router", "prefix": "/users", "tags": ["users"], "dependencies": ["get_db_session"] },
        { "id": "products_router", "prefix": "/products" },
        { "id": "admin_router", "prefix": "/admin", "tags": ["admin"] },
        { "id": "api_v1", "prefix": "/api/v1", "tags": ["v1"] }
    ],
    "routes": [
        { "router": "users_router", "method": "GET", "path": "/", "summary": "List users",
          "response_model": "List[UserResponse]", "tags": ["users", "list"], "dependencies": ["get_current_user"] },
        { "router": "users_router", "method": "GET", "path": "/{user_id}", "summary": "Get user",
          "response_model": "UserResponse", "tags": ["users", "detail"], "dependencies": ["get_db_session"] },
        { "router": "users_router", "method": "POST", "path": "/", "summary": "Create user",
          "response_model": "UserResponse", "tags": ["users", "create"], "status_code": 201 },
        { "router": "users_router", "method": "DELETE", "path": "/{user_id}", "summary": "Delete user",
          "tags": ["users", "delete"], "deprecated": true, "dependencies": ["get_current_user", "get_db_session"] },
        { "router": "products_router", "method": "GET", "path": "/", "response_model": "List[ProductModel]", "tags": ["products"] },
        { "router": "products_router", "method": "POST", "path": "/", "response_model": "ProductModel",
          "tags": ["products", "create"], "dependencies": ["get_current_user"] },
        { "router": "admin_router", "method": "GET", "path": "/dashboard", "tags": ["admin", "dashboard"],
          "dependencies": ["get_current_user"] },
        { "router": "admin_router", "method": "GET", "path": "/stats", "tags": ["admin", "statistics"],
          "dependencies": ["get_current_user", "get_db_session"] },
        { "router": "app", "method": "GET", "path": "/", "summary": "Root", "tags": ["root"] },
        { "router": "app", "method": "GET", "path": "/health", "tags": ["health", "monitoring"] }
    ],
    "inclusions": [
        { "parent": "api_v1", "child": "users_router" },
        { "parent": "api_v1", "child": "products_router", "tags": ["v1-products"] },
        { "parent": "app", "child": "admin_router" },
        { "parent": "app", "child": "api_v1" }
    ]
}"#;

#[test]
fn enhanced_manifest_merges_metadata() {
    let store = DeclarationStore::from_manifest_str(ENHANCED_MANIFEST).unwrap();
    let table = resolve(&store).unwrap();

    assert_eq!(
        keys(&table),
        vec![
            "GET /",
            "GET /health",
            "GET /admin/dashboard",
            "GET /admin/stats",
            "GET /api/v1/users/",
            "GET /api/v1/users/{user_id}",
            "POST /api/v1/users/",
            "DELETE /api/v1/users/{user_id}",
            "GET /api/v1/products/",
            "POST /api/v1/products/",
        ]
    );

    let list_users = table.find(&HttpMethod::Get, "/api/v1/users/").unwrap();
    assert_eq!(list_users.tags, vec!["v1", "users", "list"]);
    assert_eq!(
        list_users.dependencies,
        vec!["get_db_session", "get_current_user"]
    );
    assert_eq!(list_users.response_model.as_deref(), Some("List[UserResponse]"));

    let get_user = table
        .find(&HttpMethod::Get, "/api/v1/users/{user_id}")
        .unwrap();
    assert_eq!(get_user.dependencies, vec!["get_db_session"]);

    let create_user = table.find(&HttpMethod::Post, "/api/v1/users/").unwrap();
    assert_eq!(create_user.status_code, Some(201));

    let delete_user = table
        .find(&HttpMethod::Delete, "/api/v1/users/{user_id}")
        .unwrap();
    assert!(delete_user.deprecated);
    assert_eq!(
        delete_user.to_string(),
        "DELETE /api/v1/users/{user_id} - Delete user [v1, users, delete] [DEPRECATED] \
         (deps: get_db_session, get_current_user)"
    );

    let products = table.find(&HttpMethod::Get, "/api/v1/products/").unwrap();
    assert_eq!(products.tags, vec!["v1", "v1-products", "products"]);

    let stats = table.find(&HttpMethod::Get, "/admin/stats").unwrap();
    assert_eq!(stats.tags, vec!["admin", "statistics"]);
    assert_eq!(stats.dependencies, vec!["get_current_user", "get_db_session"]);

    assert!(table.iter().all(|e| !e.path.contains("//")));
}

// =============================================================================
// Scenario 4: diamond inclusion
// =============================================================================

#[test]
fn diamond_inclusion_yields_one_entry_per_route() {
    let mut store = DeclarationStore::with_root("app");
    let app = store.root_id().clone();
    let shared = store
        .add_router(Router::new("shared").with_prefix("/items"))
        .unwrap();
    let left = store.add_router(Router::new("left")).unwrap();
    let right = store.add_router(Router::new("right")).unwrap();

    store.add_route(&shared, get("/")).unwrap();
    store.add_route(&shared, post("/")).unwrap();

    store
        .add_inclusion(&left, &shared, Inclusion::new().with_tags(["left"]))
        .unwrap();
    store
        .add_inclusion(&right, &shared, Inclusion::new().with_tags(["right"]))
        .unwrap();
    store.add_inclusion(&app, &left, Inclusion::new()).unwrap();
    store.add_inclusion(&app, &right, Inclusion::new()).unwrap();

    let table = resolve(&store).unwrap();
    assert_eq!(keys(&table), vec!["GET /items/", "POST /items/"]);

    for endpoint in &table {
        assert_eq!(endpoint.tags, vec!["left", "right"]);
        assert_eq!(endpoint.inclusion_paths.len(), 2);
        assert_eq!(endpoint.routes.len(), 1);
    }
}

#[test]
fn same_router_at_two_prefixes_yields_two_entries() {
    let mut store = DeclarationStore::with_root("app");
    let app = store.root_id().clone();
    let items = store.add_router(Router::new("items")).unwrap();
    store.add_route(&items, get("/items")).unwrap();
    store
        .add_inclusion(&app, &items, Inclusion::new().with_prefix("/v1"))
        .unwrap();
    store
        .add_inclusion(&app, &items, Inclusion::new().with_prefix("/v2"))
        .unwrap();

    let table = resolve(&store).unwrap();
    assert_eq!(keys(&table), vec!["GET /v1/items", "GET /v2/items"]);
}

// =============================================================================
// Scenario 5: structural failures
// =============================================================================

#[test]
fn mutual_inclusion_fails_without_table() {
    let mut store = DeclarationStore::with_root("app");
    let app = store.root_id().clone();
    let a = store.add_router(Router::new("a")).unwrap();
    let b = store.add_router(Router::new("b")).unwrap();
    store.add_route(&a, get("/ok")).unwrap();
    store.add_inclusion(&app, &a, Inclusion::new()).unwrap();
    store.add_inclusion(&a, &b, Inclusion::new()).unwrap();
    store.add_inclusion(&b, &a, Inclusion::new()).unwrap();

    let result = resolve(&store);
    assert!(matches!(result, Err(ResolveError::CyclicInclusion { .. })));
}

#[test]
fn unreferenced_router_never_surfaces() {
    let mut store = DeclarationStore::with_root("app");
    let orphan = store
        .add_router(Router::new("orphan").with_prefix("/orphan"))
        .unwrap();
    store.add_route(&orphan, get("/")).unwrap();

    let table = resolve(&store).unwrap();
    assert!(table.is_empty());
}

#[test]
fn conflicting_models_reported_per_endpoint() {
    let mut store = DeclarationStore::with_root("app");
    let app = store.root_id().clone();
    let v1 = store.add_router(Router::new("v1")).unwrap();
    let legacy = store.add_router(Router::new("legacy")).unwrap();
    store
        .add_route(
            &v1,
            Route::builder(HttpMethod::Get, "/me").response_model("User").build(),
        )
        .unwrap();
    store
        .add_route(
            &legacy,
            Route::builder(HttpMethod::Get, "/me")
                .response_model("LegacyUser")
                .build(),
        )
        .unwrap();
    store.add_route(&legacy, get("/ping")).unwrap();
    store.add_inclusion(&app, &v1, Inclusion::new()).unwrap();
    store.add_inclusion(&app, &legacy, Inclusion::new()).unwrap();

    let err = resolve(&store).unwrap_err();
    assert_eq!(
        err.to_string(),
        "conflicting response models for GET /me: User vs LegacyUser"
    );

    let config = ResolverConfig::default().with_conflict_policy(ConflictPolicy::Collect);
    let table = resolve_with(&store, &config).unwrap();
    assert_eq!(keys(&table), vec!["GET /ping"]);
    assert_eq!(table.warnings[0].models, vec!["User", "LegacyUser"]);
}
