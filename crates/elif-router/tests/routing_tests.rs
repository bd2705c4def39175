use elif_router::{
    handler, register_controller, to, Env, HttpMethod, Registrar, Response, RouteInfo, Router,
    RouterBuilder, RoutingError, ScopeOptions,
};
use http::StatusCode;

fn text(body: &'static str) -> impl Fn(&mut Env) -> Response + Send + Sync {
    move |_: &mut Env| Response::ok().text(body)
}

fn request(uri: &str) -> Env {
    let request = http::Request::builder().uri(uri).body(()).unwrap();
    Env::from_request(&request)
}

fn mounted_router(host: Option<&str>) -> Router {
    let mut builder = RouterBuilder::new();
    match host {
        Some(host) => builder.mount_on_host("/admin", host, text("admin")).unwrap(),
        None => builder.mount("/admin", text("admin")).unwrap(),
    };
    builder.freeze()
}

/// Test that constraints decide whether a route matches
#[test]
fn test_constrained_route() {
    let mut builder = RouterBuilder::new();
    builder
        .get("/books/:id", to("books#show").constraint("id", r"^\d+$"))
        .unwrap();
    let router = builder.freeze();

    assert!(router.recognize(&Env::get("/books/82")).is_some());
    assert!(router.recognize(&Env::get("/books/pickaxe")).is_none());
}

/// Test that a constraint failure falls through to the next candidate
#[test]
fn test_constraint_failure_falls_through() {
    let mut builder = RouterBuilder::new();
    builder
        .get("/books/:id", handler(text("by id")).constraint("id", "int"))
        .unwrap();
    builder.get("/books/:slug", handler(text("by slug"))).unwrap();
    let router = builder.freeze();

    let mut env = Env::get("/books/pickaxe");
    assert_eq!(router.call(&mut env).unwrap().body(), "by slug");
    assert_eq!(env.params.get("slug"), Some("pickaxe"));
}

/// Test that mounts match by literal prefix
#[test]
fn test_mount_prefix_matching() {
    let router = mounted_router(None);

    assert!(router.recognize(&Env::get("/admin")).is_some());
    assert!(router.recognize(&Env::get("/admin/books")).is_some());
    assert!(router.recognize(&Env::get("/")).is_none());
    assert!(router.recognize(&Env::get("/books")).is_none());
    assert!(router.recognize(&Env::get("/administrator")).is_some());
}

/// Test that mounts answer every supported verb
#[test]
fn test_mount_answers_every_verb() {
    let router = mounted_router(None);

    for verb in [HttpMethod::GET, HttpMethod::POST, HttpMethod::DELETE, HttpMethod::OPTIONS] {
        let mut env = Env::new(verb.into(), "/admin/books");
        assert_eq!(router.call(&mut env).unwrap().body(), "admin");
    }
}

/// Test host-restricted mounts
#[test]
fn test_mount_host_matching() {
    let router = mounted_router(Some(r"^api\."));

    assert!(router.recognize(&request("http://example.com/admin")).is_none());
    assert!(router.recognize(&request("http://api.example.com/admin")).is_some());

    let forwarded = Env::get("/admin")
        .with_host("example.com")
        .with_forwarded_host("api.example.com");
    assert!(router.recognize(&forwarded).is_some());

    let forwarded_chain = Env::get("/admin")
        .with_host("api.example.com")
        .with_forwarded_host("api.example.com, example.com");
    assert!(router.recognize(&forwarded_chain).is_none());
}

/// Test that forwarded hosts can be ignored by configuration
#[test]
fn test_untrusted_forwarded_host() {
    let config = elif_router::RouterConfig {
        trust_forwarded_host: false,
        ..Default::default()
    };
    let mut builder = RouterBuilder::with_config(config).unwrap();
    builder
        .mount_on_host("/admin", r"^api\.", text("admin"))
        .unwrap();
    let router = builder.freeze();

    let env = Env::get("/admin")
        .with_host("example.com")
        .with_forwarded_host("api.example.com");
    assert!(router.recognize(&env).is_none());
}

/// Test nested routers mounted as applications
#[test]
fn test_nested_router_params_are_merged() {
    let mut inner = RouterBuilder::new();
    inner
        .get(
            "/accounts/:account/invoices/:id",
            handler(|env: &mut Env| {
                let body = format!(
                    "{}/{}",
                    env.params.get("tenant").unwrap_or("-"),
                    env.params.get("id").unwrap_or("-")
                );
                Response::ok().text(body)
            }),
        )
        .unwrap();
    let inner = inner.freeze();

    let mut outer = RouterBuilder::new();
    outer.mount("/", inner).unwrap();
    let outer = outer.freeze();

    let mut env = Env::get("/accounts/7/invoices/12");
    env.params.insert("tenant", Some("acme".to_string()));
    let response = outer.call(&mut env).unwrap();
    assert_eq!(response.body(), "acme/12");
    assert_eq!(env.params.get("account"), Some("7"));
}

/// Test the not-found sentinel for an unmatched nested router
#[test]
fn test_nested_router_cascades() {
    let inner = RouterBuilder::new().freeze();
    let mut outer = RouterBuilder::new();
    outer.mount("/api", inner).unwrap();
    let outer = outer.freeze();

    let response = outer.call(&mut Env::get("/api/missing")).unwrap();
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.is_cascade());
}

/// Test optional groups during dispatch
#[test]
fn test_optional_segments() {
    let mut builder = RouterBuilder::new();
    builder
        .get("/pages/:id(/:title)?", to("pages#show").name("page"))
        .unwrap();
    let router = builder.freeze();

    let matched = router.recognize(&Env::get("/pages/54/eloquent-ruby")).unwrap();
    assert_eq!(matched.params.get("id"), Some("54"));
    assert_eq!(matched.params.get("title"), Some("eloquent-ruby"));

    let matched = router.recognize(&Env::get("/pages/54")).unwrap();
    assert_eq!(matched.params.get("id"), Some("54"));
    assert_eq!(matched.params.get("title"), None);
    assert!(matched.params.contains_key("title"));
}

/// Test controller references resolved at call time
#[test]
fn test_controller_dispatch() {
    let mut builder = RouterBuilder::new();
    builder
        .namespace("library", |library| {
            library.get("/shelves/:id", to("shelves#show"))?;
            Ok(())
        })
        .unwrap();
    let router = builder.freeze();

    let mut env = Env::get("/library/shelves/3");
    assert_eq!(
        router.call(&mut env),
        Err(RoutingError::UnresolvedController(
            "Library::Shelves".to_string()
        ))
    );

    register_controller("library/shelves", |env: &mut Env| {
        Response::ok().text(format!(
            "{}#{} {}",
            env.controller.clone().unwrap_or_default(),
            env.action.clone().unwrap_or_default(),
            env.params.get("id").unwrap_or_default()
        ))
    });

    let mut env = Env::get("/library/shelves/3");
    let response = router.call(&mut env).unwrap();
    assert_eq!(response.body(), "Library::Shelves#show 3");
}

/// Test the nested namespace scenario
#[test]
fn test_nested_namespaces() {
    let mut builder = RouterBuilder::new();
    builder
        .namespace("species", |species| {
            species.namespace("mammals", |mammals| {
                mammals.get("/cats", to("cats#index").name("cats"))?;
                Ok(())
            })
        })
        .unwrap();
    let router = builder.freeze();

    let route = router.named("species_mammals_cats").unwrap();
    assert_eq!(route.path(), "/species/mammals/cats");
    assert_eq!(route.endpoint().describe(), "Species::Mammals::Cats#index");
}

/// Test scopes with only some prefixes set
#[test]
fn test_partial_scope() {
    let mut builder = RouterBuilder::new();
    builder
        .scope(ScopeOptions::new().path("v1"), |v1| {
            v1.get("/books", to("books#index").name("books"))?;
            Ok(())
        })
        .unwrap();

    let route = builder.named("books").unwrap();
    assert_eq!(route.path(), "/v1/books");
    assert_eq!(route.endpoint().describe(), "Books#index");
}

/// Test that route listings serialize
#[test]
fn test_route_info_serialization() {
    let mut builder = RouterBuilder::new();
    builder.get("/books/:id", to("books#show").name("book")).unwrap();
    let router = builder.freeze();

    let json = serde_json::to_value(router.routes()).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{
            "verbs": ["GET"],
            "path": "/books/:id",
            "name": "book",
            "params": ["id"],
            "endpoint": "Books#show",
            "mount": false
        }])
    );

    let parsed: Vec<RouteInfo> = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, router.routes());
}

/// Test that the frozen router can be shared between threads
#[test]
fn test_router_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Router>();

    let mut builder = RouterBuilder::new();
    builder.get("/ping", handler(text("pong"))).unwrap();
    let router = std::sync::Arc::new(builder.freeze());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let router = std::sync::Arc::clone(&router);
            std::thread::spawn(move || router.call(&mut Env::get("/ping")).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().body(), "pong");
    }
}
