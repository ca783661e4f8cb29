//! Integration tests for the routing engine.
//!
//! Drives `Router` end to end: settings loaded from TOML, controllers
//! discovered on disk, URLs parsed and generated in both addressing styles.

use std::sync::Arc;

use waypoint_core::settings_loader;
use waypoint_core::{ErrorKind, Settings};
use waypoint_http::urls::controllers::FsControllerResolver;
use waypoint_http::{GenerateWarning, Params, RouteMatch, Router};

const SETTINGS: &str = r#"
debug = false

[request]
host = "example.com"
web_root = "/app"

[routes]
"blog.archive" = 'year<\d+>/month<\d+>:1/day:1'
"blog.show" = 'id<\d+>'
"#;

/// Lays out `default`, `blog`, `admin/user` and `shop/default` controllers.
fn controller_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::write(root.join("default.rs"), "").unwrap();
    std::fs::write(root.join("blog.rs"), "").unwrap();
    std::fs::create_dir_all(root.join("admin")).unwrap();
    std::fs::write(root.join("admin").join("user.rs"), "").unwrap();
    std::fs::create_dir_all(root.join("shop")).unwrap();
    std::fs::write(root.join("shop").join("default.rs"), "").unwrap();
    dir
}

fn settings() -> Settings {
    settings_loader::from_toml_str(SETTINGS).unwrap()
}

fn router_with(settings: &Settings, dir: &tempfile::TempDir) -> Router {
    Router::from_settings(settings, Arc::new(FsControllerResolver::new(dir.path(), "rs")))
}

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// ── Rewrite mode ────────────────────────────────────────────────────

#[test]
fn test_round_trip_without_grammar() {
    let dir = controller_tree();
    let router = router_with(&settings(), &dir);

    for (locator, controller, action) in [
        ("blog:list", "blog", "list"),
        ("admin/user:edit", "admin/user", "edit"),
        ("blog:index", "blog", "index"),
    ] {
        let url = router.generate(locator, &Params::new()).unwrap();
        let m = router.parse(&url).unwrap();
        assert_eq!(m, RouteMatch::new(controller, action), "round trip of {locator} via {url}");
    }
}

#[test]
fn test_default_route_omitted_and_parsed_back() {
    let dir = controller_tree();
    let router = router_with(&settings(), &dir);

    let url = router.generate("default:index", &Params::new()).unwrap();
    assert_eq!(url, "/app/");
    assert_eq!(router.parse(&url).unwrap(), RouteMatch::new("default", "index"));
    assert_eq!(router.parse("/app").unwrap(), RouteMatch::new("default", "index"));
}

#[test]
fn test_grammar_positional_defaults() {
    let dir = controller_tree();
    let router = router_with(&settings(), &dir);

    let m = router.parse("/app/blog/archive/2012").unwrap();
    assert_eq!(m.controller, "blog");
    assert_eq!(m.action, "archive");
    assert_eq!(m.params, params(&[("year", "2012"), ("month", "1"), ("day", "1")]));
}

#[test]
fn test_pattern_mismatch_is_not_found() {
    let dir = controller_tree();
    let router = router_with(&settings(), &dir);

    let err = router.parse("/app/blog/archive/abcd").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParamPatternMismatch);
    assert_eq!(err.status_code(), 404);
}

#[test]
fn test_path_too_deep_is_not_found() {
    let dir = controller_tree();
    let router = router_with(&settings(), &dir);

    let err = router.parse("/app/blog/archive/2012/1/1/extra").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathTooDeep);
    assert!(err.is_not_found());
}

#[test]
fn test_controller_resolution_failures() {
    let dir = controller_tree();
    let router = router_with(&settings(), &dir);

    let err = router.parse("/app/nope/list").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ControllerNotFound);

    let err = router.parse("/app/nope/").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ControllerNotFound);

    let err = router.parse("/app/admin/nope/list").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ControllerPathInvalid);

    let err = router.parse("/app/blog/bad-action").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidActionFormat);
}

#[test]
fn test_single_segment_is_default_controller_action() {
    let dir = controller_tree();
    let router = router_with(&settings(), &dir);

    let m = router.parse("/app/about").unwrap();
    assert_eq!(m, RouteMatch::new("default", "about"));
}

#[test]
fn test_directory_falls_back_to_its_default_controller() {
    let dir = controller_tree();
    let router = router_with(&settings(), &dir);

    let m = router.parse("/app/shop").unwrap();
    assert_eq!(m, RouteMatch::new("shop/default", "index"));
}

#[test]
fn test_extension_and_path_params_are_exclusive() {
    let dir = controller_tree();
    let router = router_with(&settings(), &dir);

    let url = router
        .generate("blog:archive.html", &params(&[("year", "2012")]))
        .unwrap();
    assert_eq!(url, "/app/blog/archive/2012/1/1");
    assert!(!url.contains(".html"));

    let url = router.generate("blog:list.html", &Params::new()).unwrap();
    assert_eq!(url, "/app/blog/list.html");
    let m = router.parse(&url).unwrap();
    assert_eq!(m.extension.as_deref(), Some("html"));
}

#[test]
fn test_query_params_merge_with_path_params() {
    let dir = controller_tree();
    let router = router_with(&settings(), &dir);

    let m = router.parse("/app/blog/show/7?ref=home&id=9").unwrap();
    assert_eq!(m.params, params(&[("id", "7"), ("ref", "home")]));
}

#[test]
fn test_query_value_beats_grammar_default() {
    let dir = controller_tree();
    let router = router_with(&settings(), &dir);

    let m = router.parse("/app/blog/archive/2012?month=5").unwrap();
    assert_eq!(m.params, params(&[("year", "2012"), ("month", "5"), ("day", "1")]));
}

#[test]
fn test_action_check_ignores_how_the_url_is_written() {
    let dir = controller_tree();
    let router = router_with(&settings(), &dir);

    for url in [
        "/app/blog/café",
        "/app/blog/caf%C3%A9",
        "http://example.com/app/blog/café",
    ] {
        let err = router.parse(url).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidActionFormat, "parsing {url}");
    }

    let err = router.generate("blog:café", &Params::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidLocator);
}

#[test]
fn test_missing_default_is_a_warning() {
    let dir = controller_tree();
    let router = router_with(&settings(), &dir);

    let generated = router
        .generate_with_diagnostics("blog:show", &Params::new())
        .unwrap();
    assert_eq!(generated.url, "/app/blog/show/");
    assert_eq!(
        generated.warnings,
        vec![GenerateWarning::MissingDefault {
            route: "blog.show".to_string(),
            param: "id".to_string(),
        }]
    );
}

#[test]
fn test_complete_url_with_index_script_round_trips() {
    let dir = controller_tree();
    let mut settings = settings();
    settings.router.complete = true;
    settings.router.show_index = true;
    settings.request.port = Some(8080);
    let router = router_with(&settings, &dir);

    let url = router
        .generate("blog:show", &params(&[("id", "7"), ("ref", "a b")]))
        .unwrap();
    assert_eq!(url, "http://example.com:8080/app/index.php/blog/show/7?ref=a+b");

    let m = router.parse(&url).unwrap();
    assert_eq!(m.controller, "blog");
    assert_eq!(m.action, "show");
    assert_eq!(m.params, params(&[("id", "7"), ("ref", "a b")]));
}

#[test]
fn test_invalid_locator_is_server_error() {
    let dir = controller_tree();
    let router = router_with(&settings(), &dir);

    let err = router.generate("blog", &Params::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidLocator);
    assert_eq!(err.status_code(), 500);
}

// ── Query mode ──────────────────────────────────────────────────────

#[test]
fn test_query_mode_never_fails_on_missing_keys() {
    let dir = controller_tree();
    let mut settings = settings();
    settings.router.rewrite = false;
    let router = router_with(&settings, &dir);
    assert!(!router.is_rewrite());

    assert_eq!(router.parse("/?").unwrap(), RouteMatch::new("default", "index"));

    settings.router.controller = "home".to_string();
    settings.router.action = "welcome".to_string();
    let router = router_with(&settings, &dir);
    assert_eq!(router.parse("/app/?").unwrap(), RouteMatch::new("home", "welcome"));
}

#[test]
fn test_query_mode_round_trip() {
    let dir = controller_tree();
    let mut settings = settings();
    settings.router.rewrite = false;
    let router = router_with(&settings, &dir);

    let original = params(&[("year", "2012"), ("q", "rust & go")]);
    let url = router.generate("blog:archive", &original).unwrap();
    assert_eq!(url, "/app/?controller=blog&action=archive&q=rust+%26+go&year=2012");

    let m = router.parse(&url).unwrap();
    assert_eq!(m.controller, "blog");
    assert_eq!(m.action, "archive");
    assert_eq!(m.params, original);
}

// ── Grammar cache ───────────────────────────────────────────────────

#[test]
fn test_grammar_cache_compiles_once() {
    let dir = controller_tree();
    let router = router_with(&settings(), &dir);
    assert_eq!(router.grammar_cache().compilations(), 0);

    router.parse("/app/blog/archive/2012").unwrap();
    let first = router.grammar("blog", "archive").unwrap();
    let second = router.grammar("blog", "archive").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(router.grammar_cache().compilations(), 1);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_shared_router_across_threads() {
    let dir = controller_tree();
    let router = router_with(&settings(), &dir);

    std::thread::scope(|scope| {
        for i in 0..8 {
            let router = &router;
            scope.spawn(move || {
                let year = (2000 + i).to_string();
                let url = router
                    .generate("blog:archive", &params(&[("year", year.as_str())]))
                    .unwrap();
                let m = router.parse(&url).unwrap();
                assert_eq!(m.params.get("year"), Some(&year));
            });
        }
    });

    assert_eq!(router.grammar_cache().compilations(), 1);
}

// ── Settings files ──────────────────────────────────────────────────

#[test]
fn test_router_from_settings_file() {
    let dir = controller_tree();
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), SETTINGS).unwrap();

    let settings = settings_loader::from_toml_file(file.path()).unwrap();
    let router = router_with(&settings, &dir);

    let m = router.parse("http://example.com/app/blog/show/42").unwrap();
    assert_eq!(m.params.get("id").map(String::as_str), Some("42"));
}
