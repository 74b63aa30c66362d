//! Tests for route lookup and dispatch

use ipecho::http::request::{Method, Request, RequestBuilder};
use ipecho::http::response::{Response, StatusCode};
use ipecho::router::{Router, Service};

fn request(method: Method, path: &str) -> Request {
    RequestBuilder::new()
        .method(method)
        .path(path)
        .remote_addr("5.6.7.8:1234")
        .build()
        .unwrap()
}

fn teapot(_req: &Request) -> Response {
    Response::text(StatusCode::Ok, "teapot\n")
}

#[test]
fn test_root_routes_to_echo() {
    let router = Router::ip_echo();
    let response = router.serve(&request(Method::GET, "/"));

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"5.6.7.8\n".to_vec());
}

#[test]
fn test_query_string_is_ignored_for_matching() {
    let router = Router::ip_echo();
    let response = router.serve(&request(Method::GET, "/?format=text"));

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"5.6.7.8\n".to_vec());
}

#[test]
fn test_match_is_exact() {
    let router = Router::ip_echo();

    for path in ["/index.html", "//", "/ip", "/non-existent/", ""] {
        let response = router.serve(&request(Method::GET, path));
        assert_eq!(response.status, StatusCode::NotFound, "path {:?}", path);
        assert_eq!(response.body, b"404 Not Found\n".to_vec());
    }
}

#[test]
fn test_empty_router_falls_back_to_not_found() {
    let router = Router::new();
    let response = router.serve(&request(Method::POST, "/"));

    assert_eq!(response.status, StatusCode::NotFound);
}

#[test]
fn test_custom_routes_and_fallback() {
    let router = Router::new().route("/tea", teapot).fallback(teapot);

    assert_eq!(router.serve(&request(Method::GET, "/tea")).body, b"teapot\n".to_vec());
    assert_eq!(router.serve(&request(Method::GET, "/other")).body, b"teapot\n".to_vec());
}

#[test]
fn test_router_is_shareable_across_threads() {
    let router = std::sync::Arc::new(Router::ip_echo());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let router = router.clone();
            std::thread::spawn(move || router.serve(&request(Method::GET, "/")).body)
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), b"5.6.7.8\n".to_vec());
    }
}
