mod common;

use common::TestHandler;
use ipecho::handlers::{echo_remote_addr, not_found};
use ipecho::http::request::Method;
use ipecho::router::Router;

const TEXT_PLAIN: &str = "text/plain; charset=UTF-8";

#[test]
fn test_get_index_strips_port() {
    TestHandler::new(Router::ip_echo())
        .get("/")
        .assert_status_equals(200)
        .assert_body_equals("1.2.3.4\n")
        .assert_header_contains("Content-Type", TEXT_PLAIN);
}

#[test]
fn test_post_index_strips_port() {
    TestHandler::new(Router::ip_echo())
        .post("/")
        .assert_status_equals(200)
        .assert_body_equals("1.2.3.4\n");
}

#[test]
fn test_get_index_bare_host() {
    TestHandler::new(Router::ip_echo())
        .with_remote_addr("1.2.3.4")
        .get("/")
        .assert_status_equals(200)
        .assert_body_equals("1.2.3.4\n")
        .assert_header_contains("Content-Type", TEXT_PLAIN);
}

#[test]
fn test_get_invalid_url() {
    TestHandler::new(Router::ip_echo())
        .get("/non-existent")
        .assert_status_equals(404)
        .assert_body_equals("404 Not Found\n")
        .assert_header_contains("Content-Type", TEXT_PLAIN);
}

#[test]
fn test_handler_function_directly() {
    TestHandler::new(echo_remote_addr)
        .with_remote_addr("10.0.0.7:51234")
        .get("/anything")
        .assert_status_equals(200)
        .assert_body_equals("10.0.0.7\n");

    TestHandler::new(not_found)
        .get("/")
        .assert_status_equals(404)
        .assert_body_contains("Not Found");
}

#[test]
fn test_ipv6_remote_addresses() {
    TestHandler::new(Router::ip_echo())
        .with_remote_addr("[2001:db8::1]:443")
        .get("/")
        .assert_body_equals("2001:db8::1\n");

    TestHandler::new(Router::ip_echo())
        .with_remote_addr("::1")
        .get("/")
        .assert_body_equals("::1\n");
}

#[test]
fn test_malformed_address_is_echoed_raw() {
    TestHandler::new(Router::ip_echo())
        .with_remote_addr("[::1")
        .get("/")
        .assert_status_equals(200)
        .assert_body_equals("[::1\n");

    TestHandler::new(Router::ip_echo())
        .with_remote_addr("")
        .get("/")
        .assert_status_equals(200)
        .assert_body_equals("\n");
}

#[test]
fn test_every_method_gets_same_body() {
    let handler = TestHandler::new(Router::ip_echo());
    let expected = handler.get("/").0;

    for method in [
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::HEAD,
        Method::OPTIONS,
        Method::PATCH,
    ] {
        let response = handler.request(method, "/", &[]).0;
        assert_eq!(response, expected, "{} differs from GET", method);
    }
}

#[test]
fn test_repeated_requests_are_identical() {
    let handler = TestHandler::new(Router::ip_echo());
    let first = handler.get("/").0;
    for _ in 0..5 {
        assert_eq!(handler.get("/").0, first);
    }

    let missing = handler.get("/missing").0;
    assert_eq!(handler.get("/missing").0, missing);
}

#[test]
fn test_request_headers_do_not_affect_body() {
    TestHandler::new(Router::ip_echo())
        .request(Method::GET, "/", &[("X-Forwarded-For", "9.9.9.9")])
        .assert_body_equals("1.2.3.4\n");
}

#[test]
fn test_content_length_matches_body() {
    TestHandler::new(Router::ip_echo())
        .get("/")
        .assert_header_contains("Content-Length", "8");
    TestHandler::new(Router::ip_echo())
        .get("/nope")
        .assert_header_contains("Content-Length", "14");
}
