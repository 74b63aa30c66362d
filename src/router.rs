//! Route lookup and dispatch.
//!
//! A `Router` is built once at start-up and shared read-only between
//! connections. Matching is on the exact path component; the query string is
//! ignored. Anything unmatched goes to the fallback handler.

use std::collections::HashMap;

use crate::handlers;
use crate::http::request::Request;
use crate::http::response::Response;

/// A request handler.
pub type Handler = fn(&Request) -> Response;

/// Anything that turns a request into a response.
pub trait Service: Send + Sync {
    fn serve(&self, req: &Request) -> Response;
}

impl<F> Service for F
where
    F: Fn(&Request) -> Response + Send + Sync,
{
    fn serve(&self, req: &Request) -> Response {
        self(req)
    }
}

#[derive(Clone)]
pub struct Router {
    routes: HashMap<String, Handler>,
    fallback: Handler,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// An empty router that answers everything with 404.
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            fallback: handlers::not_found,
        }
    }

    /// The service's route table: `/` echoes the caller's address.
    pub fn ip_echo() -> Self {
        Self::new()
            .route("/", handlers::echo_remote_addr)
            .fallback(handlers::not_found)
    }

    /// Binds `path` to `handler` for every method.
    pub fn route(mut self, path: impl Into<String>, handler: Handler) -> Self {
        self.routes.insert(path.into(), handler);
        self
    }

    pub fn fallback(mut self, handler: Handler) -> Self {
        self.fallback = handler;
        self
    }

    /// Handler for `req`, or the fallback.
    pub fn lookup(&self, req: &Request) -> Handler {
        self.routes
            .get(req.route_path())
            .copied()
            .unwrap_or(self.fallback)
    }
}

impl Service for Router {
    fn serve(&self, req: &Request) -> Response {
        (self.lookup(req))(req)
    }
}
