//! ipecho - tells callers their IP address.
//!
//! `GET /` answers with the caller's address as plain text; every other path
//! gets a 404. The HTTP/1.1 transport is in [`http`] and [`server`].

pub mod config;
pub mod handlers;
pub mod http;
pub mod router;
pub mod server;
