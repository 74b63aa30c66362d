//! Request handlers.
//!
//! Both handlers are stateless: the response depends only on the request.

use std::fmt;

use crate::http::request::Request;
use crate::http::response::Response;

/// Why a remote address could not be split into host and port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrError {
    /// No `:` separator at all, e.g. a bare `1.2.3.4`.
    MissingPort,
    /// More than one `:` outside brackets, e.g. a bare IPv6 address.
    TooManyColons,
    /// `[` without a matching `]`.
    MissingBracket,
    /// A bracket where none is allowed.
    UnexpectedBracket,
}

impl fmt::Display for AddrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddrError::MissingPort => write!(f, "missing port in address"),
            AddrError::TooManyColons => write!(f, "too many colons in address"),
            AddrError::MissingBracket => write!(f, "missing ']' in address"),
            AddrError::UnexpectedBracket => write!(f, "unexpected bracket in address"),
        }
    }
}

impl std::error::Error for AddrError {}

/// Splits `host:port` or `[host]:port` into its host and port.
///
/// The port may be empty. IPv6 hosts lose their brackets.
///
/// # Example
///
/// ```
/// # use ipecho::handlers::{split_host_port, AddrError};
/// assert_eq!(split_host_port("1.2.3.4:80"), Ok(("1.2.3.4", "80")));
/// assert_eq!(split_host_port("[::1]:443"), Ok(("::1", "443")));
/// assert_eq!(split_host_port("1.2.3.4"), Err(AddrError::MissingPort));
/// ```
pub fn split_host_port(addr: &str) -> Result<(&str, &str), AddrError> {
    let colon = addr.rfind(':').ok_or(AddrError::MissingPort)?;

    let host = if let Some(rest) = addr.strip_prefix('[') {
        let end = rest.find(']').ok_or(AddrError::MissingBracket)?;
        // "]" must be followed directly by the last colon
        match end + 2 {
            after if after == colon => {}
            after if after == addr.len() => return Err(AddrError::MissingPort),
            _ if addr.as_bytes().get(end + 2) == Some(&b':') => {
                return Err(AddrError::TooManyColons);
            }
            _ => return Err(AddrError::MissingPort),
        }
        &rest[..end]
    } else {
        let host = &addr[..colon];
        if host.contains(':') {
            return Err(AddrError::TooManyColons);
        }
        host
    };

    let port = &addr[colon + 1..];

    if host.contains(['[', ']']) || port.contains(['[', ']']) {
        return Err(AddrError::UnexpectedBracket);
    }

    Ok((host, port))
}

/// Host part of `addr`, or `addr` unchanged when it has no usable port.
pub fn remote_host(addr: &str) -> &str {
    match split_host_port(addr) {
        Ok((host, _port)) => host,
        Err(e) => {
            tracing::debug!(remote_addr = addr, reason = %e, "Using raw remote address");
            addr
        }
    }
}

/// Responds with the caller's IP address followed by a newline.
pub fn echo_remote_addr(req: &Request) -> Response {
    let host = remote_host(&req.remote_addr);
    Response::ok(format!("{}\n", host))
}

/// Responds with the fixed 404 page.
pub fn not_found(_req: &Request) -> Response {
    Response::not_found()
}
