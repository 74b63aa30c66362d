use crate::http::request::{Method, Request};
use std::collections::HashMap;
use std::fmt;

/// Largest request head (request line plus headers) accepted.
pub const MAX_HEAD_SIZE: usize = 64 * 1024;

/// Largest request body accepted, framed by Content-Length or chunked.
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Longest chunk-size line (size plus extensions) in a chunked body.
const MAX_CHUNK_LINE: usize = 1024;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    InvalidRequest,
    InvalidMethod,
    InvalidHeader,
    InvalidContentLength,
    InvalidChunk,
    UnsupportedTransferEncoding,
    HeadTooLarge,
    BodyTooLarge,
    Incomplete,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidRequest => write!(f, "invalid request line"),
            ParseError::InvalidMethod => write!(f, "unsupported method"),
            ParseError::InvalidHeader => write!(f, "malformed header"),
            ParseError::InvalidContentLength => write!(f, "invalid Content-Length"),
            ParseError::InvalidChunk => write!(f, "malformed chunked body"),
            ParseError::UnsupportedTransferEncoding => write!(f, "unsupported Transfer-Encoding"),
            ParseError::HeadTooLarge => write!(f, "request head exceeds {} bytes", MAX_HEAD_SIZE),
            ParseError::BodyTooLarge => write!(f, "request body exceeds {} bytes", MAX_BODY_SIZE),
            ParseError::Incomplete => write!(f, "incomplete request"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses one request from the front of `buf`.
///
/// Returns the request and the number of bytes it occupied. The request's
/// `remote_addr` is left empty for the caller to fill in.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let headers_end = match find_headers_end(buf) {
        Some(end) if end > MAX_HEAD_SIZE => return Err(ParseError::HeadTooLarge),
        Some(end) => end,
        None if buf.len() > MAX_HEAD_SIZE => return Err(ParseError::HeadTooLarge),
        None => return Err(ParseError::Incomplete),
    };
    let header_bytes = &buf[..headers_end];
    let body_bytes = &buf[headers_end + 4..];

    let headers_str = std::str::from_utf8(header_bytes)
        .map_err(|_| ParseError::InvalidRequest)?;

    let mut lines = headers_str.split("\r\n");

    // Request line
    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let mut parts = request_line.split_whitespace();

    let method_str = parts.next().ok_or(ParseError::InvalidRequest)?;
    let path = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().ok_or(ParseError::InvalidRequest)?;

    if parts.next().is_some() || !version.starts_with("HTTP/") {
        return Err(ParseError::InvalidRequest);
    }

    let method = Method::from_str(method_str).ok_or(ParseError::InvalidMethod)?;

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        if line.is_empty() {
            continue;
        }

        let (key, value) = line
            .split_once(':')
            .ok_or(ParseError::InvalidHeader)?;

        let key = key.trim();
        if key.is_empty() {
            return Err(ParseError::InvalidHeader);
        }

        headers.insert(key.to_string(), value.trim().to_string());
    }

    // Body
    let header = |name: &str| {
        headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    };

    let (body, body_len) = match (header("Transfer-Encoding"), header("Content-Length")) {
        // Both framings at once is ambiguous
        (Some(_), Some(_)) => return Err(ParseError::InvalidRequest),
        (Some(te), None) if te.eq_ignore_ascii_case("chunked") => decode_chunked(body_bytes)?,
        (Some(_), None) => return Err(ParseError::UnsupportedTransferEncoding),
        (None, content_length) => {
            let content_length = content_length
                .map(|v| v.parse::<usize>().map_err(|_| ParseError::InvalidContentLength))
                .transpose()?
                .unwrap_or(0);

            if content_length > MAX_BODY_SIZE {
                return Err(ParseError::BodyTooLarge);
            }
            if body_bytes.len() < content_length {
                return Err(ParseError::Incomplete);
            }
            (body_bytes[..content_length].to_vec(), content_length)
        }
    };

    let request = Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body,
        remote_addr: String::new(),
    };

    let total_consumed = headers_end + 4 + body_len;
    Ok((request, total_consumed))
}

/// Decodes a chunked body from the front of `buf`.
///
/// Returns the decoded body and the number of wire bytes it occupied,
/// trailers included. Trailer fields are discarded.
fn decode_chunked(buf: &[u8]) -> Result<(Vec<u8>, usize), ParseError> {
    let mut body = Vec::new();
    let mut pos = 0;

    loop {
        let line_end = match find_crlf(&buf[pos..]) {
            Some(len) if len > MAX_CHUNK_LINE => return Err(ParseError::InvalidChunk),
            Some(len) => pos + len,
            None if buf.len() - pos > MAX_CHUNK_LINE => return Err(ParseError::InvalidChunk),
            None => return Err(ParseError::Incomplete),
        };

        let line = std::str::from_utf8(&buf[pos..line_end])
            .map_err(|_| ParseError::InvalidChunk)?;
        let size_str = line.split(';').next().unwrap_or_default().trim();
        if size_str.is_empty() || !size_str.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseError::InvalidChunk);
        }
        let size = usize::from_str_radix(size_str, 16).map_err(|_| ParseError::BodyTooLarge)?;
        pos = line_end + 2;

        if size == 0 {
            return skip_trailers(buf, pos).map(|end| (body, end));
        }

        if size > MAX_BODY_SIZE - body.len() {
            return Err(ParseError::BodyTooLarge);
        }
        if buf.len() < pos + size + 2 {
            return Err(ParseError::Incomplete);
        }
        if &buf[pos + size..pos + size + 2] != b"\r\n" {
            return Err(ParseError::InvalidChunk);
        }

        body.extend_from_slice(&buf[pos..pos + size]);
        pos += size + 2;
    }
}

/// Skips trailer lines up to and including the terminating empty line.
fn skip_trailers(buf: &[u8], start: usize) -> Result<usize, ParseError> {
    let mut pos = start;

    loop {
        let Some(len) = find_crlf(&buf[pos..]) else {
            if buf.len() - start > MAX_HEAD_SIZE {
                return Err(ParseError::HeadTooLarge);
            }
            return Err(ParseError::Incomplete);
        };

        pos += len + 2;
        if len == 0 {
            return Ok(pos);
        }
    }
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4)
        .position(|w| w == b"\r\n\r\n")
}
