use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use crate::http::parser::{parse_http_request, ParseError};
use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::router::Service;

const READ_CHUNK: usize = 4096;

pub struct Connection<S> {
    stream: S,
    remote_addr: String,
    service: Arc<dyn Service>,
    buffer: BytesMut,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing { writer: ResponseWriter, keep_alive: bool },
    Closed,
}

/// Result of trying to read one request off the stream.
pub enum ReadOutcome {
    Request(Request),
    Malformed(ParseError),
    Eof,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// `remote_addr` is stamped onto every request read from `stream`.
    pub fn new(stream: S, remote_addr: impl Into<String>, service: Arc<dyn Service>) -> Self {
        Self {
            stream,
            remote_addr: remote_addr.into(),
            service,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        ReadOutcome::Request(req) => ConnectionState::Processing(req),
                        ReadOutcome::Malformed(e) => {
                            tracing::warn!(
                                remote_addr = %self.remote_addr,
                                error = %e,
                                "Rejecting malformed request"
                            );
                            let mut response = rejection(&e);
                            response.set_header("Connection", "close");
                            ConnectionState::Writing {
                                writer: ResponseWriter::new(&response, true),
                                keep_alive: false,
                            }
                        }
                        ReadOutcome::Eof => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let (response, keep_alive) = Self::handle_request(self.service.as_ref(), req);
                    let include_body = req.method != Method::HEAD;

                    let writer = ResponseWriter::new(&response, include_body);
                    self.state = ConnectionState::Writing { writer, keep_alive };
                }

                ConnectionState::Writing { writer, keep_alive } => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if *keep_alive {
                        self.state = ConnectionState::Reading;
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        tracing::debug!(remote_addr = %self.remote_addr, "Connection closed");
        Ok(())
    }

    pub async fn read_request(&mut self) -> anyhow::Result<ReadOutcome> {
        loop {
            match parse_http_request(&self.buffer) {
                Ok((mut request, consumed)) => {
                    self.buffer.advance(consumed);
                    request.remote_addr = self.remote_addr.clone();
                    return Ok(ReadOutcome::Request(request));
                }

                Err(ParseError::Incomplete) => {}

                Err(e) => return Ok(ReadOutcome::Malformed(e)),
            }

            self.buffer.reserve(READ_CHUNK);
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                if !self.buffer.is_empty() {
                    tracing::debug!(
                        remote_addr = %self.remote_addr,
                        pending = self.buffer.len(),
                        "Client closed mid-request"
                    );
                }
                return Ok(ReadOutcome::Eof);
            }
        }
    }

    fn handle_request(service: &dyn Service, req: &Request) -> (Response, bool) {
        let mut response = service.serve(req);
        let keep_alive = req.keep_alive();
        if !keep_alive {
            response.set_header("Connection", "close");
        }

        tracing::info!(
            remote_addr = %req.remote_addr,
            method = %req.method,
            path = %req.path,
            status = response.status.as_u16(),
            "Request served"
        );

        (response, keep_alive)
    }
}

/// Response sent before closing a connection whose request could not be read.
pub fn rejection(err: &ParseError) -> Response {
    match err {
        ParseError::BodyTooLarge => Response::error(StatusCode::PayloadTooLarge),
        ParseError::UnsupportedTransferEncoding => Response::error(StatusCode::NotImplemented),
        _ => Response::bad_request(),
    }
}
