use std::sync::Arc;

use anyhow::Context;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::http::parser::parse_http_request;
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;
use crate::routing::{self, Router};
use crate::store::FileStore;

/// Default size of the single read a connection performs.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

/// One accepted client, served for exactly one request.
///
/// The connection owns its stream, so dropping it (also while unwinding)
/// closes the socket.
pub struct Connection<S, F> {
    stream: S,
    router: Arc<Router>,
    store: Arc<F>,
    buffer_size: usize,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S, F> Connection<S, F>
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: FileStore,
{
    pub fn new(stream: S, router: Arc<Router>, store: Arc<F>) -> Self {
        Self {
            stream,
            router,
            store,
            buffer_size: DEFAULT_READ_BUFFER_SIZE,
            state: ConnectionState::Reading,
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Runs the read → parse → route → write cycle, then shuts the stream
    /// down whatever the outcome.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.serve().await;

        self.state = ConnectionState::Closed;
        if let Err(e) = self.stream.shutdown().await {
            debug!("Shutdown after response failed: {}", e);
        }

        result
    }

    async fn serve(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => match self.read_request().await? {
                    Some(req) => {
                        self.state = ConnectionState::Processing(req);
                    }
                    None => {
                        self.state = ConnectionState::Closed;
                    }
                },

                ConnectionState::Processing(req) => {
                    let response =
                        routing::dispatch(&self.router, req, self.store.as_ref()).await?;
                    debug!(
                        method = %req.method,
                        path = %req.path,
                        status = response.status.as_u16(),
                        "Request handled"
                    );

                    let writer = ResponseWriter::new(&response);
                    self.state = ConnectionState::Writing(writer);
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    // One request per connection.
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads once into a fixed-size buffer and parses what arrived.
    ///
    /// Returns `None` when the client closed without sending anything.
    /// Anything past the buffer size is never read.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        let mut buffer = BytesMut::zeroed(self.buffer_size);
        let n = self
            .stream
            .read(&mut buffer)
            .await
            .context("failed to read request")?;

        if n == 0 {
            debug!("Client closed connection before sending a request");
            return Ok(None);
        }

        buffer.truncate(n);
        let request = parse_http_request(&buffer).context("HTTP parse error")?;

        Ok(Some(request))
    }
}
