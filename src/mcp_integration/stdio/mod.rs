//! MCP over stdio
//!
//! The session reads line-delimited JSON-RPC from its input and writes to
//! its output. Each client request runs in its own task so that a
//! `create-random-user` call waiting on the client's sampling answer does not
//! block the read loop that will deliver that answer. All output goes
//! through a single writer task, one line per message.
//!
//! # Example
//!
//! ```rust,no_run
//! use user_directory::config::ServerConfig;
//! use user_directory::mcp_integration::stdio::serve_stdio;
//! use user_directory::storage::JsonFileStorage;
//! use user_directory::store::UserStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::default();
//! let store = UserStore::serialized(JsonFileStorage::new(&config.data_file));
//! serve_stdio(store, &config).await?;
//! # Ok(())
//! # }
//! ```

pub mod dispatch;
pub mod jsonrpc;
pub mod peer;
pub mod transport;

pub use dispatch::{LATEST_PROTOCOL_VERSION, client_supports_sampling, dispatch};
pub use jsonrpc::{IncomingMessage, JsonRpcOutput, MessageError, RequestId};
pub use peer::ClientPeer;
pub use transport::{InputLine, LineReader, LineWriter, TransportError};

use crate::config::ServerConfig;
use crate::mcp_integration::core::UserMcpServer;
use crate::storage::UserRepository;
use crate::store::UserStore;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// One client session over a reader/writer pair.
pub struct StdioSession<I, O> {
    reader: LineReader<I>,
    writer: LineWriter<O>,
    peer: ClientPeer,
    outgoing: mpsc::UnboundedReceiver<String>,
}

impl<I, O> StdioSession<I, O>
where
    I: AsyncRead + Unpin,
    O: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(input: I, output: O) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            reader: LineReader::new(input),
            writer: LineWriter::new(output),
            peer: ClientPeer::new(tx),
            outgoing: rx,
        }
    }

    /// The client handle; pass it to the server as its sampling channel.
    ///
    /// [`run`](Self::run) returns once every clone of the handle is dropped,
    /// so give this one to the server rather than holding on to it.
    pub fn peer(&self) -> ClientPeer {
        self.peer.clone()
    }

    /// Serve requests until the input reaches EOF.
    ///
    /// Requests still running at EOF are allowed to finish and their
    /// responses are written before this returns. Sampling requests still
    /// waiting on the client fail as disconnected.
    pub async fn run<R>(self, server: UserMcpServer<R, ClientPeer>) -> Result<(), TransportError>
    where
        R: UserRepository + 'static,
    {
        let Self {
            mut reader,
            writer,
            peer,
            outgoing,
        } = self;

        info!(
            "MCP server {} v{} starting on stdio",
            server.server_info().name,
            server.server_info().version
        );

        let writer_task = tokio::spawn(writer.drain(outgoing));
        let server = Arc::new(server);
        let mut requests = JoinSet::new();

        let read_result = loop {
            let line = match reader.read_line().await {
                Ok(Some(InputLine::Text(line))) if line.is_empty() => continue,
                Ok(Some(InputLine::Text(line))) => line,
                Ok(Some(InputLine::NotUtf8(e))) => {
                    let e = MessageError::Parse(format!("invalid UTF-8: {}", e));
                    warn!("Failed to parse JSON-RPC message: {}", e);
                    peer.send_output(&JsonRpcOutput::error(None, e.code(), e.to_string()));
                    continue;
                }
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            };

            match IncomingMessage::parse(&line) {
                Ok(IncomingMessage::Request(request)) => {
                    if request.method == "initialize" {
                        peer.set_supports_sampling(client_supports_sampling(
                            request.params.as_ref(),
                        ));
                    }
                    let server = Arc::clone(&server);
                    let peer = peer.clone();
                    requests.spawn(async move {
                        let output = dispatch(&*server, &request).await;
                        peer.send_output(&output);
                    });
                }
                Ok(IncomingMessage::Notification(notification)) => {
                    debug!("Received notification {}", notification.method);
                }
                Ok(IncomingMessage::Response { id, outcome }) => {
                    if !peer.complete(&id, outcome) {
                        warn!("Response for unknown request id {:?}", id);
                    }
                }
                Err(e) => {
                    warn!("Failed to parse JSON-RPC message: {}", e);
                    peer.send_output(&JsonRpcOutput::error(None, e.code(), e.to_string()));
                }
            }

            while let Some(finished) = requests.try_join_next() {
                if let Err(e) = finished {
                    error!("Request task failed: {}", e);
                }
            }
        };

        match &read_result {
            Ok(()) => info!("Input closed, shutting down"),
            Err(e) => error!("Input failed, shutting down: {}", e),
        }

        peer.close();
        while let Some(finished) = requests.join_next().await {
            if let Err(e) = finished {
                error!("Request task failed: {}", e);
            }
        }

        // The writer stops once every sender is gone.
        drop(server);
        drop(peer);
        let write_result = writer_task
            .await
            .map_err(|e| TransportError::Writer(e.to_string()))?;

        read_result.and(write_result)
    }
}

/// Serve `store` on the process's stdin and stdout.
pub async fn serve_stdio<R>(store: UserStore<R>, config: &ServerConfig) -> Result<(), TransportError>
where
    R: UserRepository + 'static,
{
    let session = StdioSession::new(tokio::io::stdin(), tokio::io::stdout());
    let server = UserMcpServer::from_config(store, session.peer(), config);
    session.run(server).await
}
