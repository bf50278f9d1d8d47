//! The connected client, seen from the server.
//!
//! [`ClientPeer`] owns the outgoing half of the session. Responses to client
//! requests and the server's own `sampling/createMessage` requests are both
//! queued through it, and answers to the latter are routed back to the
//! waiting caller by request id.

use super::jsonrpc::{JsonRpcError, JsonRpcOutput, JsonRpcRequest, RequestId};
use crate::sampling::{SamplingClient, SamplingError, SamplingRequest, SamplingResponse};
use log::{debug, error, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};

/// Method name of the server-to-client sampling request.
pub const SAMPLING_METHOD: &str = "sampling/createMessage";

type PendingReply = oneshot::Sender<Result<Value, JsonRpcError>>;
type ReplyReceiver = oneshot::Receiver<Result<Value, JsonRpcError>>;

struct PeerState {
    outgoing: mpsc::UnboundedSender<String>,
    pending: Mutex<HashMap<i64, PendingReply>>,
    next_id: AtomicI64,
    supports_sampling: AtomicBool,
    closed: AtomicBool,
}

/// Handle to the connected client. Cheap to clone.
#[derive(Clone)]
pub struct ClientPeer {
    state: Arc<PeerState>,
}

impl ClientPeer {
    /// A peer whose output lines are sent to `outgoing`.
    pub fn new(outgoing: mpsc::UnboundedSender<String>) -> Self {
        Self {
            state: Arc::new(PeerState {
                outgoing,
                pending: Mutex::new(HashMap::new()),
                next_id: AtomicI64::new(1),
                supports_sampling: AtomicBool::new(false),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Record whether the client advertised the sampling capability.
    pub fn set_supports_sampling(&self, supported: bool) {
        self.state
            .supports_sampling
            .store(supported, Ordering::SeqCst);
    }

    pub fn supports_sampling(&self) -> bool {
        self.state.supports_sampling.load(Ordering::SeqCst)
    }

    /// Queue a response for writing.
    pub fn send_output(&self, output: &JsonRpcOutput) {
        match output.to_json() {
            Ok(line) => {
                self.send_line(line);
            }
            Err(e) => error!("Failed to serialize response: {}", e),
        }
    }

    fn send_line(&self, line: String) -> bool {
        if self.state.outgoing.send(line).is_err() {
            warn!("Output channel closed, dropping message");
            return false;
        }
        true
    }

    /// Deliver the client's answer to a server request.
    ///
    /// Returns `false` when no request with this id is waiting.
    pub fn complete(&self, id: &RequestId, outcome: Result<Value, JsonRpcError>) -> bool {
        let RequestId::Number(id) = id else {
            return false;
        };
        let Some(reply) = self.pending().remove(id) else {
            return false;
        };
        // The caller may have given up already.
        let _ = reply.send(outcome);
        true
    }

    /// Fail every waiting request and refuse new ones.
    pub fn close(&self) {
        self.state.closed.store(true, Ordering::SeqCst);
        let dropped = self.pending().drain().count();
        if dropped > 0 {
            debug!("Abandoned {} pending client request(s)", dropped);
        }
    }

    /// Number of server requests still waiting for an answer.
    pub fn pending_requests(&self) -> usize {
        self.pending().len()
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<i64, PendingReply>> {
        self.state
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn register(&self) -> Result<(i64, ReplyReceiver), SamplingError> {
        let id = self.state.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        let mut pending = self.pending();
        if self.state.closed.load(Ordering::SeqCst) {
            return Err(SamplingError::Disconnected);
        }
        pending.insert(id, tx);
        Ok((id, rx))
    }

    fn abandon(&self, id: i64) {
        self.pending().remove(&id);
    }
}

impl SamplingClient for ClientPeer {
    async fn create_message(
        &self,
        request: SamplingRequest,
    ) -> Result<SamplingResponse, SamplingError> {
        if !self.supports_sampling() {
            return Err(SamplingError::Unsupported);
        }

        let params = serde_json::to_value(&request).map_err(|e| SamplingError::Malformed {
            message: e.to_string(),
        })?;
        let (id, reply) = self.register()?;
        let message = JsonRpcRequest::new(RequestId::Number(id), SAMPLING_METHOD, Some(params));
        let line = match serde_json::to_string(&message) {
            Ok(line) => line,
            Err(e) => {
                self.abandon(id);
                return Err(SamplingError::Malformed {
                    message: e.to_string(),
                });
            }
        };

        debug!("Sending {} request {}", SAMPLING_METHOD, id);
        if !self.send_line(line) {
            self.abandon(id);
            return Err(SamplingError::Disconnected);
        }

        match reply.await {
            Ok(Ok(result)) => {
                serde_json::from_value(result).map_err(|e| SamplingError::Malformed {
                    message: e.to_string(),
                })
            }
            Ok(Err(error)) => Err(SamplingError::Rejected {
                code: i64::from(error.code),
                message: error.message,
            }),
            Err(_) => Err(SamplingError::Disconnected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn peer() -> (ClientPeer, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let peer = ClientPeer::new(tx);
        peer.set_supports_sampling(true);
        (peer, rx)
    }

    #[tokio::test]
    async fn test_sampling_request_round_trip() {
        let (peer, mut rx) = peer();

        let caller = {
            let peer = peer.clone();
            tokio::spawn(async move {
                peer.create_message(SamplingRequest::single_turn("hi", 1000))
                    .await
            })
        };

        let line = rx.recv().await.unwrap();
        let sent: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(sent["method"], SAMPLING_METHOD);
        assert_eq!(sent["params"]["maxTokens"], 1000);
        assert_eq!(sent["params"]["messages"][0]["content"]["text"], "hi");

        let id = RequestId::Number(sent["id"].as_i64().unwrap());
        assert!(peer.complete(
            &id,
            Ok(json!({"role": "assistant", "content": {"type": "text", "text": "ok"}}))
        ));

        let response = caller.await.unwrap().unwrap();
        assert_eq!(response.content.as_text(), Some("ok"));
        assert_eq!(peer.pending_requests(), 0);
    }

    #[tokio::test]
    async fn test_client_error_is_rejected() {
        let (peer, mut rx) = peer();
        let caller = {
            let peer = peer.clone();
            tokio::spawn(async move {
                peer.create_message(SamplingRequest::single_turn("hi", 10))
                    .await
            })
        };

        let sent: Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        let id = RequestId::Number(sent["id"].as_i64().unwrap());
        peer.complete(
            &id,
            Err(JsonRpcError {
                code: -1,
                message: "User rejected sampling request".into(),
                data: None,
            }),
        );

        let err = caller.await.unwrap().unwrap_err();
        assert!(matches!(err, SamplingError::Rejected { code: -1, .. }));
    }

    #[tokio::test]
    async fn test_close_disconnects_waiting_callers() {
        let (peer, mut rx) = peer();
        let caller = {
            let peer = peer.clone();
            tokio::spawn(async move {
                peer.create_message(SamplingRequest::single_turn("hi", 10))
                    .await
            })
        };

        rx.recv().await.unwrap();
        peer.close();

        let err = caller.await.unwrap().unwrap_err();
        assert!(matches!(err, SamplingError::Disconnected));

        let err = peer
            .create_message(SamplingRequest::single_turn("again", 10))
            .await
            .unwrap_err();
        assert!(matches!(err, SamplingError::Disconnected));
    }

    #[tokio::test]
    async fn test_without_capability_nothing_is_sent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let peer = ClientPeer::new(tx);

        let err = peer
            .create_message(SamplingRequest::single_turn("hi", 10))
            .await
            .unwrap_err();
        assert!(matches!(err, SamplingError::Unsupported));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_unknown_response_ids_are_reported() {
        let (peer, _rx) = peer();
        assert!(!peer.complete(&RequestId::Number(42), Ok(Value::Null)));
        assert!(!peer.complete(&RequestId::String("x".into()), Ok(Value::Null)));
    }
}
