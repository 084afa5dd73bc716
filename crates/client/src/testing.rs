//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::transport::{Transport, TransportError, TransportResponse};

type Reply = Result<TransportResponse, TransportError>;

enum Scripted {
    Ready(Reply),
    /// Resolves when the test sends on the paired sender.
    Gated(oneshot::Receiver<Reply>),
}

/// Replays queued replies in request order and records every request.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(Scripted::Ready(reply));
    }

    pub(crate) fn reply_json(&self, status: u16, body: Value) {
        self.reply(Ok(TransportResponse::new(status, body.to_string())));
    }

    /// Queue a reply that is held until the returned sender fires.
    pub(crate) fn gate(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Scripted::Gated(rx));
        tx
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn respond(&self, call: String) -> Reply {
        self.calls.lock().unwrap().push(call);
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(TransportError::Network("gate dropped".into()))),
            None => Err(TransportError::Network("no scripted reply".into())),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Reply {
        let mut call = format!("GET {path}");
        if !query.is_empty() {
            let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
            call.push('?');
            call.push_str(&pairs.join("&"));
        }
        self.respond(call).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Reply {
        self.respond(format!("POST {path} {body}")).await
    }
}

/// A successful envelope for `field` holding `records`.
pub(crate) fn ok_body(field: &str, records: Value) -> Reply {
    let mut body = serde_json::Map::new();
    body.insert("success".into(), Value::Bool(true));
    body.insert(field.into(), records);
    Ok(TransportResponse::new(200, Value::Object(body).to_string()))
}
