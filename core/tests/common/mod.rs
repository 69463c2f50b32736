//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tabular_client::{
    ClientConfig, HttpRequest, HttpResponse, TableClient, Transport, TransportError,
};

/// One scripted reply.
#[derive(Debug)]
pub enum Reply {
    Respond(HttpResponse),
    Fail(TransportError),
    /// Resolves after the given delay, measured from when the call starts.
    Delayed(Duration, HttpResponse),
    /// Never resolves; only the executor's timer can end the call.
    Hang,
}

/// In-memory transport that replays scripted replies and records requests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted reply left");
        async move {
            match reply {
                Reply::Respond(response) => Ok(response),
                Reply::Fail(err) => Err(err),
                Reply::Delayed(delay, response) => {
                    tokio::time::sleep(delay).await;
                    Ok(response)
                }
                Reply::Hang => std::future::pending().await,
            }
        }
    }
}

pub fn json_response(status: u16, status_text: &str, body: serde_json::Value) -> Reply {
    Reply::Respond(HttpResponse {
        status,
        status_text: status_text.to_string(),
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: body.to_string(),
    })
}

pub fn text_response(status: u16, status_text: &str, body: &str) -> Reply {
    Reply::Respond(HttpResponse {
        status,
        status_text: status_text.to_string(),
        headers: vec![("content-type".to_string(), "text/plain".to_string())],
        body: body.to_string(),
    })
}

pub fn scripted_client(
    replies: impl IntoIterator<Item = Reply>,
) -> (TableClient<ScriptedTransport>, ScriptedTransport) {
    let transport = ScriptedTransport::new(replies);
    let config = ClientConfig::new("t", "b").with_api_root("https://api.example.test/v0");
    let client = TableClient::with_transport(config, transport.clone()).unwrap();
    (client, transport)
}

/// Start the mock server on an ephemeral port and return its API root.
pub fn spawn_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/v0")
}
