#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chat_api::{ChatApiError, ChatResponse, ToolInvocation};
use chat_session::{ChatBackend, LoginRedirect, SendMode, SessionHost};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub fn reply(message: &str, tools: Vec<ToolInvocation>) -> ChatResponse {
    ChatResponse {
        message: message.to_owned(),
        tools_invoked: tools,
        conversation_id: None,
    }
}

#[derive(Default)]
pub struct HostSpy {
    pub render_requests: AtomicUsize,
    pub redirects: Mutex<Vec<LoginRedirect>>,
}

impl HostSpy {
    pub fn renders(&self) -> usize {
        self.render_requests.load(Ordering::Acquire)
    }

    pub fn redirects(&self) -> Vec<LoginRedirect> {
        lock_unpoisoned(&self.redirects).clone()
    }
}

impl SessionHost for HostSpy {
    fn request_render(&self) {
        self.render_requests.fetch_add(1, Ordering::AcqRel);
    }

    fn navigate_to_login(&self, redirect: LoginRedirect) {
        lock_unpoisoned(&self.redirects).push(redirect);
    }
}

pub struct ScriptedReply {
    pub delay_ms: u64,
    pub gate: Option<Arc<Notify>>,
    pub result: Result<ChatResponse, ChatApiError>,
}

impl ScriptedReply {
    pub fn ok(response: ChatResponse) -> Self {
        Self {
            delay_ms: 0,
            gate: None,
            result: Ok(response),
        }
    }

    pub fn err(error: ChatApiError) -> Self {
        Self {
            delay_ms: 0,
            gate: None,
            result: Err(error),
        }
    }

    pub fn after_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

/// Backend answering from a queue, recording every call.
pub struct ScriptedBackend {
    authenticated: bool,
    replies: Mutex<VecDeque<ScriptedReply>>,
    pub calls: Mutex<Vec<(String, String, SendMode)>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            authenticated: true,
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            authenticated: false,
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> Vec<(String, String, SendMode)> {
        lock_unpoisoned(&self.calls).clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn has_credentials(&self) -> bool {
        self.authenticated
    }

    async fn send(
        &self,
        user_id: &str,
        text: &str,
        mode: SendMode,
    ) -> Result<ChatResponse, ChatApiError> {
        lock_unpoisoned(&self.calls).push((user_id.to_owned(), text.to_owned(), mode));
        let scripted = lock_unpoisoned(&self.replies)
            .pop_front()
            .expect("a scripted reply for every send");

        if let Some(gate) = scripted.gate {
            gate.notified().await;
        }
        if scripted.delay_ms > 0 {
            sleep(Duration::from_millis(scripted.delay_ms)).await;
        }
        scripted.result
    }
}

/// Minimal HTTP server answering each connection with the next canned
/// `(status, content_type, body)`.
pub struct CannedServer {
    pub base_url: String,
    pub request_count: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl CannedServer {
    pub async fn new(responses: Vec<(u16, &'static str, &'static str)>) -> Self {
        let responses = Arc::new(responses);
        let request_count = Arc::new(AtomicUsize::new(0));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("local TCP listener should bind");
        let base_url = format!(
            "http://{}",
            listener.local_addr().expect("resolved local listener address")
        );

        let handle = tokio::spawn({
            let responses = Arc::clone(&responses);
            let request_count = Arc::clone(&request_count);
            async move {
                while let Ok((mut socket, _)) = listener.accept().await {
                    let index = request_count.fetch_add(1, Ordering::AcqRel);
                    let (status, content_type, body) = responses
                        .get(index)
                        .copied()
                        .unwrap_or((500, "application/json", r#"{"detail":"unexpected request"}"#));
                    tokio::spawn(async move {
                        if read_request(&mut socket).await.is_err() {
                            return;
                        }
                        let head = format!(
                            "HTTP/1.1 {status} Scripted\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                            body.len()
                        );
                        let _ = socket.write_all(head.as_bytes()).await;
                        let _ = socket.write_all(body.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
            }
        });

        Self {
            base_url,
            request_count,
            handle,
        }
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Acquire)
    }

    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

async fn read_request(socket: &mut TcpStream) -> std::io::Result<()> {
    let mut request = Vec::new();
    let mut buffer = [0_u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut buffer).await?;
        if n == 0 {
            return Ok(());
        }
        request.extend_from_slice(&buffer[..n]);
        if let Some(position) = request.windows(4).position(|window| window == b"\r\n\r\n") {
            break position + 4;
        }
    };

    let headers = String::from_utf8_lossy(&request[..header_end]).to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while request.len() < header_end + content_length {
        let n = socket.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buffer[..n]);
    }

    Ok(())
}
