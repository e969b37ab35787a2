#![allow(dead_code)]

use assert_cmd::Command;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use hatchling::domain::{Entry, EntryPayload, ExportRequest, MediaRef};
use hatchling::error::PersistenceFailure;
use hatchling::infrastructure::{EntryStore, ExportRenderer, RenderFailure, TagClassifier};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub fn hatchling_cmd() -> Command {
    let mut cmd = Command::cargo_bin("hatchling").unwrap();
    cmd.env_remove("HATCHLING_ROOT");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// How the fake classifier answers
#[derive(Debug, Clone)]
pub enum Classification {
    Tags(Vec<String>),
    Fail,
    /// Never answers within any sane timeout
    Hang,
}

pub struct FakeClassifier {
    behavior: Classification,
    calls: AtomicUsize,
    last_media: Mutex<Option<MediaRef>>,
}

impl FakeClassifier {
    pub fn new(behavior: Classification) -> Arc<Self> {
        Arc::new(FakeClassifier {
            behavior,
            calls: AtomicUsize::new(0),
            last_media: Mutex::new(None),
        })
    }

    pub fn tags(tags: &[&str]) -> Arc<Self> {
        Self::new(Classification::Tags(
            tags.iter().map(|t| t.to_string()).collect(),
        ))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_media(&self) -> Option<MediaRef> {
        self.last_media.lock().unwrap().clone()
    }
}

#[async_trait]
impl TagClassifier for FakeClassifier {
    async fn classify(
        &self,
        _content: &str,
        media: Option<&MediaRef>,
    ) -> anyhow::Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_media.lock().unwrap() = media.cloned();

        match &self.behavior {
            Classification::Tags(tags) => Ok(tags.clone()),
            Classification::Fail => Err(anyhow::anyhow!("connection refused")),
            Classification::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(vec!["late".to_string()])
            }
        }
    }
}

/// Entry store that records payloads and echoes them back as entries
#[derive(Default)]
pub struct RecordingStore {
    pub created: Mutex<Vec<EntryPayload>>,
    pub updated: Mutex<Vec<(String, EntryPayload)>>,
    pub failure: Option<PersistenceFailure>,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(failure: PersistenceFailure) -> Arc<Self> {
        Arc::new(RecordingStore {
            failure: Some(failure),
            ..Default::default()
        })
    }

    pub fn created(&self) -> Vec<EntryPayload> {
        self.created.lock().unwrap().clone()
    }

    pub fn updated(&self) -> Vec<(String, EntryPayload)> {
        self.updated.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.created.lock().unwrap().len() + self.updated.lock().unwrap().len()
    }

    fn echo(entry_id: &str, payload: &EntryPayload) -> Entry {
        Entry::from_payload(entry_id, payload)
    }
}

#[async_trait]
impl EntryStore for RecordingStore {
    async fn create(&self, payload: &EntryPayload) -> Result<Entry, PersistenceFailure> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        let mut created = self.created.lock().unwrap();
        created.push(payload.clone());
        Ok(Self::echo(&format!("entry-{}", created.len()), payload))
    }

    async fn update(
        &self,
        entry_id: &str,
        payload: &EntryPayload,
    ) -> Result<Entry, PersistenceFailure> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        self.updated
            .lock()
            .unwrap()
            .push((entry_id.to_string(), payload.clone()));
        Ok(Self::echo(entry_id, payload))
    }
}

/// How the fake renderer answers
#[derive(Debug, Clone)]
pub enum Rendering {
    Body(Vec<u8>),
    Failure(RenderFailure),
    Hang,
}

pub struct FakeRenderer {
    behavior: Rendering,
    requests: Mutex<Vec<(ExportRequest, Duration)>>,
}

impl FakeRenderer {
    pub fn new(behavior: Rendering) -> Arc<Self> {
        Arc::new(FakeRenderer {
            behavior,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn body(bytes: &[u8]) -> Arc<Self> {
        Self::new(Rendering::Body(bytes.to_vec()))
    }

    pub fn requests(&self) -> Vec<(ExportRequest, Duration)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExportRenderer for FakeRenderer {
    async fn render(
        &self,
        request: &ExportRequest,
        timeout: Duration,
    ) -> Result<Vec<u8>, RenderFailure> {
        self.requests
            .lock()
            .unwrap()
            .push((request.clone(), timeout));

        match &self.behavior {
            Rendering::Body(bytes) => Ok(bytes.clone()),
            Rendering::Failure(failure) => Err(failure.clone()),
            Rendering::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(b"late".to_vec())
            }
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Clock that moves one second forward per reading
pub fn ticking_clock(start: NaiveDateTime) -> Arc<dyn Fn() -> NaiveDateTime + Send + Sync> {
    let ticks = Arc::new(AtomicUsize::new(0));
    Arc::new(move || {
        let n = ticks.fetch_add(1, Ordering::SeqCst) as i64;
        start + chrono::Duration::seconds(n)
    })
}

/// Clock frozen at one instant
pub fn fixed_clock(at: NaiveDateTime) -> Arc<dyn Fn() -> NaiveDateTime + Send + Sync> {
    Arc::new(move || at)
}

/// Canned HTTP/1.1 server on a loopback port.
///
/// Answers every connection with the same status and body and keeps the raw
/// requests it received.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub async fn start(status: u16, body: &[u8]) -> Self {
        let mut response = format!(
            "HTTP/1.1 {} Stub\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(body);
        Self::start_raw(response).await
    }

    /// Answer with `response` verbatim, then close the connection
    pub async fn start_raw(response: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/api", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded = recorded.clone();
                let response = response.clone();
                tokio::spawn(async move {
                    answer(stream, &response, &recorded).await;
                });
            }
        });

        StubServer { base_url, requests }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Header value from the last request, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<String> {
        let request = self.requests().pop()?;
        let head = request.split("\r\n\r\n").next()?.to_string();
        head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }

    /// Request line of the last request, e.g. `GET /api/export HTTP/1.1`
    pub fn request_line(&self) -> Option<String> {
        self.requests().pop()?.lines().next().map(str::to_string)
    }
}

async fn answer(mut stream: TcpStream, response: &[u8], recorded: &Mutex<Vec<String>>) {
    let request = read_request(&mut stream).await;
    recorded.lock().unwrap().push(request);

    let _ = stream.write_all(response).await;
    let _ = stream.shutdown().await;
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        let n = stream.read(&mut buf).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
        if request_complete(&raw) {
            break;
        }
    }

    String::from_utf8_lossy(&raw).into_owned()
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some((head, body)) = text.split_once("\r\n\r\n") else {
        return false;
    };
    let head = head.to_ascii_lowercase();

    if head.contains("transfer-encoding: chunked") {
        return body.ends_with("0\r\n\r\n");
    }

    let length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    body.len() >= length
}

/// Base URL of a loopback port nothing listens on
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}
