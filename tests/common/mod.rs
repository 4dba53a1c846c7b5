//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use git2::{Repository, Signature};
use tokio::sync::oneshot;

use codescribe::panel::Clipboard;
use codescribe::{
    ClipboardError, DiffSource, EndpointKind, GenerationError, Generator, Host, Notice,
    PanelSnapshot, Payload,
};

/// A test git repository with one initial commit.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a repository whose HEAD has `README.md`.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        let test_repo = Self { dir, repo };

        test_repo.stage("README.md", "# test\n");
        {
            let mut index = test_repo.repo.index().expect("Failed to get index");
            let tree_id = index.write_tree().expect("Failed to write tree");
            let tree = test_repo.repo.find_tree(tree_id).expect("Failed to find tree");
            let sig = Signature::now("Test User", "test@example.com")
                .expect("Failed to create signature");
            test_repo
                .repo
                .commit(Some("HEAD"), &sig, &sig, "init", &tree, &[])
                .expect("Failed to create commit");
        }
        test_repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file and add it to the index.
    pub fn stage(&self, name: &str, content: &str) {
        let file_path = self.dir.path().join(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(name)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }
}

/// Host that records everything pushed to it.
#[derive(Default)]
pub struct RecordingHost {
    pub renders: Vec<PanelSnapshot>,
    pub notices: Vec<Notice>,
}

impl Host for RecordingHost {
    fn render(&mut self, snapshot: &PanelSnapshot) {
        self.renders.push(snapshot.clone());
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// Diff source returning fixed values.
pub struct FixedDiffs {
    pub workspace: bool,
    pub diff: Option<String>,
    pub paths: Option<Vec<String>>,
}

impl FixedDiffs {
    pub fn with_diff(diff: &str) -> Self {
        Self {
            workspace: true,
            diff: Some(diff.to_string()),
            paths: Some(vec!["x.js".to_string()]),
        }
    }

    pub fn empty() -> Self {
        Self {
            workspace: true,
            diff: None,
            paths: None,
        }
    }
}

#[async_trait]
impl DiffSource for FixedDiffs {
    fn has_workspace(&self) -> bool {
        self.workspace
    }

    async fn staged_diff(&self) -> Option<String> {
        self.diff.clone()
    }

    async fn staged_file_paths(&self) -> Option<Vec<String>> {
        self.paths.clone()
    }
}

/// Generator whose calls block until the test releases them, in any order.
#[derive(Default)]
pub struct GatedGenerator {
    gates: Mutex<VecDeque<oneshot::Receiver<Result<String, ()>>>>,
    calls: AtomicUsize,
}

impl GatedGenerator {
    /// Register the next call's gate and return the handle that releases it.
    pub fn gate(&self) -> oneshot::Sender<Result<String, ()>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for GatedGenerator {
    async fn generate(
        &self,
        endpoint: EndpointKind,
        _payload: Payload,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().pop_front();
        let failed = || GenerationError::InvalidResponse {
            endpoint,
            detail: "gate closed".to_string(),
        };
        match gate {
            Some(rx) => match rx.await {
                Ok(Ok(text)) => Ok(text),
                _ => Err(failed()),
            },
            None => Err(failed()),
        }
    }
}

/// Generator that counts calls and always answers the same text.
#[derive(Default)]
pub struct CountingGenerator {
    pub calls: AtomicUsize,
}

impl CountingGenerator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for CountingGenerator {
    async fn generate(
        &self,
        _endpoint: EndpointKind,
        payload: Payload,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("generated from {} bytes", payload.byte_len()))
    }
}

/// Clipboard recording every write.
#[derive(Clone, Default)]
pub struct RecordingClipboard {
    pub writes: Arc<Mutex<Vec<String>>>,
}

impl Clipboard for RecordingClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// `Write` sink that can be inspected after being moved into a host.
#[derive(Clone, Default)]
pub struct SharedBuf(pub Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    /// Parsed JSON lines written so far.
    pub fn events(&self) -> Vec<serde_json::Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .expect("bridge output is UTF-8")
            .lines()
            .map(|line| serde_json::from_str(line).expect("bridge output is JSON"))
            .collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
