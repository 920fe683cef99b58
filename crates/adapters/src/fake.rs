// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted snapshot source and live channel for tests.

use async_trait::async_trait;
use dw_core::{JobId, LiveEvent, LogLine, Snapshot, Status};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use crate::live::{ChannelError, LiveChannel, LiveStream};
use crate::snapshot::{SnapshotError, SnapshotSource};

#[derive(Default)]
struct FakeSnapshotState {
    results: VecDeque<Result<Snapshot, SnapshotError>>,
    calls: Vec<JobId>,
}

/// Snapshot source returning scripted results in order.
///
/// Once the script runs out every fetch fails with a transient error.
#[derive(Clone, Default)]
pub struct FakeSnapshotSource {
    inner: Arc<Mutex<FakeSnapshotState>>,
}

impl FakeSnapshotSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source that always starts with `snapshot`.
    pub fn with(snapshot: Snapshot) -> Self {
        let source = Self::new();
        source.push(Ok(snapshot));
        source
    }

    pub fn push(&self, result: Result<Snapshot, SnapshotError>) {
        self.inner.lock().results.push_back(result);
    }

    /// Job ids of every fetch so far
    pub fn calls(&self) -> Vec<JobId> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl SnapshotSource for FakeSnapshotSource {
    async fn fetch(&self, job_id: &JobId) -> Result<Snapshot, SnapshotError> {
        let mut inner = self.inner.lock();
        inner.calls.push(job_id.clone());
        inner
            .results
            .pop_front()
            .unwrap_or_else(|| Err(SnapshotError::Transient("no scripted snapshot".into())))
    }
}

type Item = Result<LiveEvent, ChannelError>;

enum Scripted {
    Accept(mpsc::UnboundedReceiver<Item>),
    Refuse(ChannelError),
}

struct FakeLiveState {
    script: VecDeque<Scripted>,
    opens: Vec<(JobId, u64)>,
}

/// Live channel whose connections are scripted by the test.
///
/// Each [`accept`](Self::accept) queues one successful open and returns the
/// handle that feeds it; [`refuse`](Self::refuse) queues one failed open.
/// An open with nothing scripted never completes.
#[derive(Clone)]
pub struct FakeLiveChannel {
    inner: Arc<Mutex<FakeLiveState>>,
    open_count: Arc<watch::Sender<usize>>,
}

impl Default for FakeLiveChannel {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeLiveState { script: VecDeque::new(), opens: Vec::new() })),
            open_count: Arc::new(watch::Sender::new(0)),
        }
    }
}

impl FakeLiveChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&self) -> FakeLiveHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.lock().script.push_back(Scripted::Accept(rx));
        FakeLiveHandle { tx }
    }

    pub fn refuse(&self, error: ChannelError) {
        self.inner.lock().script.push_back(Scripted::Refuse(error));
    }

    /// `(job_id, resume_from)` of every open attempt so far
    pub fn opens(&self) -> Vec<(JobId, u64)> {
        self.inner.lock().opens.clone()
    }

    /// Resume offsets of every open attempt so far
    pub fn resume_offsets(&self) -> Vec<u64> {
        self.inner.lock().opens.iter().map(|(_, from)| *from).collect()
    }

    /// Wait until at least `n` open attempts were made.
    pub async fn wait_for_opens(&self, n: usize) {
        let mut rx = self.open_count.subscribe();
        let _ = rx.wait_for(|count| *count >= n).await;
    }
}

#[async_trait]
impl LiveChannel for FakeLiveChannel {
    async fn open(
        &self,
        job_id: &JobId,
        resume_from: u64,
    ) -> Result<Box<dyn LiveStream>, ChannelError> {
        let next = {
            let mut inner = self.inner.lock();
            inner.opens.push((job_id.clone(), resume_from));
            inner.script.pop_front()
        };
        self.open_count.send_modify(|count| *count += 1);
        match next {
            Some(Scripted::Accept(rx)) => Ok(Box::new(FakeLiveStream { rx })),
            Some(Scripted::Refuse(error)) => Err(error),
            None => std::future::pending().await,
        }
    }
}

struct FakeLiveStream {
    rx: mpsc::UnboundedReceiver<Item>,
}

#[async_trait]
impl LiveStream for FakeLiveStream {
    async fn next_event(&mut self) -> Option<Item> {
        self.rx.recv().await
    }
}

/// Producer side of one scripted connection. Dropping it closes the channel.
pub struct FakeLiveHandle {
    tx: mpsc::UnboundedSender<Item>,
}

impl FakeLiveHandle {
    pub fn line(&self, line: LogLine) {
        let _ = self.tx.send(Ok(LiveEvent::Line(line)));
    }

    pub fn lines(&self, lines: impl IntoIterator<Item = LogLine>) {
        for line in lines {
            self.line(line);
        }
    }

    pub fn status(&self, status: Status) {
        let _ = self.tx.send(Ok(LiveEvent::Status(status)));
    }

    pub fn error(&self, error: ChannelError) {
        let _ = self.tx.send(Err(error));
    }

    pub fn close(self) {}
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
