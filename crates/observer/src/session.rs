// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observation sessions: snapshot load, then a background task that keeps
//! the live channel attached and feeds the reconciler until the job is done.

use dw_adapters::{ChannelError, LiveChannel, SnapshotSource};
use dw_core::{ConnectionState, Deployment, JobId, ObserverEvent};
use futures_util::Stream;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::backoff::Backoff;
use crate::config::ObserverConfig;
use crate::error::ObserveError;
use crate::loader;
use crate::reconciler::Reconciler;

type Item = Result<ObserverEvent, ObserveError>;

/// Starts observation sessions against a snapshot source and live channel.
pub struct Observer<S: SnapshotSource, L: LiveChannel> {
    source: Arc<S>,
    channel: Arc<L>,
    config: ObserverConfig,
}

impl<S: SnapshotSource, L: LiveChannel> Clone for Observer<S, L> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            channel: Arc::clone(&self.channel),
            config: self.config.clone(),
        }
    }
}

impl<S: SnapshotSource, L: LiveChannel> Observer<S, L> {
    pub fn new(source: S, channel: L, config: ObserverConfig) -> Self {
        Self { source: Arc::new(source), channel: Arc::new(channel), config }
    }

    /// Load the snapshot and spawn the session task.
    ///
    /// Snapshot failures are returned here; everything after arrives through
    /// the returned [`Session`].
    pub async fn start(&self, job_id: impl Into<JobId>) -> Result<Session, ObserveError> {
        let job_id = job_id.into();
        let snapshot = loader::load(self.source.as_ref(), &job_id, &self.config).await?;

        let mut reconciler = Reconciler::new(job_id.clone(), &self.config);
        let seeded = reconciler.seed(&snapshot, now());

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let cancel = CancellationToken::new();

        let mut driver = Driver {
            job_id: job_id.clone(),
            channel: Arc::clone(&self.channel),
            reconciler,
            backoff: self.config.backoff,
            events: events_tx,
            state: state_tx,
            cancel: cancel.clone(),
        };
        driver.emit(seeded);
        let task = tokio::spawn(driver.run());

        Ok(Session {
            job_id,
            deployment: snapshot.deployment,
            events: events_rx,
            state: state_rx,
            cancel,
            task: Some(task),
        })
    }
}

/// Consumer handle of one observation session.
///
/// Yields merged events in order. The stream ends after the terminal status
/// and any buffered lines were delivered, after the first error, or after
/// [`cancel`](Self::cancel). Dropping the handle cancels the session.
pub struct Session {
    job_id: JobId,
    deployment: Deployment,
    events: mpsc::UnboundedReceiver<Item>,
    state: watch::Receiver<ConnectionState>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Session {
    /// Deployment metadata from the snapshot.
    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    pub async fn next_event(&mut self) -> Option<Item> {
        self.events.recv().await
    }

    /// Stop the session. Once this returns no further event is yielded.
    pub async fn cancel(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(job_id = %self.job_id, error = %e, "session: task failed");
            }
        }
        self.events.close();
        while self.events.try_recv().is_ok() {}
    }
}

impl Stream for Session {
    type Item = Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Item>> {
        self.get_mut().events.poll_recv(cx)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Outcome of waiting on a phase future inside the session task.
enum Wake<T> {
    Ready(T),
    Cancelled,
    /// The gap timer settled the last missing line of a finished job
    Complete,
}

/// Sole owner and mutator of one session's state.
struct Driver<L: LiveChannel> {
    job_id: JobId,
    channel: Arc<L>,
    reconciler: Reconciler,
    backoff: Backoff,
    events: mpsc::UnboundedSender<Item>,
    state: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
}

impl<L: LiveChannel> Driver<L> {
    async fn run(mut self) {
        let mut attempt: u32 = 0;
        loop {
            if self.reconciler.is_complete() {
                return self.finish();
            }

            self.set_state(ConnectionState::Connecting);
            let channel = Arc::clone(&self.channel);
            let job_id = self.job_id.clone();
            let resume_from = self.reconciler.resume_from();
            tracing::debug!(job_id = %self.job_id, resume_from, attempt, "session: opening live channel");

            let opened = match self.wait(async move { channel.open(&job_id, resume_from).await }).await {
                Wake::Ready(opened) => opened,
                Wake::Cancelled => return self.cancelled(),
                Wake::Complete => return self.finish(),
            };

            match opened {
                Ok(mut stream) => {
                    self.set_state(ConnectionState::Live);
                    attempt = 0;
                    loop {
                        let event = match self.wait(stream.next_event()).await {
                            Wake::Ready(event) => event,
                            Wake::Cancelled => return self.cancelled(),
                            Wake::Complete => return self.finish(),
                        };
                        match event {
                            Some(Ok(event)) => match self.reconciler.on_live(event, now()) {
                                Ok(events) => {
                                    self.emit(events);
                                    if self.reconciler.is_complete() {
                                        return self.finish();
                                    }
                                }
                                Err(e) => return self.fail(e),
                            },
                            Some(Err(ChannelError::Malformed(reason))) => {
                                return self.fail(ObserveError::ProtocolViolation(reason));
                            }
                            Some(Err(e)) => {
                                tracing::warn!(job_id = %self.job_id, error = %e, "session: live channel failed");
                                break;
                            }
                            None => {
                                tracing::info!(job_id = %self.job_id, "session: live channel closed");
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(job_id = %self.job_id, error = %e, attempt, "session: open failed");
                }
            }

            self.set_state(ConnectionState::Disconnected);
            if self.reconciler.is_terminal() {
                let events = self.reconciler.flush();
                self.emit(events);
                return self.finish();
            }

            let delay = self.backoff.delay(attempt);
            attempt = attempt.saturating_add(1);
            tracing::info!(job_id = %self.job_id, attempt, ?delay, "session: reconnecting");
            match self.wait(tokio::time::sleep(delay)).await {
                Wake::Ready(()) => {}
                Wake::Cancelled => return self.cancelled(),
                Wake::Complete => return self.finish(),
            }
        }
    }

    /// Drive `fut` while honoring cancellation and the gap deadline.
    async fn wait<F: Future>(&mut self, fut: F) -> Wake<F::Output> {
        tokio::pin!(fut);
        loop {
            let deadline = self.reconciler.gap_deadline();
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Wake::Cancelled,
                _ = gap_timer(deadline) => {
                    let events = self.reconciler.on_deadline(now());
                    self.emit(events);
                    if self.reconciler.is_complete() {
                        return Wake::Complete;
                    }
                }
                out = &mut fut => return Wake::Ready(out),
            }
        }
    }

    fn emit(&mut self, events: Vec<ObserverEvent>) {
        for event in events {
            if self.events.send(Ok(event)).is_err() {
                tracing::debug!(job_id = %self.job_id, "session: consumer gone");
                self.cancel.cancel();
                return;
            }
        }
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            tracing::info!(job_id = %self.job_id, from = %previous, to = %state, "session: connection state");
        }
    }

    fn finish(self) {
        self.set_state(ConnectionState::Terminal);
        tracing::info!(
            job_id = %self.job_id,
            status = ?self.reconciler.status(),
            watermark = ?self.reconciler.watermark(),
            "session: complete"
        );
    }

    fn fail(self, error: ObserveError) {
        tracing::error!(job_id = %self.job_id, %error, "session: aborted");
        let _ = self.events.send(Err(error));
        self.set_state(ConnectionState::Terminal);
    }

    fn cancelled(self) {
        tracing::debug!(job_id = %self.job_id, "session: cancelled");
        self.set_state(ConnectionState::Disconnected);
    }
}

async fn gap_timer(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

/// Current instant on tokio's clock, so paused-time tests drive the gap timer.
fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
