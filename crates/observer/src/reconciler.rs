// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Merge of snapshot and live events into one ordered stream.
//!
//! The reconciler is a plain state machine: every input returns the events to
//! deliver, in order. Time only enters through the `now` arguments, so the
//! session task owns the actual timer.

use dw_core::{next_sequence, JobId, LiveEvent, LogLine, ObserverEvent, Snapshot, Status};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::config::ObserverConfig;
use crate::error::ObserveError;

#[derive(Debug)]
pub struct Reconciler {
    job_id: JobId,
    /// Highest sequence delivered or declared lost
    watermark: Option<u64>,
    /// Lines above the next expected sequence, waiting for the hole to fill
    pending: BTreeMap<u64, LogLine>,
    status: Option<Status>,
    /// Highest sequence the snapshot said exists
    known_last: Option<u64>,
    gap_deadline: Option<Instant>,
    gap_timeout: Duration,
    max_pending: usize,
}

impl Reconciler {
    pub fn new(job_id: JobId, config: &ObserverConfig) -> Self {
        Self {
            job_id,
            watermark: None,
            pending: BTreeMap::new(),
            status: None,
            known_last: None,
            gap_deadline: None,
            gap_timeout: config.gap_timeout,
            max_pending: config.max_pending.max(1),
        }
    }

    /// Seed from the snapshot: its status first, then its lines through the
    /// regular merge path.
    pub fn seed(&mut self, snapshot: &Snapshot, now: Instant) -> Vec<ObserverEvent> {
        self.watermark = snapshot.baseline();
        self.known_last = snapshot.last_sequence;
        self.status = Some(snapshot.status);

        let mut out = vec![ObserverEvent::Status { previous: None, status: snapshot.status }];
        let mut advanced = false;
        for line in &snapshot.lines {
            advanced |= self.merge_line(line.clone(), &mut out);
        }
        self.rearm(now, advanced);
        out
    }

    pub fn on_live(&mut self, event: LiveEvent, now: Instant) -> Result<Vec<ObserverEvent>, ObserveError> {
        match event {
            LiveEvent::Line(line) => Ok(self.on_line(line, now)),
            LiveEvent::Status(status) => {
                let out = self.on_status(status)?;
                self.rearm(now, false);
                Ok(out)
            }
        }
    }

    pub fn on_line(&mut self, line: LogLine, now: Instant) -> Vec<ObserverEvent> {
        let mut out = Vec::new();
        let advanced = self.merge_line(line, &mut out);
        self.rearm(now, advanced);
        out
    }

    /// Deliver a status change.
    ///
    /// Repeats are dropped. Leaving a terminal status is a protocol violation.
    pub fn on_status(&mut self, status: Status) -> Result<Vec<ObserverEvent>, ObserveError> {
        match self.status {
            Some(current) if current == status => {
                tracing::trace!(job_id = %self.job_id, %status, "reconcile: repeated status");
                Ok(Vec::new())
            }
            Some(current) if !current.can_transition_to(status) => {
                tracing::error!(job_id = %self.job_id, from = %current, to = %status, "reconcile: status regression");
                Err(ObserveError::ProtocolViolation(format!(
                    "status changed from terminal {current} to {status}"
                )))
            }
            previous => {
                self.status = Some(status);
                Ok(vec![ObserverEvent::Status { previous, status }])
            }
        }
    }

    /// Declare the head gap permanent if its deadline has passed. Once the
    /// job is terminal and nothing is buffered, a tail that never arrived is
    /// declared the same way.
    pub fn on_deadline(&mut self, now: Instant) -> Vec<ObserverEvent> {
        let mut out = Vec::new();
        match self.gap_deadline {
            Some(deadline) if now >= deadline => {
                if !self.pending.is_empty() {
                    self.declare_head_gap(&mut out);
                    self.rearm(now, true);
                } else if self.missing_tail() {
                    out = self.flush();
                } else {
                    self.gap_deadline = None;
                }
            }
            _ => {}
        }
        out
    }

    /// Give up on every hole: announce each with a gap marker and deliver
    /// everything still buffered. Used once no more data can arrive.
    pub fn flush(&mut self) -> Vec<ObserverEvent> {
        let mut out = Vec::new();
        while !self.pending.is_empty() {
            self.declare_head_gap(&mut out);
        }
        if let Some(last) = self.known_last {
            let next = next_sequence(self.watermark);
            if self.watermark.is_none_or(|w| w < last) {
                tracing::warn!(job_id = %self.job_id, from = next, to = last, "reconcile: tail never arrived");
                out.push(ObserverEvent::Gap { from: next, to: last });
                self.watermark = Some(last);
            }
        }
        self.gap_deadline = None;
        out
    }

    /// Terminal status delivered and nothing left to wait for.
    pub fn is_complete(&self) -> bool {
        self.is_terminal()
            && self.pending.is_empty()
            && self.known_last.is_none_or(|last| self.watermark.is_some_and(|w| w >= last))
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_some_and(Status::is_terminal)
    }

    /// Sequence to ask the live channel to start from.
    pub fn resume_from(&self) -> u64 {
        next_sequence(self.watermark)
    }

    pub fn watermark(&self) -> Option<u64> {
        self.watermark
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn gap_deadline(&self) -> Option<Instant> {
        self.gap_deadline
    }

    /// Returns whether the watermark advanced.
    fn merge_line(&mut self, line: LogLine, out: &mut Vec<ObserverEvent>) -> bool {
        let sequence = line.sequence;
        if self.watermark.is_some_and(|w| sequence <= w) {
            tracing::trace!(job_id = %self.job_id, sequence, "reconcile: duplicate");
            return false;
        }
        if sequence == next_sequence(self.watermark) {
            self.watermark = Some(sequence);
            out.push(ObserverEvent::Line(line));
            self.drain(out);
            return true;
        }

        self.pending.entry(sequence).or_insert(line);
        let mut advanced = false;
        while self.pending.len() > self.max_pending {
            tracing::warn!(
                job_id = %self.job_id,
                pending = self.pending.len(),
                max = self.max_pending,
                "reconcile: reorder buffer full"
            );
            self.declare_head_gap(out);
            advanced = true;
        }
        advanced
    }

    /// Deliver the contiguous run following the watermark.
    fn drain(&mut self, out: &mut Vec<ObserverEvent>) {
        while let Some(entry) = self.pending.first_entry() {
            if *entry.key() != next_sequence(self.watermark) {
                break;
            }
            let line = entry.remove();
            self.watermark = Some(line.sequence);
            out.push(ObserverEvent::Line(line));
        }
    }

    /// Announce the hole before the first buffered line, skip past it and
    /// drain. No-op when nothing is buffered.
    fn declare_head_gap(&mut self, out: &mut Vec<ObserverEvent>) {
        let Some(&first) = self.pending.keys().next() else {
            return;
        };
        let from = next_sequence(self.watermark);
        // Buffered lines always sit above the next expected sequence
        let to = first.saturating_sub(1).max(from);
        tracing::warn!(job_id = %self.job_id, from, to, "reconcile: permanent gap");
        out.push(ObserverEvent::Gap { from, to });
        self.watermark = Some(to);
        self.drain(out);
    }

    /// Terminal, yet the snapshot promised lines past the watermark.
    fn missing_tail(&self) -> bool {
        self.is_terminal() && self.known_last.is_some_and(|last| self.watermark.is_none_or(|w| w < last))
    }

    /// Keep the gap deadline in step with what is missing: cleared when
    /// nothing is, started on a new gap, restarted whenever the watermark
    /// moved.
    fn rearm(&mut self, now: Instant, advanced: bool) {
        if self.pending.is_empty() && !self.missing_tail() {
            self.gap_deadline = None;
        } else if self.gap_deadline.is_none() || advanced {
            self.gap_deadline = Some(now + self.gap_timeout);
        }
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
