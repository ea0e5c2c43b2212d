//! Meeting lifecycle tracker.
//!
//! Holds the cached copy of one meeting and, while the server reports it as
//! `processing`, polls the lightweight status endpoint on a fixed interval.
//! When a probe reports anything else the timer is cancelled and the meeting
//! is re-fetched in full exactly once.
//!
//! The tracker is torn down explicitly with [`MeetingStatusTracker::teardown`]
//! or implicitly when dropped; after that no request is issued and the cached
//! meeting never changes again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::clock::{Clock, TokioClock};
use super::status::MeetingStatus;
use crate::client::ResourceClient;
use crate::config::PollingConfig;
use crate::error::{Error, Result};
use crate::models::{Meeting, MeetingId};

/// What the poller is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// No timer armed.
    Idle,
    /// Timer armed; probes run on every tick.
    Armed,
    /// A probe saw the meeting leave `processing`; the timer is already
    /// cancelled and the full refresh is in flight.
    Settling,
}

pub struct MeetingStatusTracker {
    inner: Arc<TrackerInner>,
}

struct TrackerInner {
    meeting_id: MeetingId,
    client: Arc<dyn ResourceClient>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
    meeting: watch::Sender<Option<Meeting>>,
    phase: watch::Sender<PollPhase>,
    /// Cancellation handle of the armed timer, if any.
    timer: Mutex<Option<CancellationToken>>,
    disposed: CancellationToken,
}

impl MeetingStatusTracker {
    pub fn new(
        meeting_id: MeetingId,
        client: Arc<dyn ResourceClient>,
        clock: Arc<dyn Clock>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                meeting_id,
                client,
                clock,
                poll_interval,
                meeting: watch::channel(None).0,
                phase: watch::channel(PollPhase::Idle).0,
                timer: Mutex::new(None),
                disposed: CancellationToken::new(),
            }),
        }
    }

    /// Tracker on the tokio timer with the configured interval.
    pub fn from_config(
        meeting_id: MeetingId,
        client: Arc<dyn ResourceClient>,
        polling: &PollingConfig,
    ) -> Self {
        Self::new(meeting_id, client, Arc::new(TokioClock), polling.interval())
    }

    pub fn meeting_id(&self) -> MeetingId {
        self.inner.meeting_id
    }

    /// Last successfully fetched copy of the meeting.
    pub fn meeting(&self) -> Option<Meeting> {
        self.inner.meeting.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Meeting>> {
        self.inner.meeting.subscribe()
    }

    pub fn phase(&self) -> PollPhase {
        *self.inner.phase.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<PollPhase> {
        self.inner.phase.subscribe()
    }

    pub fn is_polling(&self) -> bool {
        self.phase() == PollPhase::Armed
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.disposed.is_cancelled()
    }

    /// Re-fetch the full meeting and arm or cancel the poller to match its status.
    pub async fn refresh(&self) -> Result<Meeting> {
        self.inner.refresh().await
    }

    /// Cancel the timer if one is armed. Safe to call at any time.
    pub fn cancel_polling(&self) {
        self.inner.cancel_timer(PollPhase::Idle);
    }

    /// Wait until the poller has nothing left to do and return the cached meeting.
    pub async fn settled(&self) -> Result<Option<Meeting>> {
        let mut phase = self.inner.phase.subscribe();
        tokio::select! {
            biased;
            _ = self.inner.disposed.cancelled() => Err(Error::Disposed),
            idle = phase.wait_for(|p| *p == PollPhase::Idle) => {
                idle.map_err(|_| Error::Disposed)?;
                Ok(self.meeting())
            }
        }
    }

    /// Stop polling for good. Idempotent.
    pub fn teardown(&self) {
        if !self.inner.disposed.is_cancelled() {
            debug!("Tearing down tracker for meeting {}", self.inner.meeting_id);
        }
        self.inner.disposed.cancel();
        self.inner.cancel_timer(PollPhase::Idle);
    }
}

impl Drop for MeetingStatusTracker {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl TrackerInner {
    fn timer_slot(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn refresh(self: &Arc<Self>) -> Result<Meeting> {
        if self.disposed.is_cancelled() {
            return Err(Error::Disposed);
        }

        let meeting = tokio::select! {
            biased;
            _ = self.disposed.cancelled() => return Err(Error::Disposed),
            fetched = self.client.get_meeting(self.meeting_id) => fetched?,
        };

        // Teardown may have landed on another thread while the fetch completed.
        if self.disposed.is_cancelled() {
            debug!("Discarding meeting {} fetched after teardown", self.meeting_id);
            return Err(Error::Disposed);
        }

        let previous = self.meeting.borrow().as_ref().map(|m| m.status);
        if let Some(previous) = previous {
            if previous != meeting.status {
                info!(
                    "Meeting {} status: {} -> {}",
                    self.meeting_id, previous, meeting.status
                );
                if !previous.can_transition_to(meeting.status) {
                    warn!(
                        "Meeting {} made an unexpected transition {} -> {}",
                        self.meeting_id, previous, meeting.status
                    );
                }
            }
        }

        self.meeting.send_replace(Some(meeting.clone()));

        if meeting.status.needs_polling() {
            self.arm();
        } else {
            self.cancel_timer(PollPhase::Idle);
        }

        Ok(meeting)
    }

    fn arm(self: &Arc<Self>) {
        if self.disposed.is_cancelled() {
            return;
        }

        let token = {
            let mut slot = self.timer_slot();
            if slot.is_some() {
                debug!("Poller for meeting {} already armed", self.meeting_id);
                return;
            }
            let token = self.disposed.child_token();
            *slot = Some(token.clone());
            self.phase.send_replace(PollPhase::Armed);
            token
        };

        debug!(
            "Polling meeting {} every {:?}",
            self.meeting_id, self.poll_interval
        );

        let inner = Arc::clone(self);
        tokio::spawn(async move { inner.poll_loop(token).await });
    }

    /// Cancel the armed timer, if any, and publish `next` as the poll phase.
    fn cancel_timer(&self, next: PollPhase) {
        let mut slot = self.timer_slot();
        if let Some(token) = slot.take() {
            token.cancel();
            debug!("Poller for meeting {} cancelled", self.meeting_id);
        }
        self.phase.send_replace(next);
    }

    async fn poll_loop(self: Arc<Self>, token: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = self.clock.sleep(self.poll_interval) => {}
            }

            let probe = tokio::select! {
                biased;
                _ = token.cancelled() => return,
                probe = self.client.meeting_status(self.meeting_id) => probe,
            };

            match probe {
                Ok(MeetingStatus::Processing) => {
                    debug!("Meeting {} still processing", self.meeting_id);
                }
                Ok(status) => {
                    info!(
                        "Meeting {} left processing ({}), fetching full record",
                        self.meeting_id, status
                    );
                    self.cancel_timer(PollPhase::Settling);
                    if let Err(e) = self.refresh().await {
                        warn!(
                            "Refresh of meeting {} after status change failed: {}",
                            self.meeting_id, e
                        );
                        self.phase.send_if_modified(|phase| {
                            let settling = *phase == PollPhase::Settling;
                            if settling {
                                *phase = PollPhase::Idle;
                            }
                            settling
                        });
                    }
                    return;
                }
                Err(e) => {
                    // Treated as still processing; the next tick retries.
                    warn!(
                        "Status probe for meeting {} failed: {}",
                        self.meeting_id, e
                    );
                }
            }
        }
    }
}
