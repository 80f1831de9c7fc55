//! Sequential opening of a [`DispatchBatch`].
//!
//! Browsers suppress bursts of programmatic `window.open` calls as popups.
//! Spacing the opens by a fixed delay gets closer to user-initiated behaviour;
//! it lowers the chance of blocking but does not rule it out, and blocked opens
//! are neither detected nor retried.
//!
//! The dispatcher itself never sleeps. [`SequentialDispatcher::step`] opens one
//! link and tells the host how long to wait before calling it again; the host
//! keeps the timer handle (a `gloo` timeout in the browser, a tokio sleep on the
//! desktop) and cancelling amounts to dropping that handle and calling
//! [`SequentialDispatcher::cancel`].

use crate::config::DEFAULT_OPEN_DELAY_MS;
use crate::error::InviteError;
use crate::model::link::DispatchBatch;
use crate::services::LinkOpener;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shortest spacing between two opens. Smaller delays, zero included, are
/// raised to it so no two opens share a scheduled instant.
pub const MIN_OPEN_DELAY: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchState {
    Idle,
    /// `index` is the next link to open out of `total`.
    Dispatching { index: usize, total: usize },
}

#[derive(Debug, Clone)]
pub struct SequentialDispatcher {
    delay: Duration,
    state: DispatchState,
}

impl Default for SequentialDispatcher {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_OPEN_DELAY_MS))
    }
}

impl SequentialDispatcher {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay: delay.max(MIN_OPEN_DELAY),
            state: DispatchState::Idle,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Takes effect from the next started run.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay.max(MIN_OPEN_DELAY);
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn is_dispatching(&self) -> bool {
        matches!(self.state, DispatchState::Dispatching { .. })
    }

    /// Arms a run over `batch`.
    ///
    /// An empty batch leaves the dispatcher idle. A second start while a run is
    /// active is refused rather than restarting from the first link.
    pub fn start(&mut self, batch: &DispatchBatch) -> Result<(), InviteError> {
        if self.is_dispatching() {
            return Err(InviteError::DispatchInProgress);
        }
        if batch.is_empty() {
            return Ok(());
        }
        self.state = DispatchState::Dispatching {
            index: 0,
            total: batch.len(),
        };
        Ok(())
    }

    /// Opens the next link.
    ///
    /// Returns the delay to wait before the following step, or `None` once the
    /// run is over (or was never started). The batch must be the one the run was
    /// started with.
    pub fn step<O: LinkOpener + ?Sized>(
        &mut self,
        batch: &DispatchBatch,
        opener: &O,
    ) -> Option<Duration> {
        let DispatchState::Dispatching { index, total } = self.state else {
            return None;
        };

        match batch.get(index) {
            Some(link) => opener.open(link),
            None => {
                log::warn!("dispatch index {index} is outside a batch of {}", batch.len());
                self.state = DispatchState::Idle;
                return None;
            }
        }

        let next = index + 1;
        if next >= total {
            log::info!("opened {total} links");
            self.state = DispatchState::Idle;
            None
        } else {
            self.state = DispatchState::Dispatching { index: next, total };
            Some(self.delay)
        }
    }

    /// Stops the run; links not opened yet are skipped.
    pub fn cancel(&mut self) {
        if let DispatchState::Dispatching { index, total } = self.state {
            log::info!("dispatch cancelled after {index} of {total} links");
        }
        self.state = DispatchState::Idle;
    }
}

/// Offsets from the start of a run at which each of `len` links is opened.
pub fn schedule(len: usize, delay: Duration) -> Vec<Duration> {
    let delay = delay.max(MIN_OPEN_DELAY);
    (0..len).map(|i| delay * i as u32).collect()
}
