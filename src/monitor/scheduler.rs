//! Refresh loop: one cycle at start, then one per refresh interval until
//! cancelled.
//!
//! The loop runs as a background tokio task. [`MonitorHandle`] talks to it
//! over channels: an mpsc command queue for "refresh now", a watch channel
//! carrying live [`Settings`], and a watch channel publishing
//! [`MonitorSnapshot`]s after every state change.

use super::pipeline::refresh_once;
use super::{MonitorSnapshot, MonitorState, QuoteSource};
use crate::error::MonitorError;
use crate::settings::Settings;
use crate::shared::UnitConverter;

use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

// ─── Cancellation ────────────────────────────────────────────────────────────

/// Owner side of a cancellation flag.
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Observer side of a cancellation flag.
#[derive(Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Never resolves if the handle was dropped
    /// without cancelling.
    pub async fn cancelled(&mut self) {
        let closed = self.rx.wait_for(|cancelled| *cancelled).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

pub fn cancellation() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

// ─── Commands from the handle to the loop ────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run a cycle now instead of waiting out the interval.
    RefreshNow,
    /// Exit after the current cycle.
    Stop,
}

// ─── Why the loop woke up ────────────────────────────────────────────────────

enum Wake {
    Timer,
    RefreshNow,
    Stop,
}

// ─── Loop state ──────────────────────────────────────────────────────────────

/// The refresh loop. Owns the monitor state; run it with
/// [`run_forever`](Self::run_forever).
pub struct Scheduler {
    source: Arc<dyn QuoteSource>,
    converter: UnitConverter,
    state: MonitorState,
    settings: watch::Receiver<Settings>,
    cmd_rx: mpsc::Receiver<Command>,
    commands_open: bool,
    applied_token: String,
    snapshot_tx: watch::Sender<MonitorSnapshot>,
}

impl Scheduler {
    pub fn new(
        source: Arc<dyn QuoteSource>,
        settings: watch::Receiver<Settings>,
        cmd_rx: mpsc::Receiver<Command>,
    ) -> Self {
        let (applied_token, max_points) = {
            let current = settings.borrow();
            (current.api_token.clone(), current.max_history_points())
        };
        let state = MonitorState::new(max_points);
        let (snapshot_tx, _) = watch::channel(state.snapshot());
        Self {
            source,
            converter: UnitConverter::default(),
            state,
            settings,
            cmd_rx,
            commands_open: true,
            applied_token,
            snapshot_tx,
        }
    }

    pub fn with_converter(mut self, converter: UnitConverter) -> Self {
        self.converter = converter;
        self
    }

    /// Receiver for the snapshots published by this loop.
    pub fn subscribe(&self) -> watch::Receiver<MonitorSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Run cycles until `cancel` fires or a [`Command::Stop`] arrives.
    ///
    /// Cancellation is checked before each cycle and during each wait; an
    /// in-flight cycle always runs to completion. Returns the final state.
    pub async fn run_forever(mut self, mut cancel: CancelSignal) -> MonitorState {
        tracing::info!(
            interval_ms = self.settings.borrow().refresh_interval().as_millis() as u64,
            "Refresh loop started"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            self.run_cycle().await;

            match self.wait_next(&mut cancel).await {
                Wake::Timer => {}
                Wake::RefreshNow => tracing::debug!("Manual refresh requested"),
                Wake::Stop => break,
            }
        }

        tracing::info!(cycles = self.state.cycles(), "Refresh loop stopped");
        self.state
    }

    async fn run_cycle(&mut self) {
        let settings = self.settings.borrow_and_update().clone();
        if settings.api_token != self.applied_token {
            self.source.set_api_token(&settings.api_token).await;
            self.applied_token = settings.api_token.clone();
            tracing::info!(has_token = settings.has_api_token(), "API token changed");
        }

        self.state.begin_cycle();
        self.publish();

        let cycle = refresh_once(self.source.as_ref(), &mut self.state, &self.converter, &settings);
        match AssertUnwindSafe(cycle).catch_unwind().await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Refresh cycle failed");
                self.state.fail_cycle(&e);
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(panic = %message, "Refresh cycle panicked");
                self.state.fail_cycle(format!("refresh cycle panicked: {}", message));
            }
        }

        self.publish();
    }

    /// Sleep for the live refresh interval, waking early on cancellation or
    /// a command.
    async fn wait_next(&mut self, cancel: &mut CancelSignal) -> Wake {
        let interval = self.settings.borrow().refresh_interval();
        let sleep = tokio::time::sleep(interval);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => return Wake::Stop,

                cmd = self.cmd_rx.recv(), if self.commands_open => match cmd {
                    Some(Command::RefreshNow) => return Wake::RefreshNow,
                    Some(Command::Stop) => return Wake::Stop,
                    None => self.commands_open = false,
                },

                _ = &mut sleep => return Wake::Timer,
            }
        }
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.state.snapshot());
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ─── Public handle ───────────────────────────────────────────────────────────

/// Configures and starts a refresh loop.
pub struct Monitor {
    source: Arc<dyn QuoteSource>,
    settings: Settings,
    converter: UnitConverter,
}

impl Monitor {
    pub fn new(source: Arc<dyn QuoteSource>, settings: Settings) -> Self {
        Self {
            source,
            settings,
            converter: UnitConverter::default(),
        }
    }

    pub fn converter(mut self, converter: UnitConverter) -> Self {
        self.converter = converter;
        self
    }

    /// Spawn the loop on the current tokio runtime. The first cycle starts
    /// immediately.
    pub fn spawn(self) -> MonitorHandle {
        let (settings_tx, settings_rx) = watch::channel(self.settings);
        let (cmd_tx, cmd_rx) = mpsc::channel(1);
        let (cancel, signal) = cancellation();

        let scheduler =
            Scheduler::new(self.source, settings_rx, cmd_rx).with_converter(self.converter);
        let snapshots = scheduler.subscribe();
        let task_handle = tokio::spawn(scheduler.run_forever(signal));

        MonitorHandle {
            cmd_tx,
            cancel,
            settings_tx,
            snapshots,
            task_handle: Some(task_handle),
        }
    }
}

/// Handle to a running refresh loop. Dropping it aborts the loop.
pub struct MonitorHandle {
    cmd_tx: mpsc::Sender<Command>,
    cancel: CancelHandle,
    settings_tx: watch::Sender<Settings>,
    snapshots: watch::Receiver<MonitorSnapshot>,
    task_handle: Option<JoinHandle<MonitorState>>,
}

impl MonitorHandle {
    /// Ask for a cycle now. Requests made while one is already queued are
    /// coalesced.
    pub fn refresh_now(&self) -> Result<(), MonitorError> {
        match self.cmd_tx.try_send(Command::RefreshNow) {
            Ok(()) | Err(mpsc::error::TrySendError::Full(_)) => Ok(()),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(MonitorError::NotRunning),
        }
    }

    /// Receiver notified after every published state change.
    pub fn subscribe(&self) -> watch::Receiver<MonitorSnapshot> {
        self.snapshots.clone()
    }

    /// Latest published state.
    pub fn snapshot(&self) -> MonitorSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn settings(&self) -> Settings {
        self.settings_tx.borrow().clone()
    }

    /// Replace the live settings. The interval applies from the next wait;
    /// a changed token is handed to the quote source before the next cycle.
    pub fn update_settings(&self, settings: Settings) {
        self.settings_tx.send_replace(settings);
    }

    pub fn is_running(&self) -> bool {
        self.task_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancel the loop and wait for it to exit. Returns the final state, or
    /// `None` if already stopped.
    pub async fn stop(&mut self) -> Option<MonitorState> {
        self.cancel.cancel();
        let handle = self.task_handle.take()?;
        match handle.await {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::error!(error = %e, "Refresh loop task failed");
                None
            }
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}
