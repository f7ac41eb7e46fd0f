//! Recording session orchestration.
//!
//! A session arms a capture source, starts media capture, then rewinds and
//! plays the timeline. It finalizes when playback reaches the end or a stop
//! is requested, and yields the media with the pointer samples collected
//! alongside.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cursorflow_common::{FlowError, FlowResult, RecordingClock};
use cursorflow_editor::{PlaybackStatus, SharedPlayback};
use cursorflow_project_model::PointerSample;
use tokio::sync::{mpsc, watch};

use crate::collector::{CollectorTask, PointerCollector};
use crate::host::{
    CaptureHost, CapturedMedia, MediaStream, RawPointerSample, SourceKind, StreamConstraints,
};

/// Recording session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Arming,
    Capturing,
    Finalizing,
    Failed,
}

/// What the orchestrator needs from playback.
pub trait PlaybackControl: Send + Sync {
    /// Rewind to zero and play.
    fn restart(&self);

    /// Stop playback immediately.
    fn halt(&self);

    fn subscribe(&self) -> watch::Receiver<PlaybackStatus>;
}

impl PlaybackControl for SharedPlayback {
    fn restart(&self) {
        self.lock().restart();
    }

    fn halt(&self) {
        let mut playback = self.lock();
        if playback.is_playing() {
            playback.pause();
        }
    }

    fn subscribe(&self) -> watch::Receiver<PlaybackStatus> {
        SharedPlayback::subscribe(self)
    }
}

/// Which source to record.
#[derive(Debug, Clone)]
pub struct RecordingRequest {
    pub kinds: Vec<SourceKind>,
    /// Preferred source id. The first listed source is used otherwise.
    pub source_id: Option<String>,
    pub constraints: StreamConstraints,
}

impl Default for RecordingRequest {
    fn default() -> Self {
        Self {
            kinds: vec![SourceKind::Screen, SourceKind::Window, SourceKind::Tab],
            source_id: None,
            constraints: StreamConstraints::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TimelineEnded,
    StopRequested,
}

/// Result of a completed session.
#[derive(Debug, Clone)]
pub struct CaptureArtifact {
    pub media: CapturedMedia,
    pub pointer_samples: Vec<PointerSample>,
    pub stop_reason: StopReason,
}

#[derive(Debug, Clone)]
pub enum RecordingOutcome {
    Completed(CaptureArtifact),
    /// The user refused the capture grant. Nothing was recorded.
    Declined,
}

/// Requests that the active session finish.
#[derive(Clone)]
pub struct StopHandle<P> {
    signal: Arc<watch::Sender<u64>>,
    playback: P,
}

impl<P: PlaybackControl> StopHandle<P> {
    /// Halt playback now and ask the session to finalize.
    pub fn stop(&self) {
        self.playback.halt();
        self.signal.send_modify(|generation| *generation += 1);
    }
}

/// Runs one recording session at a time.
pub struct CaptureOrchestrator<P> {
    host: Arc<dyn CaptureHost>,
    playback: P,
    pointer_rate_hz: u32,
    state: watch::Sender<RecordingState>,
    stop: Arc<watch::Sender<u64>>,
    active: AtomicBool,
}

/// Clears the active flag when a session ends, however it ends.
struct ActiveGuard<'a>(&'a AtomicBool);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Resources acquired by a session, released on every exit path.
struct Acquired {
    stream: Box<dyn MediaStream>,
    tracking: bool,
    collector: Option<CollectorTask>,
}

enum Finish {
    Stopped(StopReason),
    Fault(String),
}

impl<P: PlaybackControl + Clone> CaptureOrchestrator<P> {
    pub fn new(host: Arc<dyn CaptureHost>, playback: P, pointer_rate_hz: u32) -> Self {
        let (state, _) = watch::channel(RecordingState::Idle);
        let (stop, _) = watch::channel(0u64);
        Self {
            host,
            playback,
            pointer_rate_hz,
            state,
            stop: Arc::new(stop),
            active: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> RecordingState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<RecordingState> {
        self.state.subscribe()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn stop_handle(&self) -> StopHandle<P> {
        StopHandle {
            signal: Arc::clone(&self.stop),
            playback: self.playback.clone(),
        }
    }

    fn set_state(&self, state: RecordingState) {
        tracing::debug!(?state, "Recording state");
        self.state.send_replace(state);
    }

    /// Run a full session.
    ///
    /// Returns [`FlowError::AlreadyActive`] if another session is running.
    /// A refused capture grant is [`RecordingOutcome::Declined`], not an
    /// error.
    pub async fn record(&self, request: &RecordingRequest) -> FlowResult<RecordingOutcome> {
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(FlowError::already_active("A recording session is already running"));
        }
        let _guard = ActiveGuard(&self.active);

        let mut stop_rx = self.stop.subscribe();
        stop_rx.borrow_and_update();

        self.set_state(RecordingState::Arming);
        let Armed {
            inner: mut acquired,
            pointer_rx,
        } = match self.arm(request).await {
            Ok(armed) => armed,
            Err(FlowError::PermissionDenied { message }) => {
                tracing::info!(%message, "Capture permission declined");
                self.set_state(RecordingState::Idle);
                return Ok(RecordingOutcome::Declined);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to arm capture");
                self.set_state(RecordingState::Failed);
                return Err(e);
            }
        };

        self.set_state(RecordingState::Capturing);
        if let Err(e) = acquired.stream.start().await {
            tracing::error!(error = %e, "Failed to start media capture");
            self.release(acquired).await;
            self.set_state(RecordingState::Failed);
            return Err(into_recorder_fault(e));
        }

        let clock = RecordingClock::start();
        if let Some(rx) = pointer_rx {
            let collector =
                PointerCollector::new(clock.clone(), self.host.viewport_bounds(), self.pointer_rate_hz);
            acquired.collector = Some(CollectorTask::spawn(rx, collector));
        }

        let mut status_rx = self.playback.subscribe();
        status_rx.borrow_and_update();
        let mut fault_rx = acquired.stream.faults();
        self.playback.restart();
        tracing::info!(epoch = clock.epoch_wall(), "Recording started");

        let finish = tokio::select! {
            _ = wait_for_end(&mut status_rx) => Finish::Stopped(StopReason::TimelineEnded),
            _ = stop_rx.changed() => Finish::Stopped(StopReason::StopRequested),
            message = wait_for_fault(&mut fault_rx) => Finish::Fault(message),
        };

        self.set_state(RecordingState::Finalizing);
        self.playback.halt();

        let stop_reason = match finish {
            Finish::Stopped(reason) => reason,
            Finish::Fault(message) => {
                tracing::error!(%message, "Capture stream faulted");
                self.release(acquired).await;
                self.set_state(RecordingState::Failed);
                return Err(FlowError::recorder_fault(message));
            }
        };

        let pointer_samples = self.stop_tracking(&mut acquired).await;
        let media = match acquired.stream.stop().await {
            Ok(media) => media,
            Err(e) => {
                tracing::error!(error = %e, "Failed to finalize media");
                acquired.stream.release();
                self.set_state(RecordingState::Failed);
                return Err(into_recorder_fault(e));
            }
        };
        acquired.stream.release();

        tracing::info!(
            ?stop_reason,
            samples = pointer_samples.len(),
            bytes = media.data.len(),
            "Recording finished"
        );
        self.set_state(RecordingState::Idle);

        Ok(RecordingOutcome::Completed(CaptureArtifact {
            media,
            pointer_samples,
            stop_reason,
        }))
    }

    async fn arm(&self, request: &RecordingRequest) -> FlowResult<Armed> {
        let sources = self.host.list_capture_sources(&request.kinds).await?;
        let source = match &request.source_id {
            Some(id) => sources.into_iter().find(|s| &s.id == id),
            None => sources.into_iter().next(),
        }
        .ok_or_else(|| FlowError::source_unavailable("No capture source available"))?;

        tracing::info!(source = %source.name, kind = ?source.kind, "Arming capture");
        let stream = self
            .host
            .acquire_stream(&source, &request.constraints)
            .await?;

        let mut tracking = false;
        let mut pointer_rx = None;
        if self.host.supports_pointer_tracking() {
            match self.host.start_pointer_tracking().await {
                Ok(rx) => {
                    tracking = true;
                    pointer_rx = Some(rx);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Pointer tracking unavailable, recording without it");
                }
            }
        }

        Ok(Armed {
            inner: Acquired {
                stream,
                tracking,
                collector: None,
            },
            pointer_rx,
        })
    }

    async fn stop_tracking(&self, acquired: &mut Acquired) -> Vec<PointerSample> {
        if acquired.tracking {
            self.host.stop_pointer_tracking().await;
            acquired.tracking = false;
        }
        match acquired.collector.take() {
            Some(task) => task.finish().await,
            None => Vec::new(),
        }
    }

    async fn release(&self, mut acquired: Acquired) {
        self.stop_tracking(&mut acquired).await;
        acquired.stream.release();
    }
}

/// Output of the arming step.
struct Armed {
    inner: Acquired,
    pointer_rx: Option<mpsc::Receiver<RawPointerSample>>,
}

fn into_recorder_fault(e: FlowError) -> FlowError {
    match e {
        e @ FlowError::RecorderFault { .. } => e,
        other => FlowError::recorder_fault(other.to_string()),
    }
}

async fn wait_for_end(rx: &mut watch::Receiver<PlaybackStatus>) {
    loop {
        if rx.changed().await.is_err() {
            return;
        }
        if *rx.borrow_and_update() == PlaybackStatus::Ended {
            return;
        }
    }
}

async fn wait_for_fault(rx: &mut watch::Receiver<Option<String>>) -> String {
    loop {
        let current = rx.borrow_and_update().clone();
        if let Some(message) = current {
            return message;
        }
        if rx.changed().await.is_err() {
            // Stream dropped its fault sender without faulting.
            std::future::pending::<()>().await;
        }
    }
}
