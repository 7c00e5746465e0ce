use crate::gui_bridge::model::DashboardModel;
use crate::workflow::runner::Runner;
use linecore::ingest::upload::{validate_upload, FileCache, UploadError};
use linecore::prelude::TabularDecoder;
use linecore::telemetry::{MetricsRecorder, MetricsSnapshot};
use log::{error, info, warn};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

pub const NO_SOURCE_MESSAGE: &str = "No file available. Please upload a file.";
pub const DECODE_FAILURE_MESSAGE: &str =
    "Failed to process the uploaded workbook. Please try uploading the file again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControllerPhase {
    Empty,
    Cached,
    Refreshing,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Completed,
    /// An overlapping request while a refresh was in flight; discarded,
    /// never queued.
    Dropped,
    NoSource,
    Failed,
}

struct ControllerState {
    cache: Option<FileCache>,
    phase: ControllerPhase,
    auto_refresh: bool,
    timer: Option<JoinHandle<()>>,
}

/// Owns the staged source bytes and drives manual and timed re-decoding.
///
/// Phases: `Empty -> Cached -> Refreshing -> {Cached, Error}`. Auto-refresh
/// is an orthogonal flag, only meaningful while a cache is present. A decode
/// failure is fail-closed: the cache is discarded and the timer cancelled,
/// so recovery always goes through a fresh upload.
pub struct RefreshController {
    state: Mutex<ControllerState>,
    busy: AtomicBool,
    decoder: Box<dyn TabularDecoder>,
    runner: Runner,
    refresh_period: Duration,
    model: Arc<RwLock<DashboardModel>>,
    metrics: MetricsRecorder,
    weak_self: Weak<RefreshController>,
}

impl RefreshController {
    pub fn new(decoder: Box<dyn TabularDecoder>, refresh_period: Duration) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            state: Mutex::new(ControllerState {
                cache: None,
                phase: ControllerPhase::Empty,
                auto_refresh: false,
                timer: None,
            }),
            busy: AtomicBool::new(false),
            decoder,
            runner: Runner::new(),
            refresh_period,
            model: Arc::new(RwLock::new(DashboardModel::default())),
            metrics: MetricsRecorder::new(),
            weak_self: weak.clone(),
        })
    }

    /// Shared handle to the published snapshot.
    pub fn model(&self) -> Arc<RwLock<DashboardModel>> {
        self.model.clone()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn phase(&self) -> ControllerPhase {
        self.state.lock().unwrap().phase
    }

    pub fn file_name(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .cache
            .as_ref()
            .map(|cache| cache.file_name.clone())
    }

    pub fn auto_refresh_enabled(&self) -> bool {
        self.state.lock().unwrap().auto_refresh
    }

    /// Stages a new source file. The previous cache and timer are discarded
    /// before validation runs, so a failed upload leaves the controller
    /// Empty rather than in its prior Cached state.
    pub fn stage(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        mime: Option<&str>,
    ) -> Result<(), UploadError> {
        self.teardown();
        validate_upload(file_name, bytes.len() as u64, mime)?;

        let size = bytes.len();
        let mut state = self.state.lock().unwrap();
        state.cache = Some(FileCache::new(file_name, bytes));
        state.phase = ControllerPhase::Cached;
        info!("staged {} ({} bytes)", file_name, size);
        Ok(())
    }

    /// Re-decodes the cached bytes and publishes the result. Single-flight:
    /// while one refresh runs, further requests return [`RefreshOutcome::Dropped`].
    pub fn refresh(&self) -> RefreshOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return RefreshOutcome::Dropped;
        }
        let outcome = self.run_refresh();
        self.busy.store(false, Ordering::SeqCst);
        outcome
    }

    fn run_refresh(&self) -> RefreshOutcome {
        let staged = {
            let mut state = self.state.lock().unwrap();
            let staged = state
                .cache
                .as_ref()
                .map(|cache| (cache.decode_copy(), cache.file_name.clone()));
            if staged.is_some() {
                state.phase = ControllerPhase::Refreshing;
            }
            staged
        };
        let Some((bytes, file_name)) = staged else {
            self.model.write().unwrap().error = Some(NO_SOURCE_MESSAGE.to_string());
            return RefreshOutcome::NoSource;
        };

        match self.decoder.decode(&bytes) {
            Ok(rows) => {
                let outcome = self.runner.execute(&rows);
                self.metrics.record_rows(outcome.record_count);
                {
                    let mut state = self.state.lock().unwrap();
                    // A teardown can land while the decode runs; in that
                    // case the phase stays Empty and only the model updates.
                    if state.cache.is_some() {
                        state.phase = ControllerPhase::Cached;
                    }
                }
                *self.model.write().unwrap() =
                    DashboardModel::from_outcome(outcome, Some(file_name));
                self.metrics.record_refresh();
                RefreshOutcome::Completed
            }
            Err(err) => {
                error!("decode failed for {}: {}", file_name, err);
                self.metrics.record_decode_failure();
                {
                    let mut state = self.state.lock().unwrap();
                    state.cache = None;
                    state.auto_refresh = false;
                    if let Some(timer) = state.timer.take() {
                        timer.abort();
                    }
                    state.phase = ControllerPhase::Error;
                }
                self.model.write().unwrap().error = Some(DECODE_FAILURE_MESSAGE.to_string());
                RefreshOutcome::Failed
            }
        }
    }

    /// Starts the periodic refresh timer. No-op when already enabled or when
    /// nothing is staged. Must be called from within a tokio runtime.
    pub fn enable_auto_refresh(&self) {
        let mut state = self.state.lock().unwrap();
        if state.auto_refresh {
            return;
        }
        if state.cache.is_none() {
            warn!("auto-refresh requested without a staged file");
            return;
        }
        state.auto_refresh = true;

        let weak = self.weak_self.clone();
        let period = self.refresh_period;
        state.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match weak.upgrade() {
                    Some(controller) => {
                        controller.refresh();
                    }
                    None => break,
                }
            }
        }));
        info!("auto-refresh enabled ({:?} period)", period);
    }

    /// Cancels the pending timer. An already-running refresh still completes
    /// and publishes its result.
    pub fn disable_auto_refresh(&self) {
        let mut state = self.state.lock().unwrap();
        state.auto_refresh = false;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
    }

    /// Cancels the timer, clears the cache, and resets to Empty. The
    /// published model is left intact until the next upload replaces it.
    pub fn teardown(&self) {
        let mut state = self.state.lock().unwrap();
        state.auto_refresh = false;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.cache = None;
        state.phase = ControllerPhase::Empty;
    }
}

impl Drop for RefreshController {
    fn drop(&mut self) {
        self.teardown();
    }
}
