use chrono::{DateTime, Local};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// The two paths a job operates on. Fixed once the job starts; the worker
/// thread only ever reads them.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl JobRequest {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// What the worker thread reports back, exactly once per job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    Failed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Please select an input video file")]
    MissingInput,
    #[error("Input file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("A processing job is already running")]
    AlreadyRunning,
    #[error("Output file not found: {}", .0.display())]
    OutputNotFound(PathBuf),
}

/// Owns the processing-job lifecycle: validates start requests, runs the
/// pipeline on a worker thread, and hands the outcome back to the UI thread
/// through a channel drained by [`JobController::poll`].
///
/// At most one job runs at a time; `start` while Running is rejected by the
/// controller itself, independent of any button state in the GUI.
pub struct JobController {
    state: JobState,
    current: Option<JobRequest>,
    outcome_rx: Option<UnboundedReceiver<JobOutcome>>,
    started_at: Option<DateTime<Local>>,
    finished_at: Option<DateTime<Local>>,
}

impl Default for JobController {
    fn default() -> Self {
        Self::new()
    }
}

impl JobController {
    pub fn new() -> Self {
        Self {
            state: JobState::Idle,
            current: None,
            outcome_rx: None,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == JobState::Running
    }

    pub fn current_request(&self) -> Option<&JobRequest> {
        self.current.as_ref()
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Local>> {
        self.finished_at
    }

    pub fn validate(request: &JobRequest) -> Result<(), JobError> {
        if request.input_path.as_os_str().is_empty() {
            return Err(JobError::MissingInput);
        }
        if !request.input_path.exists() {
            return Err(JobError::InputNotFound(request.input_path.clone()));
        }
        Ok(())
    }

    /// Starts a job on a fresh worker thread. `process` is the external
    /// operation: it blocks for as long as it likes and signals failure by
    /// returning an error. The worker creates the output's parent directory
    /// before invoking it, so a missing output directory is not a reason for
    /// the caller to fail early.
    ///
    /// Returns without blocking; the outcome arrives later via [`poll`].
    ///
    /// [`poll`]: JobController::poll
    pub fn start<F>(&mut self, request: JobRequest, process: F) -> Result<(), JobError>
    where
        F: FnOnce(&Path, &Path) -> anyhow::Result<()> + Send + 'static,
    {
        if self.state == JobState::Running {
            return Err(JobError::AlreadyRunning);
        }
        Self::validate(&request)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let job = request.clone();

        log::info!(
            "Starting processing job: {} -> {}",
            job.input_path.display(),
            job.output_path.display()
        );

        std::thread::spawn(move || {
            // A panicking pipeline must still produce an outcome, otherwise
            // the controller would stay Running forever.
            let result = catch_unwind(AssertUnwindSafe(|| {
                ensure_output_dir(&job.output_path)
                    .and_then(|_| process(&job.input_path, &job.output_path))
            }));
            let outcome = match result {
                Ok(Ok(())) => JobOutcome::Completed,
                Ok(Err(e)) => JobOutcome::Failed(e.to_string()),
                Err(payload) => JobOutcome::Failed(panic_message(payload)),
            };
            // The receiver disappears if the app shuts down mid-job; nothing
            // left to notify in that case.
            let _ = tx.send(outcome);
        });

        self.current = Some(request);
        self.outcome_rx = Some(rx);
        self.started_at = Some(Local::now());
        self.finished_at = None;
        self.state = JobState::Running;
        Ok(())
    }

    /// Non-blocking check for a finished job. Called from the UI thread each
    /// frame; yields the outcome of the current job exactly once and moves
    /// the state to Succeeded or Failed.
    pub fn poll(&mut self) -> Option<JobOutcome> {
        let rx = self.outcome_rx.as_mut()?;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            // The worker is gone without reporting. The job is over either
            // way; surface it as a failure rather than staying Running.
            Err(TryRecvError::Disconnected) => {
                JobOutcome::Failed("Processing thread exited without reporting an outcome".to_string())
            }
        };

        self.outcome_rx = None;
        self.finished_at = Some(Local::now());
        self.state = match &outcome {
            JobOutcome::Completed => {
                log::info!("Processing job completed successfully");
                JobState::Succeeded
            }
            JobOutcome::Failed(msg) => {
                log::error!("Processing job failed: {}", msg);
                JobState::Failed
            }
        };
        Some(outcome)
    }

    /// Back to Idle, e.g. when the user picks a different input file. A
    /// running job cannot be reset; there is no cancellation path.
    pub fn reset(&mut self) {
        if self.state != JobState::Running {
            self.state = JobState::Idle;
            self.current = None;
            self.started_at = None;
            self.finished_at = None;
        }
    }

    /// Verifies that a result file actually exists before anyone tries to
    /// open it with an external handler.
    pub fn check_result(path: &Path) -> Result<(), JobError> {
        if path.exists() {
            Ok(())
        } else {
            Err(JobError::OutputNotFound(path.to_path_buf()))
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("Processing thread panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("Processing thread panicked: {}", s)
    } else {
        "Processing thread panicked".to_string()
    }
}

/// Recursively creates the output path's parent directory. Idempotent; an
/// already existing directory is not an error.
fn ensure_output_dir(output_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("Failed to create output directory {}: {}", parent.display(), e)
            })?;
        }
    }
    Ok(())
}
