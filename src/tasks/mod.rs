//! Background loading of the record set without blocking the UI.
//!
//! A load runs on its own thread and reports through a channel. Each task
//! carries a cancel flag; once cancelled, whatever the thread produces is
//! discarded, so a stale result can never reach the gallery.

pub mod manager;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use crate::model::ImageRecord;
use crate::source::{ImageSource, LoadError};

pub use manager::BackgroundTaskManager;

/// Unique identifier for a background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

impl TaskId {
    pub fn new() -> Self {
        use std::sync::atomic::AtomicU64;
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        TaskId(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

/// How a load ended.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Vec<ImageRecord>),
    Failed(LoadError),
    Cancelled,
}

/// State of a background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Finished,
}

/// Update messages sent from background tasks via channels.
#[derive(Debug)]
pub enum TaskUpdate {
    /// The thread picked the task up
    Started,
    /// Final message, always the last one sent
    Finished(LoadOutcome),
}

/// A registered load with its communication channel.
pub struct BackgroundTask {
    pub id: TaskId,
    /// Name of the source being loaded
    pub source: &'static str,
    pub state: TaskState,
    pub cancel_flag: Arc<AtomicBool>,
    pub receiver: mpsc::Receiver<TaskUpdate>,
    pub started_at: Instant,
}

impl BackgroundTask {
    pub fn new(source: &'static str, cancel_flag: Arc<AtomicBool>, receiver: mpsc::Receiver<TaskUpdate>) -> Self {
        Self {
            id: TaskId::new(),
            source,
            state: TaskState::Pending,
            cancel_flag,
            receiver,
            started_at: Instant::now(),
        }
    }

    /// Request cancellation of this task.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    /// Get elapsed time since task started.
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Check if task is still running.
    pub fn is_running(&self) -> bool {
        self.state != TaskState::Finished
    }
}

/// A finished load, handed back to the owner of the manager.
#[derive(Debug)]
pub struct TaskCompletionInfo {
    pub id: TaskId,
    pub source: &'static str,
    pub outcome: LoadOutcome,
    pub elapsed: std::time::Duration,
}

/// Body of a load thread: run the source unless cancelled, then report.
pub fn run_load(source: &dyn ImageSource, tx: &mpsc::Sender<TaskUpdate>, cancel_flag: &AtomicBool) {
    if cancel_flag.load(Ordering::SeqCst) {
        let _ = tx.send(TaskUpdate::Finished(LoadOutcome::Cancelled));
        return;
    }

    let _ = tx.send(TaskUpdate::Started);
    let outcome = match source.load() {
        Ok(records) => LoadOutcome::Loaded(records),
        Err(e) => LoadOutcome::Failed(e),
    };

    let outcome = if cancel_flag.load(Ordering::SeqCst) {
        LoadOutcome::Cancelled
    } else {
        outcome
    };

    // The receiver is gone when the task was dropped; nothing to report to
    let _ = tx.send(TaskUpdate::Finished(outcome));
}
