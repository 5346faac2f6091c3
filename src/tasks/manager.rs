//! Background task manager for tracking and cancelling loads.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use super::{run_load, BackgroundTask, LoadOutcome, TaskCompletionInfo, TaskId, TaskState, TaskUpdate};
use crate::source::ImageSource;

/// Owns every in-flight load. Dropping the manager cancels them all.
pub struct BackgroundTaskManager {
    tasks: HashMap<TaskId, BackgroundTask>,
    /// Order in which tasks were added
    task_order: Vec<TaskId>,
}

impl BackgroundTaskManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            task_order: Vec::new(),
        }
    }

    /// Register a new background task.
    /// Returns the TaskId and a sender for the task to send updates.
    pub fn register_task(&mut self, source: &'static str) -> (TaskId, mpsc::Sender<TaskUpdate>, Arc<AtomicBool>) {
        let (tx, rx) = mpsc::channel();
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let task = BackgroundTask::new(source, cancel_flag.clone(), rx);
        let id = task.id;

        self.tasks.insert(id, task);
        self.task_order.push(id);

        (id, tx, cancel_flag)
    }

    /// Start loading `source` on a worker thread.
    pub fn spawn_load(&mut self, source: Box<dyn ImageSource>) -> TaskId {
        let (id, tx, cancel_flag) = self.register_task(source.name());
        tracing::debug!(task = id.0, source = source.name(), "Spawning load task");

        std::thread::spawn(move || {
            run_load(source.as_ref(), &tx, &cancel_flag);
        });

        id
    }

    /// Cancel a specific task by ID. Its eventual result is discarded.
    pub fn cancel_task(&mut self, id: TaskId) -> bool {
        match self.tasks.remove(&id) {
            Some(task) => {
                task.cancel();
                self.task_order.retain(|t| *t != id);
                tracing::info!(task = id.0, source = task.source, "Load cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancel all running tasks.
    pub fn cancel_all(&mut self) {
        let ids: Vec<TaskId> = self.task_order.clone();
        for id in ids {
            self.cancel_task(id);
        }
    }

    /// Poll all task channels for updates.
    /// Returns the loads that finished since the last poll.
    pub fn poll_updates(&mut self) -> Vec<TaskCompletionInfo> {
        let mut completed = Vec::new();

        for id in &self.task_order {
            let Some(task) = self.tasks.get_mut(id) else {
                continue;
            };

            // Drain all available updates
            loop {
                match task.receiver.try_recv() {
                    Ok(TaskUpdate::Started) => task.state = TaskState::Running,
                    Ok(TaskUpdate::Finished(outcome)) => {
                        task.state = TaskState::Finished;
                        let outcome = if task.cancel_flag.load(Ordering::SeqCst) {
                            LoadOutcome::Cancelled
                        } else {
                            outcome
                        };
                        completed.push(TaskCompletionInfo {
                            id: *id,
                            source: task.source,
                            outcome,
                            elapsed: task.elapsed(),
                        });
                        break;
                    }
                    Err(mpsc::TryRecvError::Empty) => break,
                    Err(mpsc::TryRecvError::Disconnected) => {
                        // Thread died without reporting, most likely a panic
                        task.state = TaskState::Finished;
                        tracing::error!(task = id.0, "Load task ended without a result");
                        completed.push(TaskCompletionInfo {
                            id: *id,
                            source: task.source,
                            outcome: LoadOutcome::Cancelled,
                            elapsed: task.elapsed(),
                        });
                        break;
                    }
                }
            }
        }

        // Remove completed tasks from tracking
        for info in &completed {
            self.tasks.remove(&info.id);
            self.task_order.retain(|id| *id != info.id);
        }

        completed
    }

    /// Get all running tasks for display.
    pub fn running_tasks(&self) -> Vec<&BackgroundTask> {
        self.task_order
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .filter(|t| t.is_running())
            .collect()
    }

    /// Check if any tasks are running.
    pub fn has_running_tasks(&self) -> bool {
        self.tasks.values().any(|t| t.is_running())
    }
}

impl Default for BackgroundTaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BackgroundTaskManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageRecord;
    use crate::source::{LoadError, SyntheticSource};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    /// Blocks in `load` until the test releases it.
    struct GatedSource {
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl ImageSource for GatedSource {
        fn name(&self) -> &'static str {
            "gated"
        }

        fn load(&self) -> Result<Vec<ImageRecord>, LoadError> {
            let _ = self.gate.lock().unwrap().recv();
            Ok(vec![ImageRecord::new("1", "u", "Late")])
        }
    }

    struct FailingSource;

    impl ImageSource for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn load(&self) -> Result<Vec<ImageRecord>, LoadError> {
            Err(LoadError::Request {
                endpoint: "http://nowhere".into(),
                message: "connection refused".into(),
            })
        }
    }

    fn wait_for_completion(manager: &mut BackgroundTaskManager) -> Vec<TaskCompletionInfo> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let done = manager.poll_updates();
            if !done.is_empty() || Instant::now() > deadline {
                return done;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_load_delivers_records() {
        let mut manager = BackgroundTaskManager::new();
        let id = manager.spawn_load(Box::new(SyntheticSource::new(12)));
        assert!(manager.has_running_tasks());

        let done = wait_for_completion(&mut manager);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, id);
        assert_eq!(done[0].source, "synthetic");
        match &done[0].outcome {
            LoadOutcome::Loaded(records) => assert_eq!(records.len(), 12),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(!manager.has_running_tasks());
    }

    #[test]
    fn test_failure_is_reported() {
        let mut manager = BackgroundTaskManager::new();
        manager.spawn_load(Box::new(FailingSource));
        let done = wait_for_completion(&mut manager);
        assert!(matches!(done[0].outcome, LoadOutcome::Failed(LoadError::Request { .. })));
    }

    #[test]
    fn test_cancelled_result_is_discarded() {
        let (release, gate) = mpsc::channel();
        let mut manager = BackgroundTaskManager::new();
        let id = manager.spawn_load(Box::new(GatedSource { gate: Mutex::new(gate) }));

        assert!(manager.cancel_task(id));
        assert!(!manager.cancel_task(id));
        release.send(()).unwrap();

        std::thread::sleep(Duration::from_millis(50));
        assert!(manager.poll_updates().is_empty());
        assert!(manager.running_tasks().is_empty());
    }

    #[test]
    fn test_cancel_flag_set_before_finish_reports_cancelled() {
        let mut manager = BackgroundTaskManager::new();
        let (_id, tx, cancel_flag) = manager.register_task("manual");
        cancel_flag.store(true, Ordering::SeqCst);
        tx.send(TaskUpdate::Finished(LoadOutcome::Loaded(Vec::new()))).unwrap();

        let done = manager.poll_updates();
        assert!(matches!(done[0].outcome, LoadOutcome::Cancelled));
    }

    #[test]
    fn test_run_load_skips_when_already_cancelled() {
        let (tx, rx) = mpsc::channel();
        let flag = AtomicBool::new(true);
        run_load(&FailingSource, &tx, &flag);
        assert!(matches!(rx.try_recv(), Ok(TaskUpdate::Finished(LoadOutcome::Cancelled))));
    }
}
