//! Calculation pool
//!
//! Owns the fixed worker set and the FIFO wait queue. Reports submitted
//! while every worker is busy wait in submission order; a worker that
//! finishes takes the head of the queue before it is marked free again.
//!
//! Bookkeeping happens under one short lock. The model call itself runs in
//! a spawned task outside of it.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use parascore_client::ModelClient;
use parascore_core::domain::report::{Report, ReportId, ReportStatus};
use parascore_core::dto::pool::{PoolStatus, WorkerSnapshot};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::config::CalculationConfig;
use crate::dispatch::ModelService;
use crate::error::{InitError, NotInQueue, SubmitError};
use crate::store::ReportStore;
use crate::worker::{Worker, WorkerId};

/// Where a submitted report ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Calculation started right away on this worker
    Started { worker_id: WorkerId },
    /// All workers busy; 1-based place in the wait queue
    Queued { position: usize },
}

/// Report calculation manager
///
/// Cheap to clone; all clones share the same workers and queue.
#[derive(Clone)]
pub struct CalculationManager {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    workers: Vec<Arc<Worker>>,
    state: Mutex<SchedulerState>,
    runtime: Handle,
}

struct SchedulerState {
    free_workers: VecDeque<WorkerId>,
    wait_queue: VecDeque<Report>,
    /// Report each worker is processing, indexed by worker id
    assignments: Vec<Option<ReportId>>,
}

/// Proof that a worker is checked out of the pool
///
/// Dropping it returns the worker, which happens on every exit path of the
/// task that owns it, panics included.
pub struct WorkerLease {
    pool: Arc<PoolInner>,
    worker_id: WorkerId,
}

impl Drop for WorkerLease {
    fn drop(&mut self) {
        PoolInner::release(&self.pool, self.worker_id);
    }
}

impl CalculationManager {
    /// Builds the worker set from `config`
    ///
    /// `connect` is called once per host and its service is shared by all
    /// workers of that host. Worker ids are assigned in host order.
    /// Must be called from within a Tokio runtime.
    pub fn init<F>(
        config: CalculationConfig,
        store: Arc<dyn ReportStore>,
        connect: F,
    ) -> Result<Self, InitError>
    where
        F: Fn(&str) -> parascore_client::Result<Arc<dyn ModelService>>,
    {
        config
            .validate()
            .map_err(|e| InitError::Config(e.to_string()))?;
        let runtime = Handle::try_current().map_err(|_| InitError::NoRuntime)?;

        let mut workers = Vec::with_capacity(config.total_workers());
        for host in &config.model_hosts {
            let model = connect(host).map_err(|source| InitError::Client {
                host: host.clone(),
                source,
            })?;
            for _ in 0..config.workers_per_host {
                let worker = Worker::new(workers.len(), host.clone(), model.clone(), store.clone());
                workers.push(Arc::new(worker));
            }
        }

        info!(
            workers = workers.len(),
            hosts = config.model_hosts.len(),
            "Calculation pool initialized"
        );

        let state = SchedulerState {
            free_workers: (0..workers.len()).collect(),
            wait_queue: VecDeque::new(),
            assignments: vec![None; workers.len()],
        };

        Ok(Self {
            inner: Arc::new(PoolInner {
                workers,
                state: Mutex::new(state),
                runtime,
            }),
        })
    }

    /// Builds the pool with one HTTP [`ModelClient`] per host
    pub fn with_http(
        config: CalculationConfig,
        store: Arc<dyn ReportStore>,
    ) -> Result<Self, InitError> {
        let timeout = config.request_timeout;
        Self::init(config, store, move |host| {
            let client = ModelClient::with_timeout(host, timeout)?;
            Ok(Arc::new(client) as Arc<dyn ModelService>)
        })
    }

    /// Starts `report` on a free worker, or appends it to the wait queue
    ///
    /// Never waits for the calculation itself. Only `WAITING` reports that
    /// this pool is not already holding are accepted.
    pub fn submit(&self, report: Report) -> Result<Submission, SubmitError> {
        if report.status != ReportStatus::Waiting {
            return Err(SubmitError::NotWaiting {
                id: report.id,
                status: report.status,
            });
        }

        let mut state = self.inner.lock();
        if state.wait_queue.iter().any(|queued| queued.id == report.id) {
            return Err(SubmitError::AlreadyQueued(report.id));
        }
        if state.assignments.contains(&Some(report.id)) {
            return Err(SubmitError::AlreadyRunning(report.id));
        }

        match state.free_workers.pop_front() {
            Some(worker_id) => {
                state.assignments[worker_id] = Some(report.id);
                drop(state);

                debug!(worker_id, report_id = report.id, "Report assigned to free worker");
                PoolInner::dispatch(&self.inner, worker_id, report);
                Ok(Submission::Started { worker_id })
            }
            None => {
                let report_id = report.id;
                state.wait_queue.push_back(report);
                let position = state.wait_queue.len();

                debug!(report_id, position, "All workers busy, report queued");
                Ok(Submission::Queued { position })
            }
        }
    }

    /// 1-based position of a report in the wait queue
    ///
    /// The head of the queue, the next report to start, is position 1.
    pub fn queue_position(&self, report_id: ReportId) -> Result<usize, NotInQueue> {
        self.inner
            .lock()
            .wait_queue
            .iter()
            .position(|queued| queued.id == report_id)
            .map(|idx| idx + 1)
            .ok_or(NotInQueue(report_id))
    }

    /// Snapshot of workers, free capacity and the wait queue
    pub fn status(&self) -> PoolStatus {
        let state = self.inner.lock();
        PoolStatus {
            workers: self
                .inner
                .workers
                .iter()
                .map(|worker| WorkerSnapshot {
                    id: worker.id(),
                    host: worker.host().to_string(),
                    current_report: state.assignments[worker.id()],
                })
                .collect(),
            free_workers: state.free_workers.len(),
            queued_reports: state.wait_queue.iter().map(|queued| queued.id).collect(),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.inner.workers.len()
    }
}

impl PoolInner {
    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `report` on `worker_id` in its own task
    ///
    /// The caller must already have recorded the assignment.
    fn dispatch(pool: &Arc<PoolInner>, worker_id: WorkerId, report: Report) {
        let worker = Arc::clone(&pool.workers[worker_id]);
        let lease = WorkerLease {
            pool: Arc::clone(pool),
            worker_id,
        };

        pool.runtime.spawn(async move {
            let report_id = report.id;
            if let Err(e) = worker.start(report, lease).await {
                warn!(worker_id, report_id, error = %e, "Report calculation ended with error");
            }
        });
    }

    /// Returns a worker to the pool, handing it the next queued report if any
    fn release(pool: &Arc<PoolInner>, worker_id: WorkerId) {
        let next = {
            let mut state = pool.lock();
            state.assignments[worker_id] = None;

            match state.wait_queue.pop_front() {
                Some(report) => {
                    state.assignments[worker_id] = Some(report.id);
                    Some(report)
                }
                None => {
                    state.free_workers.push_back(worker_id);
                    None
                }
            }
        };

        match next {
            Some(report) => {
                debug!(worker_id, report_id = report.id, "Worker took next queued report");
                Self::dispatch(pool, worker_id, report);
            }
            None => debug!(worker_id, "Worker is idle"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CalculationError, DispatchError, StoreError};
    use crate::store::InMemoryReportStore;
    use async_trait::async_trait;
    use parascore_core::domain::log::ReportLog;
    use parascore_core::domain::recognition::Recognition;
    use parascore_core::dto::model::{ModelResponse, SentencePrediction};
    use std::collections::{HashMap, HashSet};
    use std::time::Duration;
    use tokio::sync::oneshot;

    type Reply = Result<ModelResponse, DispatchError>;

    /// Model double that holds each text until the test releases it
    ///
    /// Texts without a registered gate are answered immediately.
    #[derive(Default)]
    struct GatedModel {
        gates: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
    }

    impl GatedModel {
        fn gate(&self, text: &str) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(text.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl ModelService for GatedModel {
        async fn recognize(&self, text: &str) -> Result<ModelResponse, DispatchError> {
            let gate = self.gates.lock().unwrap().remove(text);
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(DispatchError::Transport("gate dropped".into()))),
                None => Ok(response("v-default", &["instant."])),
            }
        }
    }

    /// Model double that panics on the text "panic"
    struct PanickingModel;

    #[async_trait]
    impl ModelService for PanickingModel {
        async fn recognize(&self, text: &str) -> Result<ModelResponse, DispatchError> {
            if text == "panic" {
                panic!("model double exploded");
            }
            Ok(response("v-ok", &["fine."]))
        }
    }

    /// In-memory store whose writes fail for selected reports
    #[derive(Default)]
    struct FlakyStore {
        inner: InMemoryReportStore,
        broken_saves: Mutex<HashSet<ReportId>>,
        broken_recognitions: Mutex<HashSet<ReportId>>,
    }

    fn disk_full() -> StoreError {
        StoreError::Backend("disk full".into())
    }

    #[async_trait]
    impl ReportStore for FlakyStore {
        async fn save_report(&self, report: &Report) -> Result<(), StoreError> {
            if self.broken_saves.lock().unwrap().contains(&report.id) {
                return Err(disk_full());
            }
            self.inner.save_report(report).await
        }

        async fn insert_recognitions(
            &self,
            report_id: ReportId,
            recognitions: &[Recognition],
        ) -> Result<(), StoreError> {
            if self.broken_recognitions.lock().unwrap().contains(&report_id) {
                return Err(disk_full());
            }
            self.inner.insert_recognitions(report_id, recognitions).await
        }

        async fn insert_log(&self, log: &ReportLog) -> Result<(), StoreError> {
            self.inner.insert_log(log).await
        }
    }

    fn response(version: &str, sentences: &[&str]) -> ModelResponse {
        ModelResponse {
            version: version.to_string(),
            source_text: sentences.join(" "),
            recognition: sentences
                .iter()
                .enumerate()
                .map(|(idx, sentence)| SentencePrediction {
                    sentence: sentence.to_string(),
                    is_paraphrase: idx % 2 == 0,
                    probability: 0.5,
                })
                .collect(),
            recognition_time: "0.01".to_string(),
        }
    }

    fn hosts(count: usize) -> Vec<String> {
        (1..=count)
            .map(|n| format!("http://model-{}:8000/predict", n))
            .collect()
    }

    fn build_pool(
        store: &Arc<InMemoryReportStore>,
        model: Arc<dyn ModelService>,
        host_count: usize,
        workers_per_host: usize,
    ) -> CalculationManager {
        build_pool_on(store.clone(), model, host_count, workers_per_host)
    }

    fn build_pool_on(
        store: Arc<dyn ReportStore>,
        model: Arc<dyn ModelService>,
        host_count: usize,
        workers_per_host: usize,
    ) -> CalculationManager {
        let config = CalculationConfig::new(hosts(host_count)).with_workers_per_host(workers_per_host);
        CalculationManager::init(config, store, move |_| Ok(model.clone())).unwrap()
    }

    /// Takes a free worker out of the pool the way `submit` does, so the
    /// test can drive `Worker::start` itself and inspect its result
    fn checkout(pool: &CalculationManager, report_id: ReportId) -> (Arc<Worker>, WorkerLease) {
        let mut state = pool.inner.lock();
        let worker_id = state.free_workers.pop_front().unwrap();
        state.assignments[worker_id] = Some(report_id);
        drop(state);

        let lease = WorkerLease {
            pool: Arc::clone(&pool.inner),
            worker_id,
        };
        (Arc::clone(&pool.inner.workers[worker_id]), lease)
    }

    async fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
        let waited = tokio::time::timeout(Duration::from_secs(5), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(waited.is_ok(), "timed out waiting for {}", what);
    }

    async fn wait_for_status(store: &InMemoryReportStore, report_id: ReportId, status: ReportStatus) {
        wait_until(&format!("report {} to be {}", report_id, status), || {
            store.report(report_id).map(|r| r.status) == Some(status)
        })
        .await;
    }

    #[tokio::test]
    async fn test_single_worker_scenario() {
        let store = Arc::new(InMemoryReportStore::new());
        let model = Arc::new(GatedModel::default());
        let pool = build_pool(&store, model.clone(), 1, 1);

        let j1 = store.create_report("first", 1);
        let j2 = store.create_report("second", 1);
        let j3 = store.create_report("third", 1);
        let release_j1 = model.gate("first");
        let release_j2 = model.gate("second");
        let release_j3 = model.gate("third");

        assert_eq!(pool.submit(j1.clone()).unwrap(), Submission::Started { worker_id: 0 });
        assert_eq!(pool.submit(j2.clone()).unwrap(), Submission::Queued { position: 1 });
        assert_eq!(pool.submit(j3.clone()).unwrap(), Submission::Queued { position: 2 });

        wait_for_status(&store, j1.id, ReportStatus::InProcess).await;
        assert_eq!(pool.queue_position(j1.id), Err(NotInQueue(j1.id)));
        assert_eq!(pool.queue_position(j2.id), Ok(1));
        assert_eq!(pool.queue_position(j3.id), Ok(2));
        assert_eq!(store.report(j2.id).unwrap().status, ReportStatus::Waiting);

        release_j1.send(Ok(response("v1", &["a.", "b."]))).unwrap();
        wait_for_status(&store, j1.id, ReportStatus::Completed).await;
        wait_for_status(&store, j2.id, ReportStatus::InProcess).await;
        assert_eq!(pool.queue_position(j2.id), Err(NotInQueue(j2.id)));
        assert_eq!(pool.queue_position(j3.id), Ok(1));

        release_j2
            .send(Err(DispatchError::Remote {
                status: 500,
                message: "model crashed".into(),
            }))
            .unwrap();
        wait_for_status(&store, j2.id, ReportStatus::Error).await;
        assert_eq!(store.logs(j2.id).len(), 1);
        assert!(store.logs(j2.id)[0].error.contains("model crashed"));
        assert!(store.recognitions(j2.id).is_empty());
        assert!(store.report(j2.id).unwrap().calculation_ended_at.is_some());

        wait_for_status(&store, j3.id, ReportStatus::InProcess).await;
        assert_eq!(pool.queue_position(j3.id), Err(NotInQueue(j3.id)));

        release_j3.send(Ok(response("v1", &["c."]))).unwrap();
        wait_for_status(&store, j3.id, ReportStatus::Completed).await;
        wait_until("worker to become free", || pool.status().free_workers == 1).await;
    }

    #[tokio::test]
    async fn test_reports_up_to_capacity_start_immediately() {
        let store = Arc::new(InMemoryReportStore::new());
        let model = Arc::new(GatedModel::default());
        let pool = build_pool(&store, model.clone(), 2, 2);

        let mut worker_ids = Vec::new();
        let mut gates = Vec::new();
        let mut reports = Vec::new();
        for n in 0..4 {
            let text = format!("text {}", n);
            gates.push(model.gate(&text));
            let report = store.create_report(text, 1);
            match pool.submit(report.clone()).unwrap() {
                Submission::Started { worker_id } => worker_ids.push(worker_id),
                other => panic!("expected immediate start, got {:?}", other),
            }
            reports.push(report);
        }

        worker_ids.sort_unstable();
        assert_eq!(worker_ids, vec![0, 1, 2, 3]);

        for report in &reports {
            assert!(pool.queue_position(report.id).is_err());
            wait_for_status(&store, report.id, ReportStatus::InProcess).await;
        }

        let status = pool.status();
        assert_eq!(status.free_workers, 0);
        assert_eq!(status.busy_workers(), 4);
        assert!(status.queued_reports.is_empty());

        for gate in gates {
            gate.send(Ok(response("v1", &["x."]))).unwrap();
        }
        wait_until("all workers to become free", || pool.status().free_workers == 4).await;
    }

    #[tokio::test]
    async fn test_waiting_reports_keep_fifo_order() {
        let store = Arc::new(InMemoryReportStore::new());
        let model = Arc::new(GatedModel::default());
        let pool = build_pool(&store, model.clone(), 1, 1);

        let blocker = store.create_report("blocker", 1);
        let release = model.gate("blocker");
        pool.submit(blocker).unwrap();

        let queued: Vec<Report> = (0..5)
            .map(|n| store.create_report(format!("queued {}", n), 1))
            .collect();
        for report in &queued {
            pool.submit(report.clone()).unwrap();
        }

        let positions: Vec<usize> = queued
            .iter()
            .map(|r| pool.queue_position(r.id).unwrap())
            .collect();
        assert_eq!(positions, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            pool.status().queued_reports,
            queued.iter().map(|r| r.id).collect::<Vec<_>>()
        );

        // Queued texts have no gate and finish instantly once started
        release.send(Ok(response("v1", &["b."]))).unwrap();
        for report in &queued {
            wait_for_status(&store, report.id, ReportStatus::Completed).await;
        }

        let started: Vec<_> = queued
            .iter()
            .map(|r| store.report(r.id).unwrap().calculation_started_at.unwrap())
            .collect();
        assert!(started.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[tokio::test]
    async fn test_successful_report_stores_ordered_recognitions() {
        let store = Arc::new(InMemoryReportStore::new());
        let model = Arc::new(GatedModel::default());
        let pool = build_pool(&store, model.clone(), 1, 1);

        let report = store.create_report("One. Two. Three.", 4);
        let release = model.gate("One. Two. Three.");
        pool.submit(report.clone()).unwrap();

        release
            .send(Ok(response("paraphrase-2.3", &["One.", "Two.", "Three."])))
            .unwrap();
        wait_for_status(&store, report.id, ReportStatus::Completed).await;

        let stored = store.report(report.id).unwrap();
        assert_eq!(stored.model_version.as_deref(), Some("paraphrase-2.3"));
        let started = stored.calculation_started_at.unwrap();
        let ended = stored.calculation_ended_at.unwrap();
        assert!(started <= ended);

        let recognitions = store.recognitions(report.id);
        let numbers: Vec<i32> = recognitions.iter().map(|r| r.sequence_number).collect();
        assert_eq!(numbers, vec![0, 1, 2]);
        assert_eq!(recognitions[2].sentence, "Three.");
        assert!(store.logs(report.id).is_empty());
    }

    #[tokio::test]
    async fn test_failed_report_is_logged_and_frees_worker() {
        let store = Arc::new(InMemoryReportStore::new());
        let model = Arc::new(GatedModel::default());
        let pool = build_pool(&store, model.clone(), 1, 1);

        let report = store.create_report("bad payload", 1);
        let release = model.gate("bad payload");
        pool.submit(report.clone()).unwrap();

        let mut malformed = response("v1", &["x."]);
        malformed.recognition[0].probability = 2.0;
        release.send(Ok(malformed)).unwrap();

        wait_for_status(&store, report.id, ReportStatus::Error).await;
        wait_until("worker to become free", || pool.status().free_workers == 1).await;

        let stored = store.report(report.id).unwrap();
        assert!(stored.calculation_ended_at.is_some());
        assert!(stored.model_version.is_none());
        assert!(store.recognitions(report.id).is_empty());

        let logs = store.logs(report.id);
        assert_eq!(logs.len(), 1);
        assert!(logs[0].error.contains("malformed model response"));

        let next = store.create_report("next", 1);
        assert_eq!(pool.submit(next).unwrap(), Submission::Started { worker_id: 0 });
    }

    #[tokio::test]
    async fn test_panicking_calculation_still_frees_worker() {
        let store = Arc::new(InMemoryReportStore::new());
        let pool = build_pool(&store, Arc::new(PanickingModel), 1, 1);

        let doomed = store.create_report("panic", 1);
        let doomed_id = doomed.id;
        let follower = store.create_report("after", 1);

        pool.submit(doomed).unwrap();
        assert!(matches!(pool.submit(follower.clone()).unwrap(), Submission::Queued { .. }));

        wait_for_status(&store, follower.id, ReportStatus::Completed).await;
        wait_until("worker to become free", || pool.status().free_workers == 1).await;

        let doomed = store.report(doomed_id).unwrap();
        assert_eq!(doomed.status, ReportStatus::Error);
        assert!(doomed.calculation_ended_at.is_some());
        assert!(store.recognitions(doomed_id).is_empty());

        let logs = store.logs(doomed_id);
        assert_eq!(logs.len(), 1);
        assert!(logs[0].error.contains("model double exploded"));
    }

    #[tokio::test]
    async fn test_recognition_store_failure_still_frees_worker() {
        let store = Arc::new(FlakyStore::default());
        let pool = build_pool_on(store.clone(), Arc::new(GatedModel::default()), 1, 1);

        let broken = store.inner.create_report("broken", 1);
        let next = store.inner.create_report("next", 1);
        store.broken_recognitions.lock().unwrap().insert(broken.id);

        let (worker, lease) = checkout(&pool, broken.id);
        assert_eq!(pool.submit(next.clone()).unwrap(), Submission::Queued { position: 1 });

        let err = worker.start(broken.clone(), lease).await.unwrap_err();
        assert!(matches!(err, CalculationError::Store(StoreError::Backend(_))));

        let stored = store.inner.report(broken.id).unwrap();
        assert_eq!(stored.status, ReportStatus::Error);
        assert!(stored.calculation_ended_at.is_some());
        assert_eq!(store.inner.logs(broken.id).len(), 1);
        assert!(store.inner.recognitions(broken.id).is_empty());

        wait_for_status(&store.inner, next.id, ReportStatus::Completed).await;
        wait_until("worker to become free", || pool.status().free_workers == 1).await;
    }

    #[tokio::test]
    async fn test_failing_report_saves_still_free_worker() {
        let store = Arc::new(FlakyStore::default());
        let pool = build_pool_on(store.clone(), Arc::new(GatedModel::default()), 1, 1);

        let broken = store.inner.create_report("unsaveable", 1);
        let next = store.inner.create_report("next", 1);
        store.broken_saves.lock().unwrap().insert(broken.id);

        let (worker, lease) = checkout(&pool, broken.id);
        pool.submit(next.clone()).unwrap();

        let err = worker.start(broken.clone(), lease).await.unwrap_err();
        match err {
            CalculationError::Finish { source, finish } => {
                assert!(matches!(*source, CalculationError::Store(_)));
                assert!(matches!(*finish, CalculationError::Store(_)));
            }
            other => panic!("expected finish error, got {:?}", other),
        }

        // Nothing about the broken report could be saved except its log
        assert_eq!(store.inner.report(broken.id).unwrap().status, ReportStatus::Waiting);
        assert_eq!(store.inner.logs(broken.id).len(), 1);

        wait_for_status(&store.inner, next.id, ReportStatus::Completed).await;
        wait_until("worker to become free", || pool.status().free_workers == 1).await;
        assert!(pool.status().queued_reports.is_empty());
    }

    #[tokio::test]
    async fn test_workers_are_numbered_in_host_order() {
        let store = Arc::new(InMemoryReportStore::new());
        let pool = build_pool(&store, Arc::new(GatedModel::default()), 2, 2);

        let status = pool.status();
        assert_eq!(pool.worker_count(), 4);
        assert_eq!(status.free_workers, 4);

        let layout: Vec<(usize, &str)> = status
            .workers
            .iter()
            .map(|w| (w.id, w.host.as_str()))
            .collect();
        assert_eq!(
            layout,
            vec![
                (0, "http://model-1:8000/predict"),
                (1, "http://model-1:8000/predict"),
                (2, "http://model-2:8000/predict"),
                (3, "http://model-2:8000/predict"),
            ]
        );
    }

    #[tokio::test]
    async fn test_submit_rejects_reports_it_cannot_take() {
        let store = Arc::new(InMemoryReportStore::new());
        let model = Arc::new(GatedModel::default());
        let pool = build_pool(&store, model.clone(), 1, 1);

        let running = store.create_report("running", 1);
        let queued = store.create_report("queued", 1);
        let _hold = model.gate("running");
        pool.submit(running.clone()).unwrap();
        pool.submit(queued.clone()).unwrap();

        assert_eq!(
            pool.submit(running.clone()),
            Err(SubmitError::AlreadyRunning(running.id))
        );
        assert_eq!(
            pool.submit(queued.clone()),
            Err(SubmitError::AlreadyQueued(queued.id))
        );

        let mut finished = store.create_report("done", 1);
        finished.begin_calculation(chrono::Utc::now()).unwrap();
        finished.complete("v1").unwrap();
        assert_eq!(
            pool.submit(finished.clone()),
            Err(SubmitError::NotWaiting {
                id: finished.id,
                status: ReportStatus::Completed,
            })
        );
        assert_eq!(pool.status().queued_reports, vec![queued.id]);
    }

    #[tokio::test]
    async fn test_init_rejects_invalid_config() {
        let store: Arc<dyn ReportStore> = Arc::new(InMemoryReportStore::new());
        let model: Arc<dyn ModelService> = Arc::new(GatedModel::default());

        let result = CalculationManager::init(CalculationConfig::new(vec![]), store, move |_| {
            Ok(model.clone())
        });
        assert!(matches!(result, Err(InitError::Config(_))));
    }

    #[test]
    fn test_init_requires_runtime() {
        let store: Arc<dyn ReportStore> = Arc::new(InMemoryReportStore::new());
        let model: Arc<dyn ModelService> = Arc::new(GatedModel::default());

        let result = CalculationManager::init(CalculationConfig::new(hosts(1)), store, move |_| {
            Ok(model.clone())
        });
        assert!(matches!(result, Err(InitError::NoRuntime)));
    }
}
