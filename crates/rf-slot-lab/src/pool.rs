//! Background simulation workers
//!
//! Each submitted run executes as one task on a dedicated rayon pool. The
//! task talks back over a one-way crossbeam channel; the caller keeps a
//! [`SimulationHandle`] to listen, wait or cancel. Dropping the handle
//! cancels the run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use parking_lot::RwLock;

use crate::config::{GameConfig, SimulationConfig};
use crate::driver::Simulation;
use crate::error::{SlotLabError, SlotLabResult};
use crate::stats::SimResults;

/// Notification from a running simulation
#[derive(Debug, Clone)]
pub enum SimEvent {
    /// Percent complete, non-decreasing
    Progress(f64),
    /// Final results; never sent for a cancelled run
    Completed(SimResults),
}

/// Lifecycle of a submitted run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Queued,
    Running,
    Completed,
    Cancelled,
    Failed,
}

/// Worker pool for simulation runs
pub struct SimulationPool {
    pool: rayon::ThreadPool,
    threads: usize,
}

impl SimulationPool {
    /// Pool with one worker per logical CPU
    pub fn new() -> SlotLabResult<Self> {
        Self::with_threads(num_cpus::get())
    }

    pub fn with_threads(threads: usize) -> SlotLabResult<Self> {
        let threads = threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("slot-sim-{i}"))
            .build()
            .map_err(|e| {
                log::warn!("Failed to build simulation pool: {e}");
                SlotLabError::WorkerPool(e.to_string())
            })?;
        Ok(Self { pool, threads })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Start a run in the background
    pub fn submit(&self, config: Arc<GameConfig>, settings: SimulationConfig) -> SimulationHandle {
        let (tx, rx) = unbounded();
        let cancel = Arc::new(AtomicBool::new(false));
        let state = Arc::new(RwLock::new(RunState::Queued));

        let worker_cancel = Arc::clone(&cancel);
        let worker_state = Arc::clone(&state);
        self.pool.spawn(move || {
            run_worker(Simulation::new(config, settings), tx, &worker_cancel, &worker_state);
        });

        SimulationHandle {
            events: rx,
            cancel,
            state,
        }
    }

    /// Submit and block until the run finishes
    pub fn run_simulation(
        &self,
        config: Arc<GameConfig>,
        settings: SimulationConfig,
    ) -> SlotLabResult<SimResults> {
        self.submit(config, settings).wait()
    }
}

fn run_worker(
    sim: Simulation,
    tx: Sender<SimEvent>,
    cancel: &AtomicBool,
    state: &RwLock<RunState>,
) {
    *state.write() = RunState::Running;
    let mut rng = sim.rng();

    let outcome = sim.run_with(&mut rng, cancel, |percent| {
        // receiver gone means the handle was dropped; the cancel flag is already set
        let _ = tx.send(SimEvent::Progress(percent));
    });

    match outcome {
        Ok(results) if !cancel.load(Ordering::SeqCst) => {
            *state.write() = RunState::Completed;
            let _ = tx.send(SimEvent::Completed(results));
        }
        Ok(_) | Err(SlotLabError::Cancelled) => {
            *state.write() = RunState::Cancelled;
        }
        Err(e) => {
            log::warn!("Simulation '{}' failed: {e}", sim.config().name());
            *state.write() = RunState::Failed;
        }
    }
}

/// Caller side of a submitted run
pub struct SimulationHandle {
    events: Receiver<SimEvent>,
    cancel: Arc<AtomicBool>,
    state: Arc<RwLock<RunState>>,
}

impl SimulationHandle {
    pub fn state(&self) -> RunState {
        *self.state.read()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Ask the worker to stop; it exits at its next cancellation check
    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Cancel and discard the run
    pub fn cancel(self) {
        self.request_cancel();
    }

    /// Filter applied to every delivered event
    fn admit(&self, event: SimEvent) -> Option<SimEvent> {
        match event {
            SimEvent::Completed(_) if self.is_cancelled() => None,
            other => Some(other),
        }
    }

    /// Next event if one is ready
    pub fn try_next(&self) -> Option<SimEvent> {
        match self.events.try_recv() {
            Ok(event) => self.admit(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block for the next event; `None` once the worker has finished
    pub fn next_event(&self) -> Option<SimEvent> {
        self.events.recv().ok().and_then(|event| self.admit(event))
    }

    /// Block until the run finishes, ignoring progress
    pub fn wait(self) -> SlotLabResult<SimResults> {
        self.wait_with(|_| {})
    }

    /// Block until the run finishes, forwarding progress to `on_progress`
    pub fn wait_with<F: FnMut(f64)>(self, mut on_progress: F) -> SlotLabResult<SimResults> {
        while let Ok(event) = self.events.recv() {
            match event {
                SimEvent::Progress(percent) => on_progress(percent),
                SimEvent::Completed(results) => {
                    if self.is_cancelled() {
                        return Err(SlotLabError::Cancelled);
                    }
                    return Ok(results);
                }
            }
        }

        match self.state() {
            RunState::Cancelled => Err(SlotLabError::Cancelled),
            _ if self.is_cancelled() => Err(SlotLabError::Cancelled),
            _ => Err(SlotLabError::WorkerPool(
                "simulation worker exited without a result".into(),
            )),
        }
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::SeqCst);
    }
}
