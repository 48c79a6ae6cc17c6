//! WorkerPool port - lifecycle hook for background compilation workers
//!
//! Engines may lazily start worker threads (stylesheet compilation). The
//! orchestrator calls `shutdown` once per run when no further builds will
//! happen: right after the initial build in one-shot mode, or after the watch
//! loop ends.

/// Releases idle background workers
pub trait WorkerPool: Send + Sync {
    /// Stop idle workers. Must be idempotent.
    fn shutdown(&self);
}

/// Pool hook for engines without background workers
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopWorkerPool;

impl WorkerPool for NoopWorkerPool {
    fn shutdown(&self) {}
}
