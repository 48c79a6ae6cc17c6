//! Build stream: emission, the rebuild loop and teardown

use std::sync::Arc;
use std::thread;

use crate::domain::entities::{BuildOutput, BuildResult, OutputFile};
use crate::domain::ports::{
    BuildEngine, BuildEvent, BuildEventSink, FileWatcher, OutputWriter, WorkerPool,
};
use crate::domain::value_objects::{ChangeBatch, WatchSet};
use crate::error::{KilnError, KilnResult, TeardownErrors};

use super::request::BuildRequest;
use super::use_case::{report_teardown_failures, run_engine};

/// Everything the stream needs besides the engine and its current result
pub(super) struct Collaborators {
    pub request: BuildRequest,
    pub writer: Arc<dyn OutputWriter>,
    pub workers: Arc<dyn WorkerPool>,
    pub events: Arc<dyn BuildEventSink>,
}

/// An armed watcher and the paths it is registered on
pub(super) struct Watching {
    pub watcher: Arc<dyn FileWatcher>,
    pub watch_set: WatchSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// The initial result has not been emitted yet
    Initial,
    /// Waiting for change batches
    Watching,
    Done,
}

/// Lazily produced sequence of build outputs.
///
/// Each call to `next` either returns the next completed build or blocks until
/// the watcher reports changes and the rebuild finishes. The sequence ends when
/// the watcher closes (for example through cancellation) or after the first
/// error. Dropping the stream early still releases the watcher, the engine's
/// incremental state and the worker pool.
pub struct BuildStream<E: BuildEngine> {
    engine: E,
    result: BuildResult<E::Context>,
    watching: Option<Watching>,
    collaborators: Collaborators,
    phase: Phase,
    torn_down: bool,
    /// Teardown failure to report after the last output
    pending_error: Option<KilnError>,
}

impl<E: BuildEngine> BuildStream<E> {
    pub(super) fn new(
        engine: E,
        result: BuildResult<E::Context>,
        watching: Option<Watching>,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            engine,
            result,
            watching,
            collaborators,
            phase: Phase::Initial,
            torn_down: false,
            pending_error: None,
        }
    }

    /// Whether the stream is in watch mode and still running
    pub fn is_watching(&self) -> bool {
        self.watching.is_some() && self.phase != Phase::Done
    }

    /// Paths currently tracked from build reports
    pub fn tracked_paths(&self) -> Vec<std::path::PathBuf> {
        self.watching
            .as_ref()
            .map(|watching| watching.watch_set.tracked().map(|p| p.to_path_buf()).collect())
            .unwrap_or_default()
    }

    fn emit_initial(&mut self) -> Option<KilnResult<BuildOutput>> {
        if self.watching.is_some() {
            self.phase = Phase::Watching;
            return match self.emit(false) {
                Ok(output) => Some(Ok(output)),
                Err(error) => self.finish(Some(error)),
            };
        }

        self.phase = Phase::Done;
        let emitted = self.emit(false);
        let failures = self.teardown();
        match emitted {
            Ok(output) => {
                self.pending_error = failures.into_result().err();
                Some(Ok(output))
            }
            Err(error) => {
                report_teardown_failures(self.collaborators.events.as_ref(), failures);
                Some(Err(error))
            }
        }
    }

    fn rebuild_once(&mut self) -> Option<KilnResult<BuildOutput>> {
        if self.collaborators.request.cancellation.is_cancelled() {
            return self.finish(None);
        }
        let next = match self.watching.as_ref() {
            Some(watching) => watching.watcher.next_batch(),
            None => return self.finish(None),
        };

        let changes = match next {
            None => return self.finish(None),
            Some(Err(error)) => return self.finish(Some(error)),
            Some(Ok(changes)) => changes,
        };

        if self.collaborators.request.cancellation.is_cancelled() {
            return self.finish(None);
        }

        match self.rebuild(changes) {
            Ok(output) => Some(Ok(output)),
            Err(error) => self.finish(Some(error)),
        }
    }

    fn rebuild(&mut self, changes: ChangeBatch) -> KilnResult<BuildOutput> {
        let request = &self.collaborators.request;
        let events = self.collaborators.events.as_ref();

        if request.verbose {
            events.on_event(BuildEvent::ChangesDetected {
                summary: changes.to_debug_string(),
            });
        }

        let state = self.result.create_rebuild_state(changes);
        self.result = run_engine(&mut self.engine, Some(state), request.progress, events)?;

        // Cancelled mid-build: the watcher is already closed, so only emit
        if !self.collaborators.request.cancellation.is_cancelled() {
            self.reconcile_watch_set()?;
        }
        self.emit(true)
    }

    /// Mirror the new build's watch report onto the watcher
    fn reconcile_watch_set(&mut self) -> KilnResult<()> {
        let Some(watching) = self.watching.as_mut() else {
            return Ok(());
        };

        let delta = watching
            .watch_set
            .reconcile(&self.result.watch_files, self.result.is_success());
        if delta.is_empty() {
            return Ok(());
        }

        if !delta.added.is_empty() {
            watching.watcher.add(&delta.added)?;
        }
        if !delta.removed.is_empty() {
            watching.watcher.remove(&delta.removed)?;
        }

        self.collaborators.events.on_event(BuildEvent::WatchPathsUpdated {
            added: delta.added.len(),
            removed: delta.removed.len(),
        });
        Ok(())
    }

    /// Write (or project) the current result
    fn emit(&self, rebuild: bool) -> KilnResult<BuildOutput> {
        let request = &self.collaborators.request;
        if !request.write_to_file_system {
            return Ok(self.result.output_with_files());
        }

        let outputs: Vec<&OutputFile> = match (&request.write_filter, rebuild) {
            (Some(filter), true) => self
                .result
                .output_files
                .iter()
                .filter(|file| filter.matches(file))
                .collect(),
            _ => self.result.output_files.iter().collect(),
        };

        let destination = request.resolved_output_path();
        self.collaborators
            .writer
            .write(&outputs, &self.result.asset_files, &destination)?;

        self.collaborators.events.on_event(BuildEvent::OutputWritten {
            files: outputs.len(),
            assets: self.result.asset_files.len(),
            destination,
        });

        Ok(self.result.output())
    }

    /// End the stream, tearing down and reporting the right error
    fn finish(&mut self, error: Option<KilnError>) -> Option<KilnResult<BuildOutput>> {
        self.phase = Phase::Done;
        let failures = self.teardown();

        match error {
            Some(error) => {
                report_teardown_failures(self.collaborators.events.as_ref(), failures);
                Some(Err(error))
            }
            None => failures.into_result().err().map(Err),
        }
    }

    /// Release watcher, incremental state and workers. Runs at most once.
    ///
    /// Watcher close and state disposal run concurrently and are both awaited,
    /// so one failing never skips the other.
    fn teardown(&mut self) -> TeardownErrors {
        let mut failures = TeardownErrors::new();
        if self.torn_down {
            return failures;
        }
        self.torn_down = true;

        let Some(watching) = self.watching.as_ref() else {
            // One-shot run: workers were released after the initial build
            if let Err(error) = self.result.dispose() {
                failures.push(error);
            }
            return failures;
        };

        let watcher = &watching.watcher;
        let result = &mut self.result;
        let (closed, disposed) = thread::scope(|scope| {
            let close = scope.spawn(|| watcher.close());
            let dispose = scope.spawn(|| result.dispose());
            (
                close.join().unwrap_or_else(|_| Err(panicked("watcher close"))),
                dispose.join().unwrap_or_else(|_| Err(panicked("state disposal"))),
            )
        });

        if let Err(error) = closed {
            failures.push(error);
        }
        if let Err(error) = disposed {
            failures.push(error);
        }

        self.collaborators.workers.shutdown();
        self.collaborators.events.on_event(BuildEvent::WatchStopped);
        failures
    }
}

impl<E: BuildEngine> Iterator for BuildStream<E> {
    type Item = KilnResult<BuildOutput>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.phase {
            Phase::Initial => self.emit_initial(),
            Phase::Watching => self.rebuild_once(),
            Phase::Done => self.pending_error.take().map(Err),
        }
    }
}

impl<E: BuildEngine> Drop for BuildStream<E> {
    fn drop(&mut self) {
        let failures = self.teardown();
        report_teardown_failures(self.collaborators.events.as_ref(), failures);
    }
}

fn panicked(step: &str) -> KilnError {
    KilnError::Engine(format!("{} panicked during teardown", step))
}
