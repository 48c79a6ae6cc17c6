//! Build Action use case: initial build and watcher setup

use std::sync::Arc;
use std::time::Instant;

use crate::domain::entities::{BuildResult, RebuildState};
use crate::domain::ports::{
    BuildEngine, BuildEvent, BuildEventSink, NoopEventSink, NoopWorkerPool,
    OutputWriter, WatcherFactory, WatcherOptions, WorkerPool,
};
use crate::domain::value_objects::{WatchSet, DEFAULT_IGNORED_GLOBS};
use crate::error::{KilnError, KilnResult, TeardownErrors};
use crate::infrastructure::fs::{delete_output_dir, FsOutputWriter};
use crate::infrastructure::watcher::NotifyWatcherFactory;

use super::request::BuildRequest;
use super::stream::{BuildStream, Collaborators, Watching};

/// Build Action Use Case
///
/// Owns the collaborators for one run. [`BuildAction::run`] performs the
/// initial build and arms the watcher immediately; everything after that
/// happens as the caller pulls from the returned stream.
pub struct BuildAction {
    request: BuildRequest,
    watcher_factory: Box<dyn WatcherFactory>,
    writer: Arc<dyn OutputWriter>,
    workers: Arc<dyn WorkerPool>,
    events: Arc<dyn BuildEventSink>,
}

impl BuildAction {
    /// Create a build action with filesystem output, `notify` watching and no worker pool
    pub fn new(request: BuildRequest) -> Self {
        Self {
            request,
            watcher_factory: Box::new(NotifyWatcherFactory::new()),
            writer: Arc::new(FsOutputWriter::new()),
            workers: Arc::new(NoopWorkerPool),
            events: Arc::new(NoopEventSink),
        }
    }

    pub fn with_watcher_factory(mut self, factory: impl WatcherFactory + 'static) -> Self {
        self.watcher_factory = Box::new(factory);
        self
    }

    pub fn with_writer(mut self, writer: Arc<dyn OutputWriter>) -> Self {
        self.writer = writer;
        self
    }

    pub fn with_worker_pool(mut self, workers: Arc<dyn WorkerPool>) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_event_sink(mut self, events: Arc<dyn BuildEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn request(&self) -> &BuildRequest {
        &self.request
    }

    /// Run the initial build and, in watch mode, arm the watcher.
    ///
    /// Errors here mean nothing was emitted; any resources acquired so far have
    /// already been released.
    pub fn run<E: BuildEngine>(self, mut engine: E) -> KilnResult<BuildStream<E>> {
        let request = &self.request;

        if request.delete_output_path && request.write_to_file_system {
            delete_output_dir(&request.workspace_root, &request.output_path)?;
        }

        let initial = run_engine(&mut engine, None, request.progress, self.events.as_ref());
        if !request.watch || initial.is_err() {
            // One-shot builds never need the workers again, and a crash ends the run
            self.workers.shutdown();
        }
        let mut result = initial?;

        let watching = if request.watch {
            match self.start_watching(&result) {
                Ok(watching) => Some(watching),
                Err(error) => {
                    let mut failures = TeardownErrors::new();
                    if let Err(dispose_error) = result.dispose() {
                        failures.push(dispose_error);
                    }
                    self.workers.shutdown();
                    report_teardown_failures(self.events.as_ref(), failures);
                    return Err(error);
                }
            }
        } else {
            None
        };

        let collaborators = Collaborators {
            request: self.request,
            writer: self.writer,
            workers: self.workers,
            events: self.events,
        };
        Ok(BuildStream::new(engine, result, watching, collaborators))
    }

    fn start_watching<C>(&self, initial: &BuildResult<C>) -> KilnResult<Watching> {
        let request = &self.request;

        let options = WatcherOptions {
            polling: request.poll.is_some(),
            interval: request.poll,
            ignored: self.ignored_entries(),
        };
        let watcher = self.watcher_factory.create(&options)?;

        let on_cancel = Arc::clone(&watcher);
        request.cancellation.on_cancel(move || {
            let _ = on_cancel.close();
        });

        let mut watch_set = WatchSet::for_workspace(
            &request.workspace_root,
            request.watch_root.then_some(request.project_root.as_path()),
        );
        let paths = watch_set.seed(&initial.watch_files);

        if let Err(error) = watcher.add(&paths) {
            if let Err(close_error) = watcher.close() {
                report_teardown_failures(self.events.as_ref(), single(close_error));
            }
            return Err(error);
        }

        self.events.on_event(BuildEvent::WatchStarted {
            watching: watch_set.len(),
        });

        Ok(Watching {
            watcher,
            watch_set,
        })
    }

    /// Output and cache directories never trigger rebuilds, nor do
    /// dependency and hidden directories.
    fn ignored_entries(&self) -> Vec<String> {
        let mut ignored = vec![
            self.request.resolved_output_path().display().to_string(),
            self.request.resolved_cache_path().display().to_string(),
        ];
        ignored.extend(DEFAULT_IGNORED_GLOBS.iter().map(|glob| glob.to_string()));
        ignored
    }
}

/// Invoke the engine, reporting progress when requested
pub(super) fn run_engine<E: BuildEngine>(
    engine: &mut E,
    prior: Option<RebuildState<E::Context>>,
    progress: bool,
    events: &dyn BuildEventSink,
) -> KilnResult<BuildResult<E::Context>> {
    let rebuild = prior.is_some();
    if progress {
        events.on_event(BuildEvent::BuildStarted { rebuild });
    }

    let started = Instant::now();
    let result = engine.build(prior)?;

    if progress {
        events.on_event(BuildEvent::BuildCompleted {
            rebuild,
            success: result.is_success(),
            errors: result.errors.len(),
            warnings: result.warnings.len(),
            duration_ms: started.elapsed().as_millis() as u64,
        });
    }

    Ok(result)
}

pub(super) fn report_teardown_failures(events: &dyn BuildEventSink, failures: TeardownErrors) {
    for failure in failures {
        events.on_event(BuildEvent::TeardownFailed {
            message: failure.to_string(),
        });
    }
}

fn single(error: KilnError) -> TeardownErrors {
    let mut errors = TeardownErrors::new();
    errors.push(error);
    errors
}
