//! `notify`-backed file watcher

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};

use crate::domain::ports::{FileWatcher, WatcherFactory, WatcherOptions};
use crate::domain::value_objects::{ChangeBatch, ChangeKind, IgnoredPaths};
use crate::error::{KilnError, KilnResult};

use super::debounce::Debounce;

/// How often a blocked reader re-checks for shutdown while idle
const IDLE_TICK: Duration = Duration::from_millis(50);

/// Poll interval used when polling without an explicit interval
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

enum Message {
    Event(notify::Result<Event>),
    Closed,
}

/// Registered paths and the OS watches backing them.
///
/// A path that does not exist yet is anchored on its nearest existing ancestor
/// (watched non-recursively) so that creating it is still noticed.
struct Registry {
    backend: Box<dyn Watcher + Send>,
    /// requested path -> path actually passed to the backend
    requested: BTreeMap<PathBuf, PathBuf>,
    /// backend path -> number of requested paths using it, and its watch mode
    anchors: BTreeMap<PathBuf, Anchor>,
}

struct Anchor {
    users: usize,
    mode: RecursiveMode,
}

impl Registry {
    fn add(&mut self, path: &Path) -> KilnResult<()> {
        if self.requested.contains_key(path) {
            return Ok(());
        }

        let (anchor, mode) = anchor_for(path);
        match self.anchors.get_mut(&anchor) {
            Some(existing) => {
                // A directory first anchored for a missing file may later be requested whole
                if mode == RecursiveMode::Recursive && existing.mode != RecursiveMode::Recursive {
                    self.backend.unwatch(&anchor)?;
                    self.backend.watch(&anchor, mode)?;
                    existing.mode = mode;
                }
                existing.users += 1;
            }
            None => {
                self.backend.watch(&anchor, mode)?;
                self.anchors.insert(anchor.clone(), Anchor { users: 1, mode });
            }
        }
        self.requested.insert(path.to_path_buf(), anchor);
        Ok(())
    }

    fn remove(&mut self, path: &Path) -> KilnResult<()> {
        let Some(anchor) = self.requested.remove(path) else {
            return Ok(());
        };

        if let Some(entry) = self.anchors.get_mut(&anchor) {
            entry.users -= 1;
            if entry.users == 0 {
                self.anchors.remove(&anchor);
                match self.backend.unwatch(&anchor) {
                    // Already gone from disk, nothing left to unwatch
                    Err(e) if matches!(e.kind, notify::ErrorKind::WatchNotFound) => {}
                    other => other?,
                }
            }
        }
        Ok(())
    }

    /// Whether an event for `path` concerns a registered path
    fn covers(&self, path: &Path) -> bool {
        self.requested
            .keys()
            .any(|requested| path == requested || path.starts_with(requested))
    }
}

fn anchor_for(path: &Path) -> (PathBuf, RecursiveMode) {
    if path.is_dir() {
        return (path.to_path_buf(), RecursiveMode::Recursive);
    }
    if path.exists() {
        return (path.to_path_buf(), RecursiveMode::NonRecursive);
    }

    let anchor = path
        .ancestors()
        .skip(1)
        .find(|ancestor| ancestor.is_dir())
        .unwrap_or_else(|| Path::new("."));
    (anchor.to_path_buf(), RecursiveMode::NonRecursive)
}

/// File watcher using `notify`
///
/// Raw events are filtered through the ignore rules and the registered paths,
/// then debounced into [`ChangeBatch`]es.
pub struct NotifyWatcher {
    registry: Mutex<Option<Registry>>,
    sender: Sender<Message>,
    receiver: Mutex<Receiver<Message>>,
    ignored: IgnoredPaths,
    closed: AtomicBool,
}

impl NotifyWatcher {
    pub fn new(options: &WatcherOptions) -> KilnResult<Self> {
        let ignored = IgnoredPaths::new(&options.ignored)?;
        let (sender, receiver) = channel();

        let events = sender.clone();
        let handler = move |res: notify::Result<Event>| {
            let _ = events.send(Message::Event(res));
        };

        let backend: Box<dyn Watcher + Send> = if options.polling {
            let interval = options.interval.unwrap_or(DEFAULT_POLL_INTERVAL);
            Box::new(PollWatcher::new(
                handler,
                // mtimes have one-second granularity; edits within a second need a content check
                Config::default()
                    .with_poll_interval(interval)
                    .with_compare_contents(true),
            )?)
        } else {
            Box::new(RecommendedWatcher::new(handler, Config::default())?)
        };

        Ok(Self {
            registry: Mutex::new(Some(Registry {
                backend,
                requested: BTreeMap::new(),
                anchors: BTreeMap::new(),
            })),
            sender,
            receiver: Mutex::new(receiver),
            ignored,
            closed: AtomicBool::new(false),
        })
    }

    /// Paths currently registered
    pub fn watched(&self) -> Vec<PathBuf> {
        self.lock_registry()
            .as_ref()
            .map(|registry| registry.requested.keys().cloned().collect())
            .unwrap_or_default()
    }

    #[cfg(test)]
    fn anchor_mode(&self, anchor: &Path) -> Option<RecursiveMode> {
        self.lock_registry()
            .as_ref()
            .and_then(|registry| registry.anchors.get(anchor).map(|entry| entry.mode))
    }

    fn lock_registry(&self) -> std::sync::MutexGuard<'_, Option<Registry>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_relevant(&self, path: &Path) -> bool {
        if self.ignored.is_ignored(path) {
            return false;
        }
        self.lock_registry()
            .as_ref()
            .is_some_and(|registry| registry.covers(path))
    }

    fn record(&self, event: Event, debounce: &mut Debounce) {
        let Some(kind) = change_kind(&event.kind) else {
            return;
        };
        for path in event.paths {
            if self.is_relevant(&path) {
                debounce.record(path, kind);
            }
        }
    }
}

/// Map a raw notify event to a change kind; access events are dropped
fn change_kind(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Access(_) => None,
        EventKind::Create(_) => Some(ChangeKind::Added),
        EventKind::Remove(_) => Some(ChangeKind::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Some(ChangeKind::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(ChangeKind::Added),
        EventKind::Modify(_) | EventKind::Any | EventKind::Other => Some(ChangeKind::Modified),
    }
}

impl FileWatcher for NotifyWatcher {
    fn add(&self, paths: &[PathBuf]) -> KilnResult<()> {
        let mut guard = self.lock_registry();
        let registry = guard.as_mut().ok_or(KilnError::WatchClosed)?;
        for path in paths {
            registry.add(path)?;
        }
        Ok(())
    }

    fn remove(&self, paths: &[PathBuf]) -> KilnResult<()> {
        let mut guard = self.lock_registry();
        let registry = guard.as_mut().ok_or(KilnError::WatchClosed)?;
        for path in paths {
            registry.remove(path)?;
        }
        Ok(())
    }

    fn close(&self) -> KilnResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        // Dropping the backend stops OS watches and the poll thread
        drop(self.lock_registry().take());
        let _ = self.sender.send(Message::Closed);
        Ok(())
    }

    fn next_batch(&self) -> Option<KilnResult<ChangeBatch>> {
        let receiver = self.receiver.lock().unwrap_or_else(PoisonError::into_inner);
        let mut debounce = Debounce::default();

        loop {
            if self.closed.load(Ordering::SeqCst) {
                return None;
            }
            if debounce.is_ready() {
                return Some(Ok(debounce.take()));
            }

            let wait = debounce.remaining().unwrap_or(IDLE_TICK);
            match receiver.recv_timeout(wait) {
                Ok(Message::Event(Ok(event))) => self.record(event, &mut debounce),
                Ok(Message::Event(Err(e))) => return Some(Err(e.into())),
                Ok(Message::Closed) | Err(RecvTimeoutError::Disconnected) => return None,
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    }
}

impl Drop for NotifyWatcher {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Factory producing [`NotifyWatcher`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct NotifyWatcherFactory;

impl NotifyWatcherFactory {
    pub fn new() -> Self {
        Self
    }
}

impl WatcherFactory for NotifyWatcherFactory {
    fn create(&self, options: &WatcherOptions) -> KilnResult<Arc<dyn FileWatcher>> {
        Ok(Arc::new(NotifyWatcher::new(options)?))
    }
}
