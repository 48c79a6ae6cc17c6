//! Stylesheet worker pool
//!
//! Stylesheets are compiled on a small pool of threads. Workers start on the
//! first job and stay up until [`WorkerPool::shutdown`]; a later job starts a
//! fresh set.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::domain::ports::WorkerPool;

/// A stylesheet that could not be compiled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StylesheetError {
    #[error("line {line}: unexpected '}}'")]
    UnexpectedClose { line: usize },

    #[error("line {line}: unclosed '{{'")]
    Unclosed { line: usize },

    #[error("line {line}: unterminated comment")]
    UnterminatedComment { line: usize },

    /// The pool could not run the job
    #[error("stylesheet worker unavailable")]
    WorkerUnavailable,
}

struct Job {
    source: String,
    reply: Sender<Result<String, StylesheetError>>,
}

struct Workers {
    jobs: Sender<Job>,
    handles: Vec<JoinHandle<()>>,
}

/// Lazily started pool of stylesheet compilers
pub struct StylesheetWorkerPool {
    size: usize,
    workers: Mutex<Option<Workers>>,
    starts: AtomicUsize,
}

impl StylesheetWorkerPool {
    pub fn new(size: usize) -> Self {
        Self {
            size: size.max(1),
            workers: Mutex::new(None),
            starts: AtomicUsize::new(0),
        }
    }

    /// Pool sized to the machine, capped at four threads
    pub fn with_default_size() -> Self {
        let cores = thread::available_parallelism().map_or(1, |n| n.get());
        Self::new(cores.min(4))
    }

    /// Compile one stylesheet on a worker thread
    pub fn compile(&self, source: &str) -> Result<String, StylesheetError> {
        let (reply, result) = channel();
        {
            let mut guard = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
            let workers = guard.get_or_insert_with(|| self.spawn());
            workers
                .jobs
                .send(Job {
                    source: source.to_string(),
                    reply,
                })
                .map_err(|_| StylesheetError::WorkerUnavailable)?;
        }
        result
            .recv()
            .map_err(|_| StylesheetError::WorkerUnavailable)?
    }

    /// Whether worker threads are currently running
    pub fn is_running(&self) -> bool {
        self.workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// How many times the pool has been started
    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    fn spawn(&self) -> Workers {
        self.starts.fetch_add(1, Ordering::SeqCst);
        let (jobs, queue) = channel::<Job>();
        let queue = Arc::new(Mutex::new(queue));

        let handles = (0..self.size)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || work(&queue))
            })
            .collect();

        Workers { jobs, handles }
    }
}

impl Default for StylesheetWorkerPool {
    fn default() -> Self {
        Self::with_default_size()
    }
}

impl WorkerPool for StylesheetWorkerPool {
    fn shutdown(&self) {
        let workers = self
            .workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(Workers { jobs, handles }) = workers else {
            return;
        };

        // Closing the queue ends each worker's receive loop
        drop(jobs);
        for handle in handles {
            let _ = handle.join();
        }
    }
}

impl Drop for StylesheetWorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn work(queue: &Mutex<Receiver<Job>>) {
    loop {
        let job = {
            let queue = queue.lock().unwrap_or_else(PoisonError::into_inner);
            queue.recv()
        };
        let Ok(job) = job else {
            return;
        };
        let _ = job.reply.send(compile_stylesheet(&job.source));
    }
}

/// Minify a stylesheet: drop comments, collapse whitespace, check braces
pub fn compile_stylesheet(source: &str) -> Result<String, StylesheetError> {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut line = 1;
    let mut open: Vec<usize> = Vec::new();
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let start = line;
                let mut closed = false;
                while let Some(c) = chars.next() {
                    if c == '\n' {
                        line += 1;
                    } else if c == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(StylesheetError::UnterminatedComment { line: start });
                }
                pending_space = true;
            }
            c if c.is_whitespace() => {
                if c == '\n' {
                    line += 1;
                }
                pending_space = true;
            }
            '{' | '}' | ';' | ':' | ',' | '>' => {
                if c == '{' {
                    open.push(line);
                } else if c == '}' && open.pop().is_none() {
                    return Err(StylesheetError::UnexpectedClose { line });
                }
                // Separators never need surrounding whitespace; trailing ';' before '}' neither
                if c == '}' && out.ends_with(';') {
                    out.pop();
                }
                // Except a selector's ':', where `div :hover` differs from `div:hover`
                if c == ':'
                    && open.is_empty()
                    && pending_space
                    && !out.is_empty()
                    && !out.ends_with(is_separator)
                {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            }
            c => {
                if pending_space && !out.is_empty() && !out.ends_with(is_separator) {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            }
        }
    }

    if let Some(line) = open.pop() {
        return Err(StylesheetError::Unclosed { line });
    }
    Ok(out)
}

fn is_separator(c: char) -> bool {
    matches!(c, '{' | '}' | ';' | ':' | ',' | '>')
}
