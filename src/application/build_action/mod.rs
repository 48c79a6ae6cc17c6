//! Build Action Use Case
//!
//! Drives a build engine through an initial build and, in watch mode, a
//! rebuild loop fed by a file watcher. Results are handed to the caller as a
//! pull-based [`BuildStream`].
//!
//! ## Lifecycle
//!
//! 1. Empty the output directory (when requested and writing)
//! 2. Initial build; one-shot runs release the worker pool right after it
//! 3. Arm the watcher (watch mode): ignore rules, cancellation, seeded watch set
//! 4. Emit the first output, only after the watcher is armed
//! 5. For each change batch: rebuild, reconcile the watch set, emit
//!    (a build cancelled mid-flight is still emitted, without reconciling)
//! 6. Teardown exactly once: close watcher and dispose state concurrently,
//!    then release the worker pool
//!
//! ## Usage
//!
//! ```ignore
//! let request = BuildRequest::new(workspace, "dist").with_watch(true);
//! let stream = BuildAction::new(request).run(from_fn(|prior| build(prior)))?;
//! for output in stream {
//!     let output = output?;
//!     // ...
//! }
//! ```

mod cancel;
mod request;
mod stream;
mod use_case;


pub use cancel::CancellationToken;
pub use request::{BuildRequest, WriteFilter};
pub use stream::BuildStream;
pub use use_case::BuildAction;
