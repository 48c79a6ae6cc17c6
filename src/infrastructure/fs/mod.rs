//! File System Implementations
//!
//! Output persistence and output directory housekeeping.

mod output_dir;
mod writer;

pub use output_dir::delete_output_dir;
pub use writer::{atomic_write, FsOutputWriter};
