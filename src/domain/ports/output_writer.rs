//! OutputWriter port - persists one build's files

use std::path::Path;

use crate::domain::entities::{AssetFile, OutputFile};
use crate::error::KilnResult;

/// Writes output files and copies asset files into a destination directory
pub trait OutputWriter: Send + Sync {
    /// Persist `outputs` and `assets` below `destination`.
    ///
    /// Fails if the destination is not writable.
    fn write(
        &self,
        outputs: &[&OutputFile],
        assets: &[AssetFile],
        destination: &Path,
    ) -> KilnResult<()>;
}
