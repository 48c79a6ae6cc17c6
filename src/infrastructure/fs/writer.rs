//! Filesystem output writer

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::domain::entities::{AssetFile, OutputFile};
use crate::domain::ports::OutputWriter;
use crate::error::{KilnError, KilnResult};

/// Writes build outputs to local disk
///
/// Output files are written atomically; assets are copied from their source.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsOutputWriter;

impl FsOutputWriter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputWriter for FsOutputWriter {
    fn write(
        &self,
        outputs: &[&OutputFile],
        assets: &[AssetFile],
        destination: &Path,
    ) -> KilnResult<()> {
        fs::create_dir_all(destination).map_err(|source| KilnError::Write {
            path: destination.to_path_buf(),
            source,
        })?;

        for file in outputs {
            atomic_write(&destination.join(file.path()), file.contents())?;
        }

        for asset in assets {
            let target = destination.join(&asset.destination);
            ensure_parent(&target)?;
            fs::copy(&asset.source, &target).map_err(|source| KilnError::Write {
                path: target.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

/// Write content to a file atomically
///
/// Writes into a temp file next to the target, then renames it into place.
pub fn atomic_write(path: &Path, content: &[u8]) -> KilnResult<()> {
    let parent = ensure_parent(path)?;
    let to_write_error = |source| KilnError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = NamedTempFile::new_in(parent).map_err(to_write_error)?;
    temp.write_all(content).map_err(to_write_error)?;
    temp.persist(path)
        .map_err(|e| to_write_error(e.error))?;
    Ok(())
}

fn ensure_parent(path: &Path) -> KilnResult<&Path> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|source| KilnError::Write {
        path: parent.to_path_buf(),
        source,
    })?;
    Ok(parent)
}
