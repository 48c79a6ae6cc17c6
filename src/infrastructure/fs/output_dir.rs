//! Output directory cleanup

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{KilnError, KilnResult};

/// Empty the output directory, keeping the directory itself.
///
/// `output_path` resolves against `workspace_root`. A missing directory is not
/// an error. Refuses to touch the workspace root.
pub fn delete_output_dir(workspace_root: &Path, output_path: &Path) -> KilnResult<()> {
    let resolved = normalize(&workspace_root.join(output_path));
    if same_directory(&resolved, &normalize(workspace_root)) {
        return Err(KilnError::OutputIsWorkspaceRoot { path: resolved });
    }

    let entries = match fs::read_dir(&resolved) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(KilnError::DeleteOutput {
                path: resolved,
                source,
            })
        }
    };

    for entry in entries {
        let entry = entry.map_err(|source| KilnError::DeleteOutput {
            path: resolved.clone(),
            source,
        })?;
        let path = entry.path();
        let removed = match entry.file_type() {
            Ok(kind) if kind.is_dir() => fs::remove_dir_all(&path),
            _ => fs::remove_file(&path),
        };
        removed.map_err(|source| KilnError::DeleteOutput { path, source })?;
    }

    Ok(())
}

/// Compare through symlinks when both paths exist
fn same_directory(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Lexically drop `.` and resolve `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
