//! Filesystem helpers shared by the commands.

use crate::error::CliError;
use anyhow::Context;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Write `bytes` to `path` via a temporary file in the same directory.
///
/// The destination is only touched once the whole payload is on disk.
/// Without `force`, an existing destination is an error.
pub fn write_atomic(path: &Path, bytes: &[u8], force: bool) -> anyhow::Result<()> {
    if !force && path.exists() {
        return Err(CliError::OutputExists(path.to_path_buf()).into());
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)
        .with_context(|| format!("Failed to create directory {}", parent.display()))?;

    let mut temp = tempfile::NamedTempFile::new_in(&parent)
        .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
    temp.write_all(bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    temp.as_file().sync_all()?;

    let persisted = if force {
        temp.persist(path)
    } else {
        temp.persist_noclobber(path)
    };
    persisted
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to persist {}", path.display()))?;

    Ok(())
}

/// Resolve an archive entry path under `root`.
///
/// Only plain components are accepted; absolute paths, drive prefixes and
/// `..` are rejected.
pub fn safe_join(root: &Path, entry_path: &str) -> Result<PathBuf, CliError> {
    let relative = Path::new(entry_path);
    let mut resolved = root.to_path_buf();
    let mut depth = 0usize;

    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(CliError::UnsafeEntryPath(entry_path.to_string()));
            }
        }
    }

    if depth == 0 {
        return Err(CliError::UnsafeEntryPath(entry_path.to_string()));
    }
    Ok(resolved)
}

/// Check that `targets` under `root` can all be written as files.
///
/// Rejects duplicate destinations, a destination that is also a directory of
/// another one, a destination that is an existing directory, and any parent
/// below `root` (or `root` itself) that exists as a non-directory.
pub fn check_targets(root: &Path, targets: &[PathBuf]) -> Result<(), CliError> {
    let mut seen = HashSet::with_capacity(targets.len());
    for target in targets {
        if !seen.insert(target.as_path()) || target.is_dir() {
            return Err(CliError::PathConflict(target.clone()));
        }
    }

    for target in targets {
        for ancestor in target.ancestors().skip(1) {
            if seen.contains(ancestor) {
                return Err(CliError::PathConflict(ancestor.to_path_buf()));
            }
            if std::fs::metadata(ancestor).is_ok_and(|meta| !meta.is_dir()) {
                return Err(CliError::PathConflict(ancestor.to_path_buf()));
            }
            if ancestor == root {
                break;
            }
        }
    }
    Ok(())
}

/// A file to be stored in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Path inside the archive, `/`-separated
    pub archive_path: String,
    /// Location on disk
    pub source: PathBuf,
}

/// Collect the files named by `inputs`.
///
/// Files are stored under their file name; directories are walked
/// recursively and their files stored relative to the directory. A file that
/// is the same as `exclude` is skipped. The result is sorted by archive path.
pub fn collect_inputs(
    inputs: &[PathBuf],
    exclude: Option<&Path>,
) -> anyhow::Result<Vec<InputFile>> {
    let excluded = exclude.and_then(|path| path.canonicalize().ok());
    let is_excluded = |path: &Path| {
        excluded.as_deref().is_some_and(|excluded| {
            path.file_name() == excluded.file_name()
                && path.canonicalize().is_ok_and(|resolved| resolved == excluded)
        })
    };
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("Failed to walk {}", input.display()))?;
                if !entry.file_type().is_file() || is_excluded(entry.path()) {
                    continue;
                }
                let relative = entry
                    .path()
                    .strip_prefix(input)
                    .with_context(|| format!("{} is outside {}", entry.path().display(), input.display()))?;
                files.push(InputFile {
                    archive_path: archive_path(relative)?,
                    source: entry.path().to_path_buf(),
                });
            }
        } else if input.is_file() {
            if is_excluded(input) {
                tracing::warn!(path = %input.display(), "skipping the output archive as an input");
                continue;
            }
            let name = input
                .file_name()
                .ok_or_else(|| CliError::InputNotFound(input.clone()))?;
            files.push(InputFile {
                archive_path: archive_path(Path::new(name))?,
                source: input.clone(),
            });
        } else {
            return Err(CliError::InputNotFound(input.clone()).into());
        }
    }

    files.sort_by(|a, b| a.archive_path.cmp(&b.archive_path));
    tracing::debug!(files = files.len(), "collected input files");
    Ok(files)
}

fn archive_path(relative: &Path) -> Result<String, CliError> {
    let parts = relative
        .components()
        .map(|component| {
            component
                .as_os_str()
                .to_str()
                .ok_or_else(|| CliError::NonUtf8Path(relative.to_path_buf()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join("/"))
}
