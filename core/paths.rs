//! Lexical path handling shared by every collection strategy.
//!
//! Nothing here touches the filesystem apart from [`absolutize`] reading the
//! process working directory for relative inputs.

use std::env;
use std::path::{Component, Path, PathBuf};

/// Lexically normalizes `path`: drops `.` segments, folds `..` into its parent
/// and rebuilds the path with the platform separator. A `..` that would climb
/// above the root is discarded.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let last = normalized.components().next_back();
                if matches!(last, Some(Component::Normal(_))) {
                    normalized.pop();
                } else if matches!(last, None | Some(Component::ParentDir)) {
                    // Relative path that already starts with `..`, keep climbing.
                    normalized.push("..");
                }
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

pub fn resolve_against(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }
    match env::current_dir() {
        Ok(cwd) => normalize(&cwd.join(path)),
        Err(e) => {
            log::debug!(
                "Working directory unavailable, normalizing '{}' as-is: {}",
                path.display(),
                e
            );
            normalize(path)
        }
    }
}

pub fn normalize_paths<S: AsRef<Path>>(paths: &[S], base: &Path) -> Vec<PathBuf> {
    paths
        .iter()
        .map(|p| resolve_against(p.as_ref(), base))
        .collect()
}

/// True when the absolute form of `path` starts with any of `exclusions`.
/// Plain string prefix, so `/a/b` also covers `/a/bc`.
pub fn is_excluded(path: &Path, exclusions: &[PathBuf]) -> bool {
    if exclusions.is_empty() {
        return false;
    }
    let absolute = absolutize(path);
    let candidate = absolute.to_string_lossy();
    exclusions
        .iter()
        .any(|prefix| candidate.starts_with(prefix.to_string_lossy().as_ref()))
}

pub(crate) fn file_name_key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
