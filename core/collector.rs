use crate::error::Result;
use crate::paths::{file_name_key, is_excluded};
use crate::provenance::{CollectionContext, Provenance};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

// Top-down, files before subdirectories, each group by name. Excluded
// directories are never entered.
pub(crate) fn walk_pruned<'a>(
    root: &Path,
    exclusions: &'a [PathBuf],
) -> impl Iterator<Item = walkdir::Result<DirEntry>> + 'a {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        .filter_entry(move |entry| {
            let excluded = is_excluded(entry.path(), exclusions);
            if excluded && entry.file_type().is_dir() {
                log::debug!("Pruning excluded directory: {}", entry.path().display());
            }
            !excluded
        })
}

// Regular files, plus symlinks that resolve to one.
pub(crate) fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Collects files under `root`.
///
/// With `check_extension` set, only files whose [`dotted_extension`] is in
/// `extensions` are taken; otherwise every file is. A file name seen twice
/// within this call keeps its first occurrence. Accepted files are recorded in
/// `ctx` under `tag`.
///
/// An unreadable `root` is an error. Unreadable directories below it are
/// skipped and recorded in `ctx`.
pub fn collect(
    root: &Path,
    extensions: &HashSet<String>,
    exclusions: &[PathBuf],
    tag: Provenance,
    ctx: &mut CollectionContext,
    check_extension: bool,
) -> Result<Vec<PathBuf>> {
    log::debug!(
        "Collecting [{}] under {} (check_extension: {})",
        tag,
        root.display(),
        check_extension
    );
    let mut seen_names: HashMap<String, PathBuf> = HashMap::new();
    let mut accepted = Vec::new();

    for entry_result in walk_pruned(root, exclusions) {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                log::error!("Cannot read collection root {}", root.display());
                return Err(e.into());
            }
            Err(e) => {
                let dir = e.path().unwrap_or(root).to_path_buf();
                ctx.record_skipped(&dir, &e.to_string());
                continue;
            }
        };

        if !is_regular_file(&entry) {
            continue;
        }
        let path = entry.path();
        if check_extension && !extensions.contains(&dotted_extension(path)) {
            log::trace!("Extension not selected: {}", path.display());
            continue;
        }

        let name = file_name_key(path);
        if let Some(first) = seen_names.get(&name) {
            log::debug!(
                "Dropping {} (name already collected from {})",
                path.display(),
                first.display()
            );
            continue;
        }
        seen_names.insert(name.clone(), path.to_path_buf());
        ctx.record(&name, path, tag);
        accepted.push(path.to_path_buf());
    }

    log::debug!("[{}] collected {} files", tag, accepted.len());
    Ok(accepted)
}
