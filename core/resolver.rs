use crate::collector::{is_regular_file, walk_pruned};
use crate::paths::{is_excluded, normalize, resolve_against};
use crate::provenance::{CollectionContext, Provenance};
use std::path::{Path, PathBuf};

/// Resolves each entry as an absolute path, then relative to `base_dir`, then
/// by file name search under `base_dir`. Absolute entries are never searched
/// for; unresolved entries are recorded as missing.
pub fn resolve(
    entries: &[String],
    base_dir: &Path,
    exclusions: &[PathBuf],
    ctx: &mut CollectionContext,
) -> Vec<PathBuf> {
    let mut resolved = Vec::new();
    for entry in entries {
        match resolve_one(entry, base_dir, exclusions, ctx) {
            Some(path) => resolved.push(path),
            None => ctx.record_missing(entry),
        }
    }
    resolved
}

fn resolve_one(
    entry: &str,
    base_dir: &Path,
    exclusions: &[PathBuf],
    ctx: &mut CollectionContext,
) -> Option<PathBuf> {
    let as_path = Path::new(entry);

    if as_path.is_absolute() {
        let absolute = normalize(as_path);
        if absolute.is_file() && !is_excluded(&absolute, exclusions) {
            let label = absolute
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| entry.to_string());
            ctx.record(&label, &absolute, Provenance::ExtraAbs);
            return Some(absolute);
        }
        log::debug!(
            "Absolute extra file '{}' is missing or excluded; not searching",
            entry
        );
        return None;
    }

    let relative = resolve_against(as_path, base_dir);
    if relative.is_file() && !is_excluded(&relative, exclusions) {
        ctx.record(entry, &relative, Provenance::ExtraRel);
        return Some(relative);
    }

    let found = search_by_name(entry, base_dir, exclusions, ctx)?;
    ctx.record(entry, &found, Provenance::ExtraSearch);
    Some(found)
}

fn search_by_name(
    name: &str,
    base_dir: &Path,
    exclusions: &[PathBuf],
    ctx: &mut CollectionContext,
) -> Option<PathBuf> {
    log::trace!("Searching for '{}' under {}", name, base_dir.display());
    for entry_result in walk_pruned(base_dir, exclusions) {
        match entry_result {
            Ok(entry) => {
                if entry.file_name() == name && is_regular_file(&entry) {
                    return Some(entry.into_path());
                }
            }
            Err(e) => {
                let dir = e.path().unwrap_or(base_dir).to_path_buf();
                ctx.record_skipped(&dir, &e.to_string());
            }
        }
    }
    None
}
