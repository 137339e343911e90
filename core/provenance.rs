use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Extension,
    IncludeAll,
    ExtraAbs,
    ExtraRel,
    ExtraSearch,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Extension => "extension",
            Provenance::IncludeAll => "include_all",
            Provenance::ExtraAbs => "extra_abs",
            Provenance::ExtraRel => "extra_rel",
            Provenance::ExtraSearch => "extra_search",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-run state shared by the collection strategies.
#[derive(Debug, Default, Clone)]
pub struct CollectionContext {
    provenance: IndexMap<PathBuf, Provenance>,
    trace: Vec<String>,
    missing: Vec<String>,
    skipped: Vec<PathBuf>,
}

impl CollectionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an accepted file. The first tag written for a path is kept.
    pub fn record(&mut self, label: &str, path: &Path, tag: Provenance) {
        if !self.provenance.contains_key(path) {
            self.provenance.insert(path.to_path_buf(), tag);
        }
        let line = format!("[{}] {} -> {}", tag, label, path.display());
        log::info!("{}", line);
        self.trace.push(line);
    }

    pub fn record_missing(&mut self, entry: &str) {
        let line = format!("[missing] {} not found", entry);
        log::warn!("{}", line);
        self.trace.push(line);
        self.missing.push(entry.to_string());
    }

    pub fn record_skipped(&mut self, dir: &Path, reason: &str) {
        log::warn!("Skipping unreadable directory {}: {}", dir.display(), reason);
        self.skipped.push(dir.to_path_buf());
    }

    pub fn provenance_of(&self, path: &Path) -> Option<Provenance> {
        self.provenance.get(path).copied()
    }

    pub fn provenance(&self) -> &IndexMap<PathBuf, Provenance> {
        &self.provenance
    }

    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tag_wins() {
        let mut ctx = CollectionContext::new();
        let path = Path::new("/proj/a.md");
        ctx.record("a.md", path, Provenance::Extension);
        ctx.record("a.md", path, Provenance::ExtraRel);
        assert_eq!(ctx.provenance_of(path), Some(Provenance::Extension));
        assert_eq!(ctx.provenance().len(), 1);
        assert_eq!(ctx.trace().len(), 2);
    }

    #[test]
    fn trace_lines_follow_the_documented_shape() {
        let mut ctx = CollectionContext::new();
        ctx.record("util.md", Path::new("/proj/x/util.md"), Provenance::IncludeAll);
        ctx.record_missing("ghost.yml");
        assert_eq!(
            ctx.trace(),
            &[
                "[include_all] util.md -> /proj/x/util.md".to_string(),
                "[missing] ghost.yml not found".to_string(),
            ]
        );
        assert_eq!(ctx.missing(), &["ghost.yml".to_string()]);
    }

    #[test]
    fn tags_serialize_in_snake_case() {
        let json = serde_json::to_string(&Provenance::ExtraSearch).unwrap();
        assert_eq!(json, "\"extra_search\"");
    }
}
