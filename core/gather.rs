use crate::collector::collect;
use crate::config::Config;
use crate::error::Result;
use crate::paths::file_name_key;
use crate::provenance::{CollectionContext, Provenance};
use crate::resolver::resolve;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Collection {
    pub base_dir: PathBuf,
    // Deduplicated files, in strategy order.
    pub files: Vec<PathBuf>,
    pub context: CollectionContext,
}

impl Collection {
    pub fn provenance_of(&self, path: &Path) -> Option<Provenance> {
        self.context.provenance_of(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Path, Option<Provenance>)> + '_ {
        self.files
            .iter()
            .map(|p| (p.as_path(), self.context.provenance_of(p)))
    }
}

/// Runs the three collection strategies over `config` and merges them.
///
/// Strategy order is fixed: extension match over `start_path`, then each
/// `include_all_from` directory, then `extra_files`. When two collected files
/// share a file name, the one from the earlier strategy is kept.
pub fn gather_files(config: &Config) -> Result<Collection> {
    let base_dir = config.start_path.clone();
    let exclusions = config.exclusion_prefixes();
    let extensions = config.normalized_extensions();
    let mut ctx = CollectionContext::new();
    let mut all_files: Vec<PathBuf> = Vec::new();

    log::debug!(
        "Gathering from {} ({} exclusions, extensions: {:?})",
        base_dir.display(),
        exclusions.len(),
        extensions
    );

    if !extensions.is_empty() {
        all_files.extend(collect(
            &base_dir,
            &extensions,
            &exclusions,
            Provenance::Extension,
            &mut ctx,
            true,
        )?);
    } else {
        log::debug!("No extensions configured, skipping extension scan.");
    }

    let no_extensions = HashSet::new();
    for dir in config.include_all_dirs() {
        if !dir.is_dir() {
            log::warn!(
                "include_all_from entry is not a directory, skipping: {}",
                dir.display()
            );
            continue;
        }
        all_files.extend(collect(
            &dir,
            &no_extensions,
            &exclusions,
            Provenance::IncludeAll,
            &mut ctx,
            false,
        )?);
    }

    all_files.extend(resolve(
        &config.extra_files,
        &base_dir,
        &exclusions,
        &mut ctx,
    ));

    let total = all_files.len();
    let files = dedupe_by_file_name(all_files);
    log::debug!(
        "Deduplicated {} candidates down to {} files",
        total,
        files.len()
    );

    Ok(Collection {
        base_dir,
        files,
        context: ctx,
    })
}

pub fn dedupe_by_file_name(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|path| {
            let keep = seen.insert(file_name_key(path));
            if !keep {
                log::debug!("Duplicate file name dropped: {}", path.display());
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, rel).unwrap();
        path
    }

    fn config_for(root: &Path) -> Config {
        Config::with_start_path(root)
    }

    #[test]
    fn excluded_directory_drops_same_named_file() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let kept = touch(root, "a/readme.md");
        touch(root, "b/readme.md");

        let mut config = config_for(root);
        config.extensions = vec![".md".into()];
        config.exclude_dirs = vec!["b".into()];

        let collection = gather_files(&config).unwrap();
        assert_eq!(collection.files, vec![kept.clone()]);
        assert_eq!(collection.provenance_of(&kept), Some(Provenance::Extension));
    }

    #[test]
    fn extension_match_beats_include_all() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let x = touch(root, "x/util.md");
        touch(root, "y/util.md");
        let y_only = touch(root, "y/notes.txt");

        let mut config = config_for(root);
        config.extensions = vec![".md".into()];
        config.include_all_from = vec![root.join("y").to_string_lossy().into_owned()];

        let collection = gather_files(&config).unwrap();
        assert_eq!(collection.files, vec![x.clone(), y_only.clone()]);
        assert_eq!(collection.provenance_of(&x), Some(Provenance::Extension));
        assert_eq!(
            collection.provenance_of(&y_only),
            Some(Provenance::IncludeAll)
        );
    }

    #[test]
    fn include_all_beats_extra_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let included = touch(root, "conf/app.yml");
        touch(root, "other/app.yml");

        let mut config = config_for(root);
        config.include_all_from = vec!["conf".into()];
        config.extra_files = vec!["other/app.yml".into()];

        let collection = gather_files(&config).unwrap();
        assert_eq!(collection.files, vec![included.clone()]);
        assert_eq!(
            collection.provenance_of(&included),
            Some(Provenance::IncludeAll)
        );
    }

    #[test]
    fn extra_file_found_by_search() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let deep = touch(root, "sub/config.yml");

        let mut config = config_for(root);
        config.extra_files = vec!["config.yml".into()];

        let collection = gather_files(&config).unwrap();
        assert_eq!(collection.files, vec![deep.clone()]);
        assert_eq!(
            collection.provenance_of(&deep),
            Some(Provenance::ExtraSearch)
        );
    }

    #[test]
    fn every_final_file_has_the_tag_of_its_strategy() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let java = touch(root, "src/Main.java");
        let doc = touch(root, "docs/guide.txt");
        let pom = touch(root, "pom.xml");
        touch(root, "target/Main.java");

        let mut config = config_for(root);
        config.extensions = vec!["java".into()];
        config.exclude_dirs = vec!["target".into()];
        config.include_all_from = vec!["docs".into(), "missing-dir".into()];
        // Same file again via the extra list keeps its first tag.
        config.extra_files = vec!["pom.xml".into(), "src/Main.java".into()];

        let collection = gather_files(&config).unwrap();
        let entries: Vec<_> = collection
            .entries()
            .map(|(p, tag)| (p.to_path_buf(), tag))
            .collect();
        assert_eq!(
            entries,
            vec![
                (java, Some(Provenance::Extension)),
                (doc, Some(Provenance::IncludeAll)),
                (pom, Some(Provenance::ExtraRel)),
            ]
        );
        for (path, _) in &entries {
            assert!(!path.starts_with(root.join("target")));
        }
    }

    #[test]
    fn excluded_include_all_directory_contributes_nothing() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "build/out.class");
        touch(root, "build/gen/Stub.java");

        let mut config = config_for(root);
        config.include_all_from = vec!["build".into()];
        config.exclude_dirs = vec!["build".into()];

        let collection = gather_files(&config).unwrap();
        assert!(collection.files.is_empty());
        assert!(collection.context.provenance().is_empty());
    }

    #[test]
    fn empty_configuration_collects_nothing() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.md");
        let collection = gather_files(&config_for(temp.path())).unwrap();
        assert!(collection.files.is_empty());
        assert!(collection.context.trace().is_empty());
    }

    #[test]
    fn dedupe_keeps_first_name() {
        let files = vec![
            PathBuf::from("/x/util.md"),
            PathBuf::from("/y/util.md"),
            PathBuf::from("/y/other.md"),
        ];
        assert_eq!(
            dedupe_by_file_name(files),
            vec![PathBuf::from("/x/util.md"), PathBuf::from("/y/other.md")]
        );
    }
}
