use crate::collector::dotted_extension;
use crate::config::RemoveImports;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

const FENCE: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadErrorKind {
    NotFound,
    PermissionDenied,
    // Content is not valid UTF-8.
    Encoding,
    Other(String),
}

impl fmt::Display for ReadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadErrorKind::NotFound => f.write_str("File not found"),
            ReadErrorKind::PermissionDenied => f.write_str("Permission denied"),
            ReadErrorKind::Encoding => f.write_str("Encoding problem"),
            ReadErrorKind::Other(msg) => f.write_str(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Content(String),
    Failed(ReadErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock {
    pub rel_path: String,
    pub text: String,
    pub error: Option<ReadErrorKind>,
}

pub fn read_source(path: &Path) -> ReadOutcome {
    match fs::read(path) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(content) => ReadOutcome::Content(content),
            Err(_) => ReadOutcome::Failed(ReadErrorKind::Encoding),
        },
        Err(e) => ReadOutcome::Failed(match e.kind() {
            ErrorKind::NotFound => ReadErrorKind::NotFound,
            ErrorKind::PermissionDenied => ReadErrorKind::PermissionDenied,
            _ => ReadErrorKind::Other(e.to_string()),
        }),
    }
}

pub fn language_tag(path: &Path) -> Option<&'static str> {
    match dotted_extension(path).as_str() {
        ".java" => Some("java"),
        ".md" => Some("markdown"),
        ".yaml" | ".yml" => Some("yaml"),
        ".xml" => Some("xml"),
        _ => None,
    }
}

/// Path shown in a block header: relative to `base_dir` when possible, always
/// with forward slashes.
pub fn display_path(path: &Path, base_dir: &Path) -> String {
    pathdiff::diff_paths(path, base_dir)
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .replace('\\', "/")
}

pub fn filter_imports(content: &str, mode: RemoveImports) -> String {
    let kept: Vec<&str> = content
        .lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            match mode {
                RemoveImports::None => true,
                RemoveImports::All => !trimmed.starts_with("import "),
                RemoveImports::NonStatic => {
                    !(trimmed.starts_with("import ") && !trimmed.starts_with("import static"))
                }
            }
        })
        .collect();
    kept.join("\n").trim_end().to_string()
}

pub fn render_block(path: &Path, base_dir: &Path, remove_imports: RemoveImports) -> FileBlock {
    let rel_path = display_path(path, base_dir);
    let header = format!("--- File: {} ---", rel_path);

    match read_source(path) {
        ReadOutcome::Content(content) => {
            let fence = match language_tag(path) {
                Some(lang) => format!("{}{}", FENCE, lang),
                None => FENCE.to_string(),
            };
            let data = filter_imports(&content, remove_imports);
            FileBlock {
                text: [header.as_str(), fence.as_str(), data.as_str(), FENCE].join("\n"),
                rel_path,
                error: None,
            }
        }
        ReadOutcome::Failed(kind) => {
            log::warn!("Could not read {}: {}", path.display(), kind);
            FileBlock {
                text: format!(
                    "{}\n{}text\n// Error: {} - {}\n{}",
                    header, FENCE, kind, rel_path, FENCE
                ),
                rel_path,
                error: Some(kind),
            }
        }
    }
}

/// Reads every file in order and renders its block. Read failures become
/// placeholder blocks; they never stop the run.
pub fn materialize(
    paths: &[impl AsRef<Path>],
    base_dir: &Path,
    remove_imports: RemoveImports,
) -> Vec<FileBlock> {
    log::debug!(
        "Materializing {} files (remove_imports: {})",
        paths.len(),
        remove_imports
    );
    paths
        .iter()
        .map(|p| render_block(p.as_ref(), base_dir, remove_imports))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const JAVA: &str = "package demo;\n\nimport java.util.List;\n  import static java.lang.Math.max;\nimport static org.junit.Assert.*;\n\nclass A {}\n\n\n";

    #[test]
    fn language_tags_follow_extension() {
        assert_eq!(language_tag(Path::new("A.JAVA")), Some("java"));
        assert_eq!(language_tag(Path::new("x/README.md")), Some("markdown"));
        assert_eq!(language_tag(Path::new("a.yml")), Some("yaml"));
        assert_eq!(language_tag(Path::new("a.yaml")), Some("yaml"));
        assert_eq!(language_tag(Path::new("pom.xml")), Some("xml"));
        assert_eq!(language_tag(Path::new("main.rs")), None);
        assert_eq!(language_tag(Path::new("Makefile")), None);
    }

    #[test]
    fn import_filter_modes() {
        assert_eq!(
            filter_imports(JAVA, RemoveImports::None),
            "package demo;\n\nimport java.util.List;\n  import static java.lang.Math.max;\nimport static org.junit.Assert.*;\n\nclass A {}"
        );
        assert_eq!(
            filter_imports(JAVA, RemoveImports::All),
            "package demo;\n\n\nclass A {}"
        );
        assert_eq!(
            filter_imports(JAVA, RemoveImports::NonStatic),
            "package demo;\n\n  import static java.lang.Math.max;\nimport static org.junit.Assert.*;\n\nclass A {}"
        );
    }

    #[test]
    fn block_has_header_fence_and_content() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        let file = base.join("src").join("A.java");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, JAVA).unwrap();

        let blocks = materialize(&[&file], base, RemoveImports::All);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].rel_path, "src/A.java");
        assert_eq!(
            blocks[0].text,
            "--- File: src/A.java ---\n```java\npackage demo;\n\n\nclass A {}\n```"
        );
        assert_eq!(blocks[0].error, None);
    }

    #[test]
    fn untagged_fence_for_unknown_extensions() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("notes.txt");
        fs::write(&file, "hello\r\nworld\r\n").unwrap();

        let block = render_block(&file, temp.path(), RemoveImports::None);
        assert_eq!(block.text, "--- File: notes.txt ---\n```\nhello\nworld\n```");
    }

    #[test]
    fn missing_file_becomes_placeholder() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("gone.md");

        let block = render_block(&file, temp.path(), RemoveImports::None);
        assert_eq!(block.error, Some(ReadErrorKind::NotFound));
        assert_eq!(
            block.text,
            "--- File: gone.md ---\n```text\n// Error: File not found - gone.md\n```"
        );
    }

    #[test]
    fn invalid_utf8_is_an_encoding_problem() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("blob.bin");
        fs::write(&file, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        assert_eq!(
            read_source(&file),
            ReadOutcome::Failed(ReadErrorKind::Encoding)
        );
        let block = render_block(&file, temp.path(), RemoveImports::None);
        assert!(block.text.contains("// Error: Encoding problem - blob.bin"));
    }

    #[test]
    fn files_outside_base_use_parent_segments() {
        assert_eq!(
            display_path(Path::new("/work/shared/a.md"), Path::new("/work/proj")),
            "../shared/a.md"
        );
    }
}
