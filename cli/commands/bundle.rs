use crate::cli_args::BundleArgs;
use crate::load_config_for_command;
use crate::logging::LogFileHandle;
use anyhow::{Context, Result};
use colored::Colorize;
use filebundle_core::{self as core, AppError, Config};
use std::path::{Path, PathBuf};

/// What a bundle run did.
#[derive(Debug)]
pub struct BundleReport {
    pub output_path: PathBuf,
    pub files: usize,
    /// Lines written, or `None` when an existing output was left in place.
    pub lines: Option<usize>,
}

pub fn handle_bundle_command(
    args: BundleArgs,
    log_file: &LogFileHandle,
    quiet: bool,
) -> Result<()> {
    let config = load_config_for_command(&args.config).context("Failed to load configuration")?;

    if let Err(e) = log_file.attach(&config.log_file, config.overwrite_log) {
        log::warn!("{:#}. Logging to stderr only.", e);
    }

    let report = run_bundle(&config)?;
    match report.lines {
        Some(lines) if !quiet => println!(
            "{} Bundle saved to: {} ({} files, {} lines)",
            "✅".green(),
            report.output_path.display().to_string().blue(),
            report.files,
            lines
        ),
        Some(_) => {}
        // Under -q the log only reaches the file; the conflict still needs saying.
        None if quiet => eprintln!(
            "{} {}",
            "Error:".red().bold(),
            output_conflict_message(&report.output_path)
        ),
        None => {}
    }
    Ok(())
}

/// Collects, materializes and writes one bundle.
///
/// An existing output with `overwrite_output = false` is reported and left
/// alone; the run still succeeds.
pub fn run_bundle(config: &Config) -> Result<BundleReport> {
    log::info!("=== File collection started ===");

    let collection = core::gather_files(config).context("Failed to collect files")?;
    log::info!("Collected {} files", collection.files.len());

    let blocks = core::materialize(
        &collection.files,
        &collection.base_dir,
        config.remove_imports,
    );
    let failed = blocks.iter().filter(|b| b.error.is_some()).count();
    if failed > 0 {
        log::warn!(
            "{} files could not be read and were replaced by placeholders",
            failed
        );
    }

    let output_path = core::resolve_output_path(&config.output_file);
    let lines = match core::write_output(&blocks, &output_path, config.overwrite_output) {
        Ok(lines) => {
            log::info!(
                "Processed {} files ({} lines)",
                collection.files.len(),
                lines
            );
            Some(lines)
        }
        Err(AppError::OutputExists { path }) => {
            log::error!("{}", output_conflict_message(&path));
            None
        }
        Err(e) => return Err(e).context("Failed to write bundle"),
    };

    log::info!("=== Finished successfully ===");
    Ok(BundleReport {
        output_path,
        files: collection.files.len(),
        lines,
    })
}

fn output_conflict_message(path: &Path) -> String {
    format!(
        "Output file exists: {}. Set overwrite_output = true to overwrite it.",
        path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn bundles_then_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("proj");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(
            root.join("src/App.java"),
            "import java.util.Map;\nimport static a.B.c;\nclass App {}\n",
        )
        .unwrap();
        fs::write(root.join("notes.md"), "# Notes\n").unwrap();
        let out_dir = temp.path().join("out");
        fs::create_dir_all(&out_dir).unwrap();

        let mut config = Config::with_start_path(&root);
        config.extensions = vec![".java".into(), ".md".into()];
        config.remove_imports = core::RemoveImports::NonStatic;
        config.output_file = out_dir.clone();

        let report = run_bundle(&config).unwrap();
        let expected_path = out_dir.join("combined.txt");
        assert_eq!(report.output_path, expected_path);
        assert_eq!(report.files, 2);
        assert_eq!(report.lines, Some(10));
        assert_eq!(
            fs::read_to_string(&expected_path).unwrap(),
            "--- File: notes.md ---\n```markdown\n# Notes\n```\n\n\
             --- File: src/App.java ---\n```java\nimport static a.B.c;\nclass App {}\n```"
        );

        config.overwrite_output = false;
        let second = run_bundle(&config).unwrap();
        assert_eq!(second.lines, None);
        assert_eq!(
            output_conflict_message(&second.output_path),
            format!(
                "Output file exists: {}. Set overwrite_output = true to overwrite it.",
                expected_path.display()
            )
        );
    }
}
