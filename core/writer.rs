use crate::config::DEFAULT_OUTPUT_FILE;
use crate::error::{AppError, Result};
use crate::materialize::FileBlock;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

// Where the bundle goes. A configured path naming an existing directory gets
// the default file name appended.
pub fn resolve_output_path(configured: &Path) -> PathBuf {
    if configured.is_dir() {
        configured.join(DEFAULT_OUTPUT_FILE)
    } else {
        configured.to_path_buf()
    }
}

/// Joins the blocks with a blank line and writes them to `output_path`.
///
/// Returns the number of lines written. With `overwrite` unset an existing
/// target is left untouched and [`AppError::OutputExists`] is returned.
pub fn write_output(blocks: &[FileBlock], output_path: &Path, overwrite: bool) -> Result<usize> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| AppError::DirCreation {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    if !overwrite && output_path.exists() {
        return Err(AppError::OutputExists {
            path: output_path.to_path_buf(),
        });
    }

    let full = blocks
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let line_count = full.split('\n').count();

    let write_err = |e| AppError::FileWrite {
        path: output_path.to_path_buf(),
        source: e,
    };
    let mut file = File::create(output_path).map_err(write_err)?;
    file.write_all(full.as_bytes()).map_err(write_err)?;
    log::debug!(
        "Wrote {} blocks ({} lines) to {}",
        blocks.len(),
        line_count,
        output_path.display()
    );
    Ok(line_count)
}
