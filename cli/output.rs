use anyhow::{Context, Result};
use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use filebundle_core::AppError;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use crate::commands::plan::PlanReport;

pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(data).map_err(AppError::JsonSerialize)?;
    write_to_stdout(&content)
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

/// Asks before replacing `path`. In quiet mode nothing is asked and the
/// answer is no.
pub fn confirm_overwrite(path: &Path, quiet: bool) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    if quiet {
        anyhow::bail!(
            "Target file '{}' exists. Overwrite prevented in quiet mode.",
            path.display()
        );
    }
    print!(
        "{} File already exists at '{}'. Overwrite? [{}/{}] ",
        "⚠️".yellow(),
        path.display().to_string().cyan(),
        "y".green(),
        "N".red()
    );
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .context("Failed to read user input")?;
    Ok(response.trim().eq_ignore_ascii_case("y"))
}

pub fn print_plan_table(report: &PlanReport) -> Result<()> {
    println!();
    println!("{}", " Bundle Plan ".green().bold().underline());
    println!("{:<12} {}", "Start path:".green(), report.base_dir.cyan());
    println!(
        "{:<12} {}",
        "Files:".green(),
        report.files.len().to_string().cyan()
    );

    if report.files.is_empty() {
        println!("\n{}", "(No files would be bundled)".yellow());
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("#").fg(Color::Green),
            Cell::new("Source").fg(Color::Green),
            Cell::new("Path").fg(Color::Green),
        ]);
        for (i, entry) in report.files.iter().enumerate() {
            let source = entry.provenance.map_or("unknown", |p| p.as_str());
            table.add_row(vec![
                Cell::new(i + 1).set_alignment(comfy_table::CellAlignment::Right),
                Cell::new(source).fg(Color::DarkGrey),
                Cell::new(&entry.path).fg(Color::Cyan),
            ]);
        }
        println!("{table}");
    }

    if !report.missing.is_empty() {
        println!("\n{}", " Not Found ".yellow().bold().underline());
        for name in &report.missing {
            println!("- {}", name.yellow());
        }
    }
    if !report.skipped.is_empty() {
        println!("\n{}", " Unreadable Directories ".red().bold().underline());
        for dir in &report.skipped {
            println!("- {}", dir.red());
        }
    }
    println!();
    Ok(())
}
