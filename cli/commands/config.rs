use crate::cli_args::ConfigArgs;
use crate::output::{confirm_overwrite, write_to_stdout};
use anyhow::{Context, Result};
use colored::*;
use filebundle_core::Config;
use filebundle_core::config::DEFAULT_CONFIG_FILENAME;
use std::env;
use std::fs;
use std::path::Path;

pub fn handle_config_command(args: &ConfigArgs, quiet: bool) -> Result<()> {
    if !args.save {
        return write_to_stdout(Config::default_toml());
    }

    let working_dir = env::current_dir().context("Failed to read working directory")?;
    let target = working_dir.join(DEFAULT_CONFIG_FILENAME);
    if !confirm_overwrite(&target, quiet)? {
        println!("Save cancelled.");
        return Ok(());
    }
    save_starter_config(&target)?;
    if !quiet {
        println!(
            "{} Starter config saved to: {}",
            "✅".green(),
            target.display().to_string().blue()
        );
    }
    Ok(())
}

fn save_starter_config(target: &Path) -> Result<()> {
    fs::write(target, Config::default_toml())
        .with_context(|| format!("Failed to write config file {}", target.display()))
}
