mod cli_args;
mod commands;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use std::env;
use std::process;

use cli_args::{Cli, Commands, ConfigOpts};
use filebundle_core::{AppError, Config};
use logging::LogFileHandle;

fn main() {
    let cli_args = Cli::parse();

    let log_file = logging::setup_logging(cli_args.quiet, cli_args.verbose);
    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, &log_file, quiet) {
        Ok(_) => 0,
        Err(e) => {
            let exit_code = exit_code_for(&e);
            log::error!("!!! Run failed: {:#} !!!", e);
            if quiet {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            }
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(AppError::Config(_)) => 1,
        Some(AppError::TomlParse(_)) => 1,
        Some(AppError::FileRead { .. }) => 2,
        Some(AppError::FileWrite { .. }) => 2,
        Some(AppError::DirCreation { .. }) => 2,
        Some(AppError::WalkDir(_)) => 2,
        Some(AppError::InvalidArgument(_)) => 5,
        Some(AppError::JsonSerialize(_)) => 6,
        Some(_) => 1,
        None => 1,
    }
}

fn run_app(cli: Cli, log_file: &LogFileHandle, quiet: bool) -> Result<()> {
    match cli.command {
        None => {
            Cli::command().print_help()?;
        }
        Some(Commands::Bundle(args)) => {
            log::debug!("Executing 'bundle' command...");
            commands::bundle::handle_bundle_command(args, log_file, quiet)?;
        }
        Some(Commands::Plan(args)) => {
            log::debug!("Executing 'plan' command...");
            commands::plan::handle_plan_command(args)?;
        }
        Some(Commands::Config(args)) => {
            log::debug!("Executing 'config' command...");
            commands::config::handle_config_command(&args, quiet)?;
        }
        Some(Commands::Completion(args)) => {
            log::debug!("Executing 'completion' command...");
            commands::completion::handle_completion_command(&args, quiet)?;
        }
    }
    Ok(())
}

/// Applies command-line overrides on top of a loaded config.
fn merge_config_with_cli_overrides(mut config: Config, opts: &ConfigOpts) -> Result<Config> {
    log::trace!("Applying CLI overrides to config...");

    if let Some(start_path) = &opts.start_path {
        config.start_path = start_path.clone();
    }
    if let Some(output_file) = &opts.output_file {
        config.output_file = output_file.clone();
    }
    if opts.no_overwrite_output {
        config.overwrite_output = false;
    }
    if let Some(mode) = &opts.remove_imports {
        config.remove_imports = mode.parse()?;
    }

    let overrides = &opts.collection;
    if !overrides.extensions.is_empty() {
        config.extensions = overrides.extensions.clone();
    }
    if !overrides.exclude_dirs.is_empty() {
        config.exclude_dirs = overrides.exclude_dirs.clone();
    }
    if !overrides.include_all_from.is_empty() {
        config.include_all_from = overrides.include_all_from.clone();
    }
    if !overrides.extra_files.is_empty() {
        config.extra_files = overrides.extra_files.clone();
    }

    // start_path may have changed; re-run validation on the merged result.
    let config = config.finalize()?;
    log::trace!("Config after CLI overrides: {:?}", config);
    Ok(config)
}

/// Finds, loads and validates the config for `bundle` and `plan`.
///
/// When no config file exists but `--start-path` is given, the run proceeds on
/// defaults plus command-line flags.
pub fn load_config_for_command(opts: &ConfigOpts) -> Result<Config> {
    let working_dir = env::current_dir().context("Failed to read working directory")?;

    let config = match Config::resolve_config_path(&working_dir, opts.config_file.as_deref()) {
        Ok(path) => Config::load_from_path(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        Err(AppError::Config(msg)) if opts.config_file.is_none() => match &opts.start_path {
            Some(start_path) => {
                log::debug!("{} Using command-line settings only.", msg);
                Config::with_start_path(start_path.clone())
            }
            None => return Err(AppError::Config(msg).into()),
        },
        Err(e) => return Err(e).context("Failed to resolve configuration path"),
    };

    merge_config_with_cli_overrides(config, opts)
}
