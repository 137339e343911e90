use crate::cli_args::PlanArgs;
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use filebundle_core::{self as core, Collection, Provenance};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PlanEntry {
    pub path: String,
    pub provenance: Option<Provenance>,
}

#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub base_dir: String,
    pub files: Vec<PlanEntry>,
    pub missing: Vec<String>,
    pub skipped: Vec<String>,
}

impl PlanReport {
    pub fn from_collection(collection: &Collection) -> Self {
        let files = collection
            .entries()
            .map(|(path, provenance)| PlanEntry {
                path: core::materialize::display_path(path, &collection.base_dir),
                provenance,
            })
            .collect();
        Self {
            base_dir: collection.base_dir.display().to_string(),
            files,
            missing: collection.context.missing().to_vec(),
            skipped: collection
                .context
                .skipped()
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        }
    }
}

pub fn handle_plan_command(args: PlanArgs) -> Result<()> {
    let config = load_config_for_command(&args.config)
        .context("Failed to load configuration for plan command")?;

    log::debug!("Plan: gathering files...");
    let collection = core::gather_files(&config).context("Failed to collect files")?;
    let report = PlanReport::from_collection(&collection);

    match args.format.as_str() {
        "json" => output::print_json(&report),
        _ => output::print_plan_table(&report),
    }
}
