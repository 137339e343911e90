use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOpts {
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to the config file (default: ./filebundle.toml, then ./config.json).",
        value_name = "CONFIG_FILE",
        help_heading = "Configuration"
    )]
    pub config_file: Option<String>,

    #[arg(
        long,
        help = "Directory to collect from (overrides start_path).",
        value_name = "PATH",
        help_heading = "Configuration"
    )]
    pub start_path: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        help = "File (or directory) to write the bundle to.",
        value_name = "PATH",
        help_heading = "Configuration"
    )]
    pub output_file: Option<PathBuf>,

    #[arg(
        long,
        help = "Refuse to replace an existing output file.",
        help_heading = "Configuration"
    )]
    pub no_overwrite_output: bool,

    #[arg(
        long,
        value_name = "MODE",
        value_parser = ["none", "all", "non_static"],
        help = "Drop import lines from collected files.",
        help_heading = "Configuration"
    )]
    pub remove_imports: Option<String>,

    #[clap(flatten)]
    pub collection: CollectionOverrides,
}

/// Repeated flags replace the matching config list when given.
#[derive(Args, Debug, Clone, Default)]
pub struct CollectionOverrides {
    #[arg(long = "ext", value_name = "EXT", action = clap::ArgAction::Append, help = "Collect files with this extension (e.g. '.java').", help_heading = "Collection")]
    pub extensions: Vec<String>,
    #[arg(long = "exclude", value_name = "DIR", action = clap::ArgAction::Append, help = "Never enter this directory (prefix match).", help_heading = "Collection")]
    pub exclude_dirs: Vec<String>,
    #[arg(long = "include-all", value_name = "DIR", action = clap::ArgAction::Append, help = "Take every file under this directory.", help_heading = "Collection")]
    pub include_all_from: Vec<String>,
    #[arg(long = "extra", value_name = "FILE", action = clap::ArgAction::Append, help = "Add a file by path or by name.", help_heading = "Collection")]
    pub extra_files: Vec<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "filebundle",
    author,
    version,
    about = "Bundle project files into a single text artifact.",
    long_about = "filebundle walks a directory tree, collects files by extension, whole directories \nand explicitly named extras, removes same-named duplicates and writes every file \nas a fenced block into one text file.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  filebundle bundle\n  filebundle bundle --ext .java --exclude target -o review.txt\n  filebundle plan -f json\n  filebundle config --save",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Keep messages off stderr (the log file still records the run)."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "b",
        about = "Collect files and write the bundle."
    )]
    Bundle(BundleArgs),

    #[command(
        visible_alias = "p",
        about = "Show which files would be bundled and why."
    )]
    Plan(PlanArgs),

    #[command(about = "Show or save a starter configuration file.")]
    Config(ConfigArgs),

    #[command(about = "Generate or save shell completion scripts.")]
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct BundleArgs {
    #[clap(flatten)]
    pub config: ConfigOpts,
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[clap(flatten)]
    pub config: ConfigOpts,

    #[arg(
        short = 'f',
        long,
        value_name = "FORMAT",
        value_parser = ["table", "json"],
        default_value = "table",
        help = "Output format for the plan."
    )]
    pub format: String,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        long,
        help = "Write the starter config to ./filebundle.toml (prompts before overwriting)."
    )]
    pub save: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        long,
        value_name = "SHELL",
        value_enum,
        default_value_t = Shell::Fish,
        help = "Shell to generate completions for."
    )]
    pub shell: Shell,
    #[arg(
        long,
        help = "Save completion script to the shell's default location (prompts overwrite)."
    )]
    pub save: bool,
}
